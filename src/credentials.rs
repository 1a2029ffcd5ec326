//! Credential loading from local `.env` files.
//!
//! API keys (LLM provider, search provider) live in a `.env` file next to
//! the binary's working directory. Loading is additive: a variable that is
//! already set in the process environment always wins over the file.

use std::path::{Path, PathBuf};

/// Load `.env` from the current directory (or any parent), if present.
///
/// Returns the path of the file that was loaded, or `None` when no file
/// exists. A missing file is not an error; a malformed file is logged and
/// otherwise ignored.
pub fn load() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "Loaded credentials file");
            Some(path)
        }
        Err(err) if err.not_found() => None,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to read credentials file");
            None
        }
    }
}

/// Load a specific `KEY=VALUE` file, additively.
///
/// Same semantics as [`load`], but for an explicit path (the `--env-file`
/// flag and tests use this).
pub fn load_from(path: &Path) -> Option<PathBuf> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Loaded credentials file");
            Some(path.to_path_buf())
        }
        Err(err) if err.not_found() => None,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Failed to read credentials file");
            None
        }
    }
}
