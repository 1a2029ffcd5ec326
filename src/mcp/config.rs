use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path};

/// Declarative catalog of MCP servers, as found in `mcp.json`.
///
/// The `mcpServers` shape is shared with deployed MCP tooling and must not
/// change.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct McpConfig {
    #[serde(rename = "mcpServers")]
    pub mcp_servers: HashMap<String, ServerConfig>,
}

/// Launch description for one stdio MCP server.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ServerConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl McpConfig {
    /// Look up a server entry by name.
    pub fn get(&self, name: &str) -> anyhow::Result<&ServerConfig> {
        self.mcp_servers
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("unknown MCP server '{name}'"))
    }

    /// Server names in sorted order, for stable display.
    #[must_use]
    pub fn server_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.mcp_servers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Load `mcp.json` from disk.
pub fn load_mcp_config(path: impl AsRef<Path>) -> anyhow::Result<McpConfig> {
    let path = path.as_ref();
    let txt = fs::read_to_string(path)
        .with_context(|| format!("failed to read MCP config '{}'", path.display()))?;
    serde_json::from_str(&txt).with_context(|| format!("invalid MCP config '{}'", path.display()))
}

/// Expand `${VAR}` placeholders from the process environment.
///
/// A placeholder whose variable is unset is left unchanged; the remote end
/// reports the missing credential at call time.
#[must_use]
pub fn expand_env_placeholders(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 2..];
        let Some(end) = tail.find('}') else {
            // Unterminated placeholder, keep verbatim.
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &tail[..end];
        match std::env::var(name) {
            Ok(value) => out.push_str(&value),
            Err(_) => {
                out.push_str("${");
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &tail[end + 1..];
    }

    out.push_str(rest);
    out
}

/// Expand every value of an env mapping.
#[must_use]
pub fn expand_env_map(map: &HashMap<String, String>) -> HashMap<String, String> {
    map.iter()
        .map(|(k, v)| (k.clone(), expand_env_placeholders(v)))
        .collect()
}
