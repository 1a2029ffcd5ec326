//! Model Context Protocol (MCP) client plumbing.
//!
//! Servers are declared in `mcp.json`:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "search": {
//!       "command": "npx",
//!       "args": ["-y", "@modelcontextprotocol/server-brave-search"],
//!       "env": { "BRAVE_API_KEY": "${BRAVE_API_KEY}" }
//!     }
//!   }
//! }
//! ```
//!
//! Connections are scoped: each operation (or agent session) spawns the
//! server process, talks to it, and releases it. See [`connector`].

pub mod config;
pub mod connector;
pub mod describe;

pub use config::{McpConfig, ServerConfig, load_mcp_config};
pub use connector::{ServerConnection, first_text};
pub use describe::{ToolSummary, render_table, summarize};
