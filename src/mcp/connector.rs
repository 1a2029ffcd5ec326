//! Scoped connections to stdio MCP servers.
//!
//! Every operation talks to a server through a [`ServerConnection`] whose
//! lifetime is bounded to the block that created it. The one-shot helpers
//! [`list_tools`] and [`call_tool`] open a fresh connection, perform a
//! single operation, and release the child process on return or on error.
//! Nothing is pooled or reused across invocations.

use crate::mcp::config::{ServerConfig, expand_env_map};
use anyhow::Context;
use rmcp::{
    model::{CallToolRequestParam, PaginatedRequestParam, Tool},
    service::{RoleClient, RunningService, ServiceExt},
    transport::TokioChildProcess,
};
use tokio::process::Command;

/// A live connection to one MCP server process.
pub struct ServerConnection {
    name: String,
    service: RunningService<RoleClient, ()>,
}

impl std::fmt::Debug for ServerConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConnection")
            .field("name", &self.name)
            .finish()
    }
}

impl ServerConnection {
    /// Spawn the configured command and perform the MCP handshake.
    ///
    /// `${VAR}` placeholders in the entry's env block are expanded from the
    /// process environment before the child is launched.
    pub async fn connect(name: &str, config: &ServerConfig) -> anyhow::Result<Self> {
        let env = expand_env_map(&config.env);

        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args);
        for (k, v) in env {
            cmd.env(k, v);
        }

        let transport = TokioChildProcess::new(cmd).with_context(|| {
            format!(
                "failed to spawn MCP server '{name}' (command '{}')",
                config.command
            )
        })?;

        let service = ()
            .serve(transport)
            .await
            .with_context(|| format!("failed to connect stdio MCP server '{name}'"))?;

        tracing::debug!(server = name, "MCP server connected");

        Ok(Self {
            name: name.to_string(),
            service,
        })
    }

    /// Server name this connection was opened for.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fetch the remote tool catalog, following the pagination cursor until
    /// exhausted.
    pub async fn list_tools(&self) -> anyhow::Result<Vec<Tool>> {
        let mut tools = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self
                .service
                .list_tools(Some(PaginatedRequestParam {
                    cursor: cursor.take(),
                }))
                .await
                .with_context(|| format!("tools/list failed for MCP server '{}'", self.name))?;

            tools.extend(page.tools);

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(tools)
    }

    /// Invoke a named tool and return the raw result payload.
    ///
    /// The result is the server's content-block sequence serialized to JSON;
    /// use [`first_text`] to pull out the leading textual block.
    pub async fn call_tool(
        &self,
        tool: &str,
        arguments: serde_json::Value,
    ) -> anyhow::Result<serde_json::Value> {
        let args_obj = arguments.as_object().cloned();

        let res = self
            .service
            .call_tool(CallToolRequestParam {
                name: tool.to_string().into(),
                arguments: args_obj,
            })
            .await
            .with_context(|| format!("tools/call failed for {}::{tool}", self.name))?;

        Ok(serde_json::to_value(res)?)
    }

    /// Shut the connection down, terminating the child process.
    pub async fn close(self) -> anyhow::Result<()> {
        self.service
            .cancel()
            .await
            .with_context(|| format!("failed to shut down MCP server '{}'", self.name))?;
        Ok(())
    }
}

/// One-shot scoped catalog fetch: connect, list, release.
pub async fn list_tools(name: &str, config: &ServerConfig) -> anyhow::Result<Vec<Tool>> {
    let conn = ServerConnection::connect(name, config).await?;
    let result = conn.list_tools().await;
    shutdown(conn).await;
    result
}

/// One-shot scoped tool invocation: connect, call, release.
pub async fn call_tool(
    name: &str,
    config: &ServerConfig,
    tool: &str,
    arguments: serde_json::Value,
) -> anyhow::Result<serde_json::Value> {
    let conn = ServerConnection::connect(name, config).await?;
    let result = conn.call_tool(tool, arguments).await;
    shutdown(conn).await;
    result
}

async fn shutdown(conn: ServerConnection) {
    let name = conn.name().to_string();
    if let Err(err) = conn.close().await {
        tracing::debug!(server = %name, error = %err, "MCP connection shutdown failed");
    }
}

/// Text of the first textual content block in a `tools/call` result.
#[must_use]
pub fn first_text(result: &serde_json::Value) -> Option<&str> {
    result
        .get("content")?
        .as_array()?
        .iter()
        .find_map(|block| block.get("text").and_then(serde_json::Value::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_text_reads_leading_text_block() {
        let result = json!({
            "content": [
                { "type": "text", "text": "first" },
                { "type": "text", "text": "second" }
            ],
            "isError": false
        });
        assert_eq!(first_text(&result), Some("first"));
    }

    #[test]
    fn first_text_skips_non_text_blocks() {
        let result = json!({
            "content": [
                { "type": "image", "data": "...", "mimeType": "image/png" },
                { "type": "text", "text": "caption" }
            ]
        });
        assert_eq!(first_text(&result), Some("caption"));
    }

    #[test]
    fn first_text_handles_missing_content() {
        assert_eq!(first_text(&json!({})), None);
        assert_eq!(first_text(&json!({ "content": [] })), None);
    }
}
