//! Tool catalog for one agent session.
//!
//! Tools from every connected server are namespaced as `server__tool` and
//! sanitized to the character set the Chat Completions function-name grammar
//! accepts. In-process [`NativeTool`]s sit in the same catalog under a
//! `native__` prefix.

use rmcp::model::Tool;
use std::{collections::HashMap, sync::Arc};

/// An in-process tool the agent can call without an MCP server.
#[async_trait::async_trait]
pub trait NativeTool: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn schema(&self) -> serde_json::Value;
    async fn call(&self, args: serde_json::Value) -> anyhow::Result<serde_json::Value>;
}

/// Namespaced view of every tool an agent session can reach.
#[derive(Default)]
pub struct ToolCatalog {
    // (namespaced_name, descriptor), in registration order
    tools: Vec<(String, Tool)>,
    // namespaced_name -> (connection index, raw tool name)
    remote: HashMap<String, (usize, String)>,
    // namespaced_name -> native tool
    native: HashMap<String, Arc<dyn NativeTool>>,
}

impl std::fmt::Debug for ToolCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolCatalog")
            .field("tool_count", &self.tools.len())
            .field("native_tool_count", &self.native.len())
            .finish()
    }
}

impl ToolCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the tools one connected server reported.
    pub fn add_server_tools(&mut self, server: &str, connection: usize, tools: Vec<Tool>) {
        for tool in tools {
            let raw_name = tool.name.to_string();
            let ns_name = sanitize_tool_name(&format!("{server}__{raw_name}"));
            self.remote.insert(ns_name.clone(), (connection, raw_name));
            self.tools.push((ns_name, tool));
        }
    }

    /// Register an in-process tool.
    pub fn add_native(&mut self, tool: Arc<dyn NativeTool>) {
        let ns_name = sanitize_tool_name(&format!("native__{}", tool.name()));

        let descriptor = Tool {
            name: tool.name().to_string().into(),
            description: Some(tool.description().to_string().into()),
            input_schema: Arc::new(
                tool.schema()
                    .as_object()
                    .unwrap_or(&serde_json::Map::new())
                    .clone(),
            ),
            title: None,
            output_schema: None,
            annotations: None,
            icons: None,
            meta: None,
        };

        self.tools.push((ns_name.clone(), descriptor));
        self.native.insert(ns_name, tool);
    }

    /// Namespaced tools as `(namespaced_name, descriptor)`.
    #[must_use]
    pub fn tools(&self) -> &[(String, Tool)] {
        &self.tools
    }

    /// Resolve a namespaced name to its native tool, if it is one.
    #[must_use]
    pub fn native(&self, ns_name: &str) -> Option<&Arc<dyn NativeTool>> {
        self.native.get(ns_name)
    }

    /// Resolve a namespaced name to `(connection index, raw tool name)`.
    #[must_use]
    pub fn remote(&self, ns_name: &str) -> Option<(usize, &str)> {
        self.remote
            .get(ns_name)
            .map(|(idx, raw)| (*idx, raw.as_str()))
    }

    /// Convert the catalog to OpenAI function-schema JSON.
    #[must_use]
    pub fn openai_tools_json(&self) -> Vec<serde_json::Value> {
        self.tools
            .iter()
            .map(|(ns_name, t)| {
                let params = serde_json::to_value(&*t.input_schema)
                    .unwrap_or_else(|_| serde_json::json!({"type":"object","properties":{}}));

                serde_json::json!({
                    "type": "function",
                    "function": {
                        "name": ns_name,
                        "description": t.description.as_deref().unwrap_or(""),
                        "parameters": params
                    }
                })
            })
            .collect()
    }
}

/// Sanitize tool names for the `^[a-zA-Z0-9_-]+$` function-name grammar.
#[must_use]
pub fn sanitize_tool_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool(name: &str) -> Tool {
        Tool {
            name: name.to_string().into(),
            description: Some("test tool".to_string().into()),
            input_schema: Arc::new(
                json!({
                    "type": "object",
                    "properties": { "query": { "type": "string" } }
                })
                .as_object()
                .unwrap()
                .clone(),
            ),
            title: None,
            output_schema: None,
            annotations: None,
            icons: None,
            meta: None,
        }
    }

    #[test]
    fn sanitizes_invalid_characters() {
        assert_eq!(sanitize_tool_name("search::web.find"), "search__web_find");
        assert_eq!(sanitize_tool_name("plain_name-1"), "plain_name-1");
    }

    #[test]
    fn namespaces_server_tools() {
        let mut catalog = ToolCatalog::new();
        catalog.add_server_tools("search", 0, vec![tool("web_search")]);

        assert_eq!(catalog.tools().len(), 1);
        assert_eq!(catalog.tools()[0].0, "search__web_search");
        assert_eq!(catalog.remote("search__web_search"), Some((0, "web_search")));
        assert!(catalog.native("search__web_search").is_none());
    }

    #[test]
    fn converts_to_openai_schema() {
        let mut catalog = ToolCatalog::new();
        catalog.add_server_tools("search", 0, vec![tool("web_search")]);

        let tools = catalog.openai_tools_json();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["type"], "function");
        assert_eq!(tools[0]["function"]["name"], "search__web_search");
        assert_eq!(
            tools[0]["function"]["parameters"]["properties"]["query"]["type"],
            "string"
        );
    }
}
