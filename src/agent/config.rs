use crate::mcp::config::{McpConfig, ServerConfig};
use anyhow::Context;
use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path};

use super::AgentDefinition;

/// `agents.yaml`: named MCP servers plus named agent declarations.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AgentFileConfig {
    #[serde(default)]
    pub servers: HashMap<String, ServerConfig>,
    #[serde(default)]
    pub agents: HashMap<String, AgentDeclaration>,
}

/// One named agent as declared in the config file.
#[derive(Debug, Deserialize, Clone)]
pub struct AgentDeclaration {
    pub instruction: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub servers: Vec<String>,
}

impl AgentFileConfig {
    /// The file's server catalog, in the shape the connector consumes.
    #[must_use]
    pub fn mcp_config(&self) -> McpConfig {
        McpConfig {
            mcp_servers: self.servers.clone(),
        }
    }

    /// Materialize the named agent declaration.
    pub fn definition(&self, name: &str) -> anyhow::Result<AgentDefinition> {
        let decl = self
            .agents
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("unknown agent '{name}'"))?;

        Ok(AgentDefinition {
            name: name.to_string(),
            instruction: decl.instruction.clone(),
            model: decl.model.clone(),
            servers: decl.servers.clone(),
        })
    }
}

/// Load `agents.yaml` from disk.
pub fn load_agent_config(path: impl AsRef<Path>) -> anyhow::Result<AgentFileConfig> {
    let path = path.as_ref();
    let txt = fs::read_to_string(path)
        .with_context(|| format!("failed to read agent config '{}'", path.display()))?;
    serde_yaml::from_str(&txt)
        .with_context(|| format!("invalid agent config '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_servers_and_agents() {
        let raw = r#"
servers:
  search:
    command: npx
    args: ["-y", "@modelcontextprotocol/server-brave-search"]
    env:
      BRAVE_API_KEY: "${BRAVE_API_KEY}"
agents:
  researcher:
    instruction: "Answer questions using web search when needed."
    model: gpt-4o-mini
    servers: [search]
"#;
        let cfg: AgentFileConfig = serde_yaml::from_str(raw).unwrap();

        let mcp = cfg.mcp_config();
        assert_eq!(mcp.get("search").unwrap().command, "npx");

        let def = cfg.definition("researcher").unwrap();
        assert_eq!(def.name, "researcher");
        assert_eq!(def.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(def.servers, vec!["search"]);

        assert!(cfg.definition("missing").is_err());
    }

    #[test]
    fn agent_fields_default() {
        let raw = r#"
agents:
  plain:
    instruction: "Just answer."
"#;
        let cfg: AgentFileConfig = serde_yaml::from_str(raw).unwrap();
        let def = cfg.definition("plain").unwrap();
        assert_eq!(def.model, None);
        assert!(def.servers.is_empty());
        assert!(cfg.servers.is_empty());
    }
}
