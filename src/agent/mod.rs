//! LLM-backed agents with scoped access to MCP tool servers.
//!
//! An [`Agent`] is declared with an instruction, an optional model override
//! and the names of the servers it may use. [`Agent::run`] opens an
//! [`AgentSession`]: every declared server is connected and its tools are
//! collected into a namespaced catalog. `ask` runs the tool loop: the model
//! decides which tools to call, the session executes them and feeds results
//! back until a final textual answer arrives. Closing the session releases
//! every connection.
//!
//! Agents are quiet by construction: intermediate turns are never narrated
//! on stdout, only traced. The narration capability exists on the
//! underlying loop and is forced off by the constructor.

pub mod config;
pub mod tools;

pub use config::{AgentDeclaration, AgentFileConfig, load_agent_config};
pub use tools::{NativeTool, ToolCatalog, sanitize_tool_name};

use crate::llm::{ChatCompletionsDriver, LlmDriver, LlmRequest, LlmSettings, Message};
use crate::mcp::config::McpConfig;
use crate::mcp::connector::ServerConnection;
use anyhow::Context;
use std::sync::Arc;
use uuid::Uuid;

/// Declaration of a named agent.
#[derive(Debug, Clone)]
pub struct AgentDefinition {
    pub name: String,
    /// System instruction the conversation starts from.
    pub instruction: String,
    /// Model override; the settings' default model applies when `None`.
    pub model: Option<String>,
    /// Names of the MCP servers this agent may use.
    pub servers: Vec<String>,
}

/// Execution options for an agent.
#[derive(Debug, Clone)]
pub struct AgentOptions {
    /// Suppress console narration of intermediate turns.
    ///
    /// Forced to `true` by every constructor, whatever the caller passed.
    pub quiet: bool,
    /// Upper bound on model round trips per `ask`.
    pub max_tool_turns: usize,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            quiet: true,
            max_tool_turns: 10,
        }
    }
}

/// An LLM-backed agent with optional access to MCP tool servers.
pub struct Agent {
    definition: AgentDefinition,
    options: AgentOptions,
    model: String,
    driver: Arc<dyn LlmDriver>,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("definition", &self.definition)
            .field("options", &self.options)
            .field("model", &self.model)
            .finish()
    }
}

impl Agent {
    /// Create an agent backed by the Chat Completions driver.
    #[must_use]
    pub fn new(definition: AgentDefinition, settings: LlmSettings, options: AgentOptions) -> Self {
        let default_model = settings.model.clone();
        let driver = Arc::new(ChatCompletionsDriver::new(settings));
        Self::with_driver(definition, default_model, options, driver)
    }

    /// Create an agent over an arbitrary driver (embedders, tests).
    #[must_use]
    pub fn with_driver(
        definition: AgentDefinition,
        default_model: String,
        mut options: AgentOptions,
        driver: Arc<dyn LlmDriver>,
    ) -> Self {
        // The explorer never narrates intermediate turns.
        options.quiet = true;

        let model = definition.model.clone().unwrap_or(default_model);

        Self {
            definition,
            options,
            model,
            driver,
        }
    }

    /// The agent's declaration.
    #[must_use]
    pub fn definition(&self) -> &AgentDefinition {
        &self.definition
    }

    /// Whether console narration is suppressed. Always `true`.
    #[must_use]
    pub fn quiet(&self) -> bool {
        self.options.quiet
    }

    /// Open a session: connect every declared server and build the tool
    /// catalog. The returned session owns the connections until closed.
    pub async fn run(&self, servers: &McpConfig) -> anyhow::Result<AgentSession<'_>> {
        let mut connections: Vec<ServerConnection> = Vec::new();
        let mut catalog = ToolCatalog::new();

        for name in &self.definition.servers {
            let attached = async {
                let cfg = servers.get(name)?;
                let conn = ServerConnection::connect(name, cfg).await?;
                let tools = conn.list_tools().await?;
                Ok::<_, anyhow::Error>((conn, tools))
            }
            .await;

            match attached {
                Ok((conn, tools)) => {
                    tracing::info!(
                        agent = %self.definition.name,
                        server = %name,
                        tool_count = tools.len(),
                        "Agent tool server connected"
                    );
                    catalog.add_server_tools(name, connections.len(), tools);
                    connections.push(conn);
                }
                Err(err) => {
                    close_all(connections).await;
                    return Err(err)
                        .with_context(|| format!("agent '{}' setup failed", self.definition.name));
                }
            }
        }

        let history = vec![Message::system(self.definition.instruction.as_str())];

        Ok(AgentSession {
            agent: self,
            connections,
            catalog,
            history,
        })
    }
}

/// One open run of an agent: live server connections plus conversation
/// history. Destroyed (connections released) by [`AgentSession::close`].
pub struct AgentSession<'a> {
    agent: &'a Agent,
    connections: Vec<ServerConnection>,
    catalog: ToolCatalog,
    history: Vec<Message>,
}

impl std::fmt::Debug for AgentSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentSession")
            .field("agent", &self.agent.definition.name)
            .field("connection_count", &self.connections.len())
            .field("catalog", &self.catalog)
            .finish()
    }
}

impl AgentSession<'_> {
    /// Register an in-process tool alongside the connected servers.
    #[must_use]
    pub fn with_native_tool(mut self, tool: Arc<dyn NativeTool>) -> Self {
        self.catalog.add_native(tool);
        self
    }

    /// Namespaced names of every tool the session can reach.
    #[must_use]
    pub fn tool_names(&self) -> Vec<&str> {
        self.catalog
            .tools()
            .iter()
            .map(|(ns_name, _)| ns_name.as_str())
            .collect()
    }

    /// Send a prompt and run the tool loop to a final textual answer.
    ///
    /// The model may elect to call any catalog tool; each call is executed
    /// and its result appended to the conversation before the model is
    /// consulted again. Backend failures propagate unchanged.
    pub async fn ask(&mut self, prompt: &str) -> anyhow::Result<String> {
        let request_id = Uuid::new_v4().to_string();
        let tools = self.catalog.openai_tools_json();

        self.history.push(Message::user(prompt));

        tracing::info!(
            request_id = %request_id,
            agent = %self.agent.definition.name,
            tool_count = tools.len(),
            "Starting agent turn"
        );

        for turn in 0..self.agent.options.max_tool_turns {
            let req = LlmRequest {
                model: self.agent.model.clone(),
                messages: self.history.clone(),
                tools: tools.clone(),
            };

            let outcome = self.agent.driver.complete(req).await?;

            if outcome.tool_calls.is_empty() {
                let text = outcome.text.unwrap_or_default();
                self.history.push(Message::assistant(Some(text.clone()), None));
                tracing::info!(
                    request_id = %request_id,
                    turn = turn,
                    "Agent produced final answer"
                );
                return Ok(text);
            }

            self.history.push(Message::assistant(
                outcome.text.clone(),
                Some(outcome.tool_calls.clone()),
            ));

            for call in &outcome.tool_calls {
                let arguments: serde_json::Value = serde_json::from_str(&call.function.arguments)
                    .unwrap_or_else(|_| serde_json::json!({}));

                tracing::info!(
                    request_id = %request_id,
                    turn = turn,
                    tool = %call.function.name,
                    "Executing tool call"
                );
                if !self.agent.options.quiet {
                    println!(
                        "[{}] calling {}({})",
                        self.agent.definition.name, call.function.name, call.function.arguments
                    );
                }

                let value = self
                    .execute(&call.function.name, arguments)
                    .await
                    .with_context(|| format!("tool '{}' failed", call.function.name))?;

                let content = serde_json::to_string(&value).unwrap_or_default();
                tracing::debug!(
                    request_id = %request_id,
                    tool = %call.function.name,
                    result_length = content.len(),
                    "Tool call result"
                );

                self.history.push(Message::tool_result(call.id.as_str(), content));
            }
        }

        Err(anyhow::anyhow!(
            "agent '{}' did not reach a final answer within {} tool turns",
            self.agent.definition.name,
            self.agent.options.max_tool_turns
        ))
    }

    /// Conversation history accumulated so far.
    #[must_use]
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Release every server connection.
    pub async fn close(self) -> anyhow::Result<()> {
        close_all(self.connections).await;
        Ok(())
    }

    async fn execute(
        &self,
        ns_name: &str,
        arguments: serde_json::Value,
    ) -> anyhow::Result<serde_json::Value> {
        if let Some(native) = self.catalog.native(ns_name) {
            return native.call(arguments).await;
        }

        let (connection, raw_name) = self
            .catalog
            .remote(ns_name)
            .ok_or_else(|| anyhow::anyhow!("unknown tool: {ns_name}"))?;

        self.connections[connection].call_tool(raw_name, arguments).await
    }
}

async fn close_all(connections: Vec<ServerConnection>) {
    for conn in connections {
        let name = conn.name().to_string();
        if let Err(err) = conn.close().await {
            tracing::debug!(server = %name, error = %err, "MCP connection shutdown failed");
        }
    }
}
