//! LLM driver trait and the Chat Completions implementation.
//!
//! The [`LlmDriver`] trait is the seam between the agent loop and the model
//! backend: one call in, one assistant turn out. The production
//! implementation is [`ChatCompletionsDriver`], which talks to any
//! OpenAI-compatible `/v1/chat/completions` endpoint. Tests substitute a
//! scripted driver.

pub mod chat_completions;

pub use chat_completions::ChatCompletionsDriver;

use std::env;

/// LLM connection and model settings.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Base URL for the LLM API (e.g., `https://api.openai.com`).
    pub base_url: String,
    /// Optional API key for authentication.
    pub api_key: Option<String>,
    /// Default model identifier; an agent declaration may override it.
    pub model: String,
}

impl LlmSettings {
    /// Read settings from `LLM_BASE_URL`, `LLM_API_KEY` and `LLM_MODEL`.
    ///
    /// Credentials are not validated here; a bad key surfaces as an
    /// authentication error at call time.
    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("LLM_BASE_URL")
            .map_err(|_| "Missing required env var: LLM_BASE_URL".to_string())?;
        if base_url.trim().is_empty() {
            return Err("LLM_BASE_URL cannot be empty".to_string());
        }

        let model =
            env::var("LLM_MODEL").map_err(|_| "Missing required env var: LLM_MODEL".to_string())?;
        if model.trim().is_empty() {
            return Err("LLM_MODEL cannot be empty".to_string());
        }

        let api_key = env::var("LLM_API_KEY").ok().filter(|s| !s.trim().is_empty());

        Ok(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// A message in a conversation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Message {
    /// Role of the message author.
    pub role: MessageRole,
    /// Text content. Serialized as `null` for assistant turns that carry
    /// only tool calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Tool call this message responds to (role `tool` only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Tool calls made by the assistant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl Message {
    /// System-prompt message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(MessageRole::System, content)
    }

    /// User message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::text(MessageRole::User, content)
    }

    /// Assistant turn: optional text plus whatever tool calls it issued.
    #[must_use]
    pub fn assistant(content: Option<String>, tool_calls: Option<Vec<ToolCall>>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content,
            tool_call_id: None,
            tool_calls,
        }
    }

    /// Tool result message, answering `tool_call_id`.
    #[must_use]
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: Some(content.into()),
            tool_call_id: Some(tool_call_id.into()),
            tool_calls: None,
        }
    }

    fn text(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_call_id: None,
            tool_calls: None,
        }
    }
}

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System prompt.
    System,
    /// User message.
    User,
    /// Assistant response.
    Assistant,
    /// Tool response.
    Tool,
}

/// A tool call made by the assistant.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call.
    pub id: String,
    /// Type of tool (always "function" for now).
    #[serde(rename = "type")]
    pub call_type: String,
    /// Function details.
    pub function: ToolCallFunction,
}

/// Function details in a tool call.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolCallFunction {
    /// Function name.
    pub name: String,
    /// Arguments as JSON string.
    pub arguments: String,
}

/// Request to an LLM driver.
#[derive(Debug)]
pub struct LlmRequest {
    /// Model to use for this request.
    pub model: String,
    /// Conversation messages.
    pub messages: Vec<Message>,
    /// Available tools in OpenAI function-schema format.
    pub tools: Vec<serde_json::Value>,
}

/// One assistant turn, as returned by a driver.
#[derive(Debug, Clone, Default)]
pub struct ChatOutcome {
    /// Assistant text, when the model produced any.
    pub text: Option<String>,
    /// Tool calls the model wants executed before it can finish.
    pub tool_calls: Vec<ToolCall>,
}

/// Trait for LLM drivers.
#[async_trait::async_trait]
pub trait LlmDriver: Send + Sync {
    /// Request one assistant turn for the given conversation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, authentication is rejected,
    /// or the response cannot be parsed.
    async fn complete(&self, req: LlmRequest) -> anyhow::Result<ChatOutcome>;
}
