//! OpenAI Chat Completions API driver.

use anyhow::Context;

use super::{ChatOutcome, LlmDriver, LlmRequest, LlmSettings, ToolCall, ToolCallFunction};

/// Driver for any OpenAI-compatible `/v1/chat/completions` endpoint.
#[derive(Clone)]
pub struct ChatCompletionsDriver {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl std::fmt::Debug for ChatCompletionsDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsDriver")
            .field("settings", &self.settings)
            .finish()
    }
}

impl ChatCompletionsDriver {
    /// Create a new Chat Completions driver with the given settings.
    #[must_use]
    pub fn new(settings: LlmSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }
}

#[async_trait::async_trait]
impl LlmDriver for ChatCompletionsDriver {
    async fn complete(&self, req: LlmRequest) -> anyhow::Result<ChatOutcome> {
        let url = format!(
            "{}/v1/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        );

        let body = serde_json::json!({
            "model": req.model,
            "messages": req.messages,
            "tools": if req.tools.is_empty() { serde_json::Value::Null } else { serde_json::Value::Array(req.tools) }
        });

        let mut rb = self.http.post(&url).json(&body);
        if let Some(k) = &self.settings.api_key {
            rb = rb.bearer_auth(k);
        }

        let resp = rb.send().await?.error_for_status()?;
        let v: serde_json::Value = resp
            .json()
            .await
            .context("invalid chat completions response body")?;

        parse_outcome(&v)
    }
}

/// Extract the assistant turn from a non-streaming response payload.
fn parse_outcome(v: &serde_json::Value) -> anyhow::Result<ChatOutcome> {
    let message = v
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .ok_or_else(|| anyhow::anyhow!("missing choices[0].message in chat completions response"))?;

    let text = message
        .get("content")
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string);

    let mut tool_calls = Vec::new();
    if let Some(arr) = message.get("tool_calls").and_then(serde_json::Value::as_array) {
        for tc in arr {
            let id = tc.get("id").and_then(serde_json::Value::as_str);
            let function = tc.get("function");
            let name = function
                .and_then(|f| f.get("name"))
                .and_then(serde_json::Value::as_str);
            let arguments = function
                .and_then(|f| f.get("arguments"))
                .and_then(serde_json::Value::as_str)
                .unwrap_or("{}");

            if let (Some(id), Some(name)) = (id, name) {
                tool_calls.push(ToolCall {
                    id: id.to_string(),
                    call_type: "function".to_string(),
                    function: ToolCallFunction {
                        name: name.to_string(),
                        arguments: arguments.to_string(),
                    },
                });
            }
        }
    }

    Ok(ChatOutcome { text, tool_calls })
}
