//! OpenAI-compatible chat-completions backend

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use advisor_config::ReasoningConfig;
use advisor_core::{ChatTurn, ReasoningModel, Result};

use crate::LlmError;

/// Chat-completions response shape (only the fields we read)
#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat endpoint (Groq-hosted models)
pub struct GroqBackend {
    http: reqwest::Client,
    config: ReasoningConfig,
}

impl GroqBackend {
    pub fn new(config: ReasoningConfig) -> std::result::Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LlmError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn chat(&self, turns: &[ChatTurn]) -> std::result::Result<String, LlmError> {
        let messages: Vec<serde_json::Value> = turns
            .iter()
            .map(|t| json!({ "role": t.role.as_str(), "content": t.content }))
            .collect();

        let body = json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });

        let url = format!(
            "{}/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Api(status.as_u16()));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("completion carried no content".into()))
    }
}

#[async_trait]
impl ReasoningModel for GroqBackend {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String> {
        let text = self.chat(turns).await?;
        tracing::debug!(
            model = %self.config.model,
            turns = turns.len(),
            chars = text.len(),
            "reasoning completion"
        );
        Ok(text)
    }
}
