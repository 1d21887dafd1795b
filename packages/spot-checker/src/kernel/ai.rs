// AI implementation using an OpenAI-compatible chat completions endpoint
//
// This is the infrastructure implementation of BaseAI.
// Business logic (what to prompt for) lives in domains/availability.

use anyhow::{Context, Result};
use async_trait::async_trait;
use openai_client::{truncate_to_char_boundary, ChatRequest, Message, OpenAIClient};

use super::BaseAI;

/// Chat model bound to one model id
#[derive(Clone)]
pub struct OpenAIModel {
    client: OpenAIClient,
    model: String,
}

impl OpenAIModel {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: OpenAIClient::new(api_key),
            model: model.into(),
        }
    }

    /// Target another OpenAI-compatible endpoint
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }
}

#[async_trait]
impl BaseAI for OpenAIModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        tracing::info!(model = %self.model, prompt_length = prompt.len(), "Calling model");

        let request = ChatRequest::new(&self.model)
            .message(Message::system("You are a helpful assistant."))
            .message(Message::user(prompt))
            .temperature(0.0);

        let response = self
            .client
            .chat_completion(request)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    model = %self.model,
                    prompt_preview = %truncate_to_char_boundary(prompt, 200),
                    "Model call failed"
                );
                e
            })
            .context("Failed to call chat completions API")?;

        tracing::debug!(
            response_length = response.content.len(),
            total_tokens = response.usage.as_ref().map(|u| u.total_tokens),
            "Model response received"
        );

        Ok(response.content)
    }
}
