use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::{CompletionGateway, GatewayError};
use crate::chat::{Role, Turn};
use crate::config::Config;

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: Role,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f64,
    max_tokens: u32,
}

/// Client for an OpenAI-compatible `chat/completions` endpoint.
pub struct ChatCompletionClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl ChatCompletionClient {
    pub fn new(config: &Config) -> Self {
        let endpoint = format!("{}/chat/completions", config.api_base.trim_end_matches('/'));
        info!("Using chat completions endpoint {} with model {}", endpoint, config.model);

        Self {
            client: Client::new(),
            endpoint,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionGateway for ChatCompletionClient {
    async fn complete(&self, transcript: &[Turn]) -> Result<String, GatewayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GatewayError::MissingCredential)?;

        let payload = CompletionRequest {
            model: &self.model,
            messages: transcript
                .iter()
                .map(|turn| Message {
                    role: turn.role(),
                    content: turn.content(),
                })
                .collect(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        info!(
            "Requesting completion for {} turns (max_tokens: {})",
            transcript.len(),
            self.max_tokens
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("Upstream error body: {}", body);
            let message = upstream_message(&body)
                .unwrap_or_else(|| format!("request failed with status {}", status));
            return Err(GatewayError::Upstream(message));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        debug!("Response JSON: {}", response_json);

        let content = response_json
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .ok_or_else(|| {
                GatewayError::MalformedResponse(
                    "response has no choices[0].message.content".to_string(),
                )
            })?;

        info!("Response length: {} characters", content.len());
        Ok(content.to_string())
    }
}

/// Pulls a human-readable message out of an error body, accepting both
/// `{"error": {"message": ".."}}` and `{"error": ".."}`.
fn upstream_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    error
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .filter(|message| !message.trim().is_empty())
        .map(str::to_string)
}
