use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

use super::{ModelRequest, ReportModel};
use crate::error::ProviderError;

pub const OPENROUTER_CHAT_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// OpenRouter chat-completions client. Supports image attachments.
#[derive(Clone)]
pub struct OpenRouterModel {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    timeout_secs: Option<u64>,
}

impl OpenRouterModel {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_timeout(api_key, model, None)
    }

    /// `timeout_secs = None` keeps reqwest's default (no overall timeout).
    pub fn with_timeout(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey);
        }

        let mut builder = Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model: model.into(),
            endpoint: OPENROUTER_CHAT_URL.to_string(),
            timeout_secs,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn payload(&self, request: &ModelRequest) -> Value {
        let mut content: Vec<Value> = request
            .attachments
            .iter()
            .map(|attachment| {
                json!({
                    "type": "image_url",
                    "image_url": { "url": attachment.to_data_url() }
                })
            })
            .collect();
        content.push(json!({
            "type": "text",
            "text": request.instructions
        }));

        let mut messages = Vec::new();
        if let Some(system) = &request.system {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": content }));

        json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature
        })
    }

    fn map_send_error(&self, error: reqwest::Error) -> ProviderError {
        match self.timeout_secs {
            Some(secs) if error.is_timeout() => ProviderError::Timeout(secs),
            _ => ProviderError::Request(error.to_string()),
        }
    }
}

/// Pulls `choices[0].message.content` out of a chat-completions body.
pub fn completion_text(body: &Value) -> Result<String, ProviderError> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(|text| text.trim().to_string())
        .ok_or_else(|| {
            ProviderError::MalformedResponse("missing choices[0].message.content".to_string())
        })
}

#[async_trait]
impl ReportModel for OpenRouterModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn invoke(&self, request: ModelRequest) -> Result<String, ProviderError> {
        info!(
            model = %self.model,
            attachments = request.attachments.len(),
            "Calling OpenRouter"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&self.payload(&request))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let text = completion_text(&body)?;
        debug!(characters = text.len(), "OpenRouter response received");
        Ok(text)
    }
}
