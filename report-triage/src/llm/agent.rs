use async_trait::async_trait;
use rig::{client::CompletionClient, completion::Prompt, providers::openrouter};
use std::time::Duration;
use tracing::info;

use super::{ModelRequest, ReportModel};
use crate::error::ProviderError;

/// Text-only model backed by a rig agent over OpenRouter.
pub struct AgentModel {
    client: openrouter::Client,
    model: String,
    timeout_secs: Option<u64>,
}

impl AgentModel {
    pub fn new(
        api_key: &str,
        model: impl Into<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey);
        }
        Ok(Self {
            client: openrouter::Client::new(api_key),
            model: model.into(),
            timeout_secs,
        })
    }
}

#[async_trait]
impl ReportModel for AgentModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn invoke(&self, request: ModelRequest) -> Result<String, ProviderError> {
        if !request.attachments.is_empty() {
            return Err(ProviderError::UnsupportedAttachments);
        }

        let mut builder = self
            .client
            .agent(&self.model)
            .temperature(request.temperature)
            .max_tokens(u64::from(request.max_tokens));
        if let Some(system) = &request.system {
            builder = builder.preamble(system);
        }
        let agent = builder.build();

        info!(model = %self.model, "Prompting rig agent");
        let call = agent.prompt(request.instructions.as_str());
        let response = match self.timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), call)
                .await
                .map_err(|_| ProviderError::Timeout(secs))?,
            None => call.await,
        };

        response
            .map(|text| text.trim().to_string())
            .map_err(|e| ProviderError::Request(e.to_string()))
    }
}
