//! The external language-model capability.
//!
//! Interpreters only see [`ReportModel`]: submit a document plus
//! instructions, receive free-form text. Providers are constructed once and
//! shared behind an `Arc`.

#[cfg(feature = "rig")]
pub mod agent;
#[cfg(feature = "openrouter")]
pub mod openrouter;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::error::ProviderError;

#[cfg(feature = "rig")]
pub use agent::AgentModel;
#[cfg(feature = "openrouter")]
pub use openrouter::OpenRouterModel;

/// A binary document attached to a model request.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub media_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(media_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// `data:` URL form accepted by OpenAI-compatible vision APIs.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.to_base64())
    }
}

/// One call to the model. The response is always free text.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub system: Option<String>,
    pub attachments: Vec<Attachment>,
    pub instructions: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl ModelRequest {
    pub fn text(instructions: impl Into<String>) -> Self {
        Self {
            system: None,
            attachments: Vec::new(),
            instructions: instructions.into(),
            max_tokens: 1024,
            temperature: 0.3,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Black-box model capability shared by both interpreters.
#[async_trait]
pub trait ReportModel: Send + Sync {
    /// Short provider/model label for logs.
    fn name(&self) -> &str;

    async fn invoke(&self, request: ModelRequest) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_carries_media_type_and_base64() {
        let attachment = Attachment::new("image/png", b"abc".to_vec());
        assert_eq!(attachment.to_data_url(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn text_request_defaults() {
        let request = ModelRequest::text("hello").with_max_tokens(1000);
        assert!(request.attachments.is_empty());
        assert_eq!(request.system, None);
        assert_eq!(request.max_tokens, 1000);
        assert_eq!(request.temperature, 0.3);
    }
}
