use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::{ProviderError, Result};
use crate::interpreter::TextExtractor;
use crate::llm::{ModelRequest, ReportModel};

/// Model double that returns a fixed reply and records every request.
pub struct ScriptedModel {
    reply: std::result::Result<String, ProviderError>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedModel {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            reply: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn invoke(&self, request: ModelRequest) -> std::result::Result<String, ProviderError> {
        self.requests.lock().unwrap().push(request);
        self.reply.clone()
    }
}

pub struct StaticExtractor {
    text: String,
    media_types: Mutex<Vec<String>>,
}

impl StaticExtractor {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            media_types: Mutex::new(Vec::new()),
        }
    }

    pub fn media_types(&self) -> Vec<String> {
        self.media_types.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextExtractor for StaticExtractor {
    async fn extract_text(&self, _bytes: &[u8], media_type: &str) -> Result<String> {
        self.media_types
            .lock()
            .unwrap()
            .push(media_type.to_string());
        Ok(self.text.clone())
    }
}
