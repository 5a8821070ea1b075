use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::TextExtractor;
use crate::error::Result;
use crate::llm::{Attachment, ModelRequest, ReportModel};
use crate::prompt::TRANSCRIBE_INSTRUCTIONS;

const TRANSCRIBE_MAX_TOKENS: u32 = 4000;

/// Transcribes a report image to plain text with a vision model.
pub struct VisionTranscriber {
    model: Arc<dyn ReportModel>,
}

impl VisionTranscriber {
    pub fn new(model: Arc<dyn ReportModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl TextExtractor for VisionTranscriber {
    async fn extract_text(&self, bytes: &[u8], media_type: &str) -> Result<String> {
        info!(model = self.model.name(), media_type, "Transcribing report image");

        let request = ModelRequest::text(TRANSCRIBE_INSTRUCTIONS)
            .with_max_tokens(TRANSCRIBE_MAX_TOKENS)
            .with_attachment(Attachment::new(media_type, bytes));

        let text = self.model.invoke(request).await?;
        info!(characters = text.len(), "Vision transcription completed");
        Ok(text)
    }
}
