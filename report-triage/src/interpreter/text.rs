use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use super::TextExtractor;
use crate::error::{InterpretError, ProviderError, Result};
use crate::llm::{ModelRequest, ReportModel};
use crate::media::detect_image_media_type;
use crate::prompt::{TEXT_ANALYZER_SYSTEM, structuring_prompt};
use crate::record::ClinicalRecord;

const STRUCTURING_MAX_TOKENS: u32 = 1000;

/// Structures free report text into a [`ClinicalRecord`].
///
/// This path never fails: without a model it returns [`ClinicalRecord::mock`],
/// and any provider or parse failure becomes [`ClinicalRecord::unparsed`].
#[derive(Clone, Default)]
pub struct TextReportInterpreter {
    model: Option<Arc<dyn ReportModel>>,
    extractor: Option<Arc<dyn TextExtractor>>,
}

impl TextReportInterpreter {
    pub fn new(model: Option<Arc<dyn ReportModel>>) -> Self {
        Self {
            model,
            extractor: None,
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub async fn interpret_text_report(&self, text: &str) -> ClinicalRecord {
        let Some(model) = &self.model else {
            warn!("Model API key not set. Using mock data.");
            return ClinicalRecord::mock();
        };

        match structure(model.as_ref(), text).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Error parsing with model: {}", e);
                ClinicalRecord::unparsed()
            }
        }
    }

    /// Runs the upstream extractor on a binary document, then structures the text.
    ///
    /// Extraction failures propagate; only structuring degrades to a fallback.
    pub async fn interpret_document(&self, bytes: &[u8]) -> Result<ClinicalRecord> {
        let extractor = self.extractor.as_ref().ok_or_else(|| {
            InterpretError::Configuration(
                "Document text extraction is not available: no extractor configured".to_string(),
            )
        })?;

        let media_type = detect_image_media_type(bytes);
        let text = extractor.extract_text(bytes, media_type).await?;
        if text.trim().is_empty() {
            return Err(InterpretError::Extraction(
                "No text extracted from document".to_string(),
            ));
        }

        info!(characters = text.len(), "Extracted document text");
        Ok(self.interpret_text_report(&text).await)
    }
}

#[derive(Debug, Error)]
enum StructuringFailure {
    #[error(transparent)]
    Provider(ProviderError),
    #[error("invalid JSON record: {0}")]
    Json(serde_json::Error),
}

async fn structure(
    model: &dyn ReportModel,
    text: &str,
) -> std::result::Result<ClinicalRecord, StructuringFailure> {
    let request = ModelRequest::text(structuring_prompt(text))
        .with_system(TEXT_ANALYZER_SYSTEM)
        .with_max_tokens(STRUCTURING_MAX_TOKENS);

    let response = model
        .invoke(request)
        .await
        .map_err(StructuringFailure::Provider)?;

    serde_json::from_str(strip_code_fence(&response)).map_err(StructuringFailure::Json)
}

/// Removes a Markdown code fence around a JSON answer.
///
/// A ```` ```json ```` fence is preferred; otherwise the first bare fence is
/// used. Text without a fence is returned trimmed.
pub fn strip_code_fence(response: &str) -> &str {
    let response = response.trim();
    if let Some((_, rest)) = response.split_once("```json") {
        return fence_body(rest);
    }
    if let Some((_, rest)) = response.split_once("```") {
        return fence_body(rest);
    }
    response
}

fn fence_body(rest: &str) -> &str {
    rest.split("```").next().unwrap_or(rest).trim()
}
