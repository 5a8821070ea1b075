use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{InterpretError, Result};
use crate::llm::{Attachment, ModelRequest, ReportModel};
use crate::media::detect_image_media_type;
use crate::normalizer::normalize;
use crate::prompt::TemplateSource;
use crate::record::{ClinicalRecord, ExtractionOutcome, ExtractionStatus, Severity};

const ANC_MAX_TOKENS: u32 = 1024;

/// Reads the absolute neutrophil count from a CBC report image.
#[derive(Clone)]
pub struct ReportInterpreter {
    model: Option<Arc<dyn ReportModel>>,
    template: TemplateSource,
}

impl ReportInterpreter {
    pub fn new(model: Option<Arc<dyn ReportModel>>, template: TemplateSource) -> Self {
        Self { model, template }
    }

    /// Extracts the ANC with one model call and maps it to a clinical record.
    ///
    /// Fails fast when no model is configured; the image path never invents
    /// clinical data.
    pub async fn interpret_image_report(&self, image: &[u8]) -> Result<ClinicalRecord> {
        let outcome = self.extract_anc(image).await?;
        info!(
            status = %outcome.status,
            value = ?outcome.value,
            "ANC extraction finished"
        );
        Ok(record_from_outcome(outcome))
    }

    pub async fn extract_anc(&self, image: &[u8]) -> Result<ExtractionOutcome> {
        let model = self.model.as_ref().ok_or_else(|| {
            InterpretError::Configuration(
                "Model API key not set. Please set OPENROUTER_API_KEY environment variable."
                    .to_string(),
            )
        })?;

        let media_type = detect_image_media_type(image);
        let instructions = self.template.render().await?;

        info!(
            model = model.name(),
            media_type,
            bytes = image.len(),
            "Extracting ANC from CBC report image"
        );

        let request = ModelRequest::text(instructions)
            .with_max_tokens(ANC_MAX_TOKENS)
            .with_attachment(Attachment::new(media_type, image));

        let response = model.invoke(request).await.map_err(|e| {
            warn!("Error extracting ANC from CBC image: {}", e);
            InterpretError::from(e)
        })?;

        Ok(normalize(&response))
    }
}

fn band(value: f64) -> (Severity, &'static str, String) {
    if value < 500.0 {
        (
            Severity::Critical,
            "Severe neutropenia",
            format!(
                "Critical: Severe neutropenia detected (ANC: {value:?} per microliter). Immediate medical attention required."
            ),
        )
    } else if value < 1000.0 {
        (
            Severity::High,
            "Moderate neutropenia",
            format!(
                "High severity: Moderate neutropenia detected (ANC: {value:?} per microliter). Medical consultation recommended."
            ),
        )
    } else if value < 1500.0 {
        (
            Severity::Moderate,
            "Mild neutropenia",
            format!(
                "Moderate: Mild neutropenia detected (ANC: {value:?} per microliter). Monitor and consult healthcare provider."
            ),
        )
    } else {
        (
            Severity::Low,
            "Normal neutrophil count",
            format!("Normal ANC value: {value:?} per microliter."),
        )
    }
}

/// Builds the clinical record for an extraction outcome.
///
/// Failed extractions keep severity `low`, which the classifier cannot tell
/// apart from a confirmed normal count.
pub fn record_from_outcome(outcome: ExtractionOutcome) -> ClinicalRecord {
    let mut record = ClinicalRecord::default();

    match (outcome.status, outcome.value) {
        (ExtractionStatus::Success, Some(value)) => {
            let (severity, condition, summary) = band(value);
            record.severity = severity;
            record.conditions = vec![condition.to_string()];
            record.test_results = vec![format!(
                "Absolute Neutrophil Count (ANC): {value:?} per microliter"
            )];
            record.summary = summary;
        }
        (ExtractionStatus::NotFound, _) => {
            record.summary =
                "Absolute Neutrophil Count not found in the CBC report image.".to_string();
            record.test_results = vec!["ANC extraction: Not found in image".to_string()];
        }
        (ExtractionStatus::Unclear, _) => {
            record.summary =
                "Image quality too poor to read the Absolute Neutrophil Count.".to_string();
            record.test_results = vec!["ANC extraction: Image unclear".to_string()];
        }
        // The normalizer only reports success with a value attached.
        (status, _) => {
            debug_assert_ne!(status, ExtractionStatus::Success, "success without a value");
            record.summary = format!("ANC extraction status: {status}");
            record.test_results = vec![format!("ANC extraction: {status}")];
        }
    }

    record.extraction_metadata = Some(outcome);
    record
}
