//! Two-stage interpretation of medical lab reports.
//!
//! Stage one turns a report (a CBC image, or free text) into a
//! [`ClinicalRecord`] through an external language model. Stage two,
//! [`triage::classify`], maps the record to a recommendation tier with a
//! fixed rule table.

pub mod error;
pub mod interpreter;
pub mod llm;
pub mod media;
pub mod normalizer;
pub mod numeric;
pub mod prompt;
pub mod record;
pub mod triage;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use error::{InterpretError, ProviderError, Result};
pub use interpreter::{ReportInterpreter, TextExtractor, TextReportInterpreter, VisionTranscriber};
pub use llm::{Attachment, ModelRequest, ReportModel};
pub use prompt::TemplateSource;
pub use record::{ClinicalRecord, ExtractionOutcome, ExtractionStatus, Severity};
pub use triage::{Recommendation, Tier, classify};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedModel;
    use std::sync::Arc;

    #[tokio::test]
    async fn image_report_flows_through_to_admission() -> anyhow::Result<()> {
        let model = Arc::new(ScriptedModel::replying(
            "Neutrophils (absolute) row found.\n<answer>320 per microliter</answer>",
        ));
        let interpreter = ReportInterpreter::new(
            Some(model),
            TemplateSource::Inline("Extract ANC from {{IMAGE}}".to_string()),
        );

        let record = interpreter
            .interpret_image_report(&[0xFF, 0xD8, 0xFF, 0xE0])
            .await?;
        let recommendation = classify(&record);

        assert_eq!(record.severity, Severity::Critical);
        assert_eq!(recommendation.recommendation, Tier::Admission);
        assert_eq!(recommendation.confidence, 0.85);
        Ok(())
    }

    #[tokio::test]
    async fn unconfigured_text_path_recommends_home_care() {
        let record = TextReportInterpreter::new(None)
            .interpret_text_report("Patient feels tired")
            .await;
        let recommendation = classify(&record);

        assert_eq!(recommendation.recommendation, Tier::HomeMedication);
        assert_eq!(recommendation.confidence, 0.65);
    }

    #[tokio::test]
    async fn failed_extraction_looks_like_normal_to_the_classifier() {
        let model = Arc::new(ScriptedModel::replying("<answer>Not found</answer>"));
        let interpreter = ReportInterpreter::new(
            Some(model),
            TemplateSource::Inline("{{IMAGE}}".to_string()),
        );

        let record = interpreter.interpret_image_report(b"scan").await.unwrap();
        assert_eq!(classify(&record).recommendation, Tier::HomeMedication);
    }
}
