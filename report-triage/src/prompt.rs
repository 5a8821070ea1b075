//! Instruction templates and prompt builders.

use std::path::PathBuf;

use crate::error::{InterpretError, Result};

/// Placeholder in the ANC template that stands for the attached image.
pub const IMAGE_PLACEHOLDER: &str = "{{IMAGE}}";
/// Text substituted for [`IMAGE_PLACEHOLDER`].
pub const IMAGE_REFERENCE: &str = "[The CBC report image is provided below]";

pub const TEXT_ANALYZER_SYSTEM: &str =
    "You are a medical report analyzer. Extract structured information from medical reports.";

pub const TRANSCRIBE_INSTRUCTIONS: &str = "You are an expert medical document OCR system. \
Extract ALL text from the attached medical report image with perfect accuracy, preserving the \
structure, table layout, units and medical terminology. \
Return ONLY the extracted text without any commentary or explanations.";

/// Where the ANC extraction template comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateSource {
    /// Read from disk on every request.
    File(PathBuf),
    Inline(String),
}

impl TemplateSource {
    pub async fn load(&self) -> Result<String> {
        match self {
            TemplateSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|source| InterpretError::Template {
                    path: path.clone(),
                    source,
                }),
            TemplateSource::Inline(text) => Ok(text.clone()),
        }
    }

    /// Loads the template and fills in the image placeholder.
    pub async fn render(&self) -> Result<String> {
        Ok(self.load().await?.replace(IMAGE_PLACEHOLDER, IMAGE_REFERENCE))
    }
}

/// Prompt asking the model to structure already-extracted report text.
pub fn structuring_prompt(report_text: &str) -> String {
    format!(
        r#"Analyze the following medical report text and extract structured information.
Return a JSON object with the following structure:
{{
    "conditions": ["list of medical conditions found"],
    "test_results": ["list of test results with values"],
    "symptoms": ["list of symptoms mentioned"],
    "severity": "low|moderate|high|critical",
    "summary": "brief summary of the report"
}}

Medical Report Text:
{report_text}

Only return the JSON object, no additional text."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn renders_image_placeholder() {
        let source = TemplateSource::Inline("Look at {{IMAGE}} and answer.".to_string());
        assert_eq!(
            source.render().await.unwrap(),
            "Look at [The CBC report image is provided below] and answer."
        );
    }

    #[tokio::test]
    async fn missing_template_file_is_a_template_error() {
        let source = TemplateSource::File(PathBuf::from("/nonexistent/anc_prompt.txt"));
        let err = source.render().await.unwrap_err();
        assert!(matches!(err, InterpretError::Template { .. }));
        assert!(err.to_string().contains("/nonexistent/anc_prompt.txt"));
    }

    #[test]
    fn structuring_prompt_embeds_report_text() {
        let prompt = structuring_prompt("WBC 2.1 x10^9/L");
        assert!(prompt.contains("Medical Report Text:\nWBC 2.1 x10^9/L"));
        assert!(prompt.contains(r#""severity": "low|moderate|high|critical""#));
    }
}
