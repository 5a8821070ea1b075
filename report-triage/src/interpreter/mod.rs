//! Stage one of the pipeline: unstructured report in, [`ClinicalRecord`] out.
//!
//! [`ClinicalRecord`]: crate::record::ClinicalRecord

pub mod image;
pub mod ocr;
pub mod text;

use async_trait::async_trait;

use crate::error::Result;

pub use image::{ReportInterpreter, record_from_outcome};
pub use ocr::VisionTranscriber;
pub use text::{TextReportInterpreter, strip_code_fence};

/// Upstream collaborator that turns a binary document into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, bytes: &[u8], media_type: &str) -> Result<String>;
}
