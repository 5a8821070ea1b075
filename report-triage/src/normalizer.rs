//! Recovers the answer from free-form model output.
//!
//! The extraction prompt asks the model to wrap its final answer in
//! `<answer>` tags. Everything outside the tags is reasoning and ignored.

use crate::numeric::extract_value;
use crate::record::{ExtractionOutcome, ExtractionStatus};

pub const ANSWER_OPEN: &str = "<answer>";
pub const ANSWER_CLOSE: &str = "</answer>";

/// Returns the trimmed text between the answer markers, if both are present.
pub fn answer_span(response: &str) -> Option<&str> {
    if !response.contains(ANSWER_OPEN) || !response.contains(ANSWER_CLOSE) {
        return None;
    }

    let start = response.find(ANSWER_OPEN)? + ANSWER_OPEN.len();
    let rest = &response[start..];
    let span = match rest.find(ANSWER_CLOSE) {
        Some(end) => &rest[..end],
        None => rest,
    };
    Some(span.trim())
}

/// Classifies a raw model response into an [`ExtractionOutcome`].
pub fn normalize(response: &str) -> ExtractionOutcome {
    let raw_response = response.trim().to_string();
    let span = answer_span(&raw_response).map(str::to_string);
    let (value, status) = match &span {
        Some(span) => classify_span(span),
        None => (None, ExtractionStatus::Unknown),
    };

    ExtractionOutcome {
        value,
        status,
        raw_response,
        answer_span: span,
    }
}

fn classify_span(span: &str) -> (Option<f64>, ExtractionStatus) {
    let lowered = span.to_lowercase();
    if lowered.contains("not found") {
        return (None, ExtractionStatus::NotFound);
    }
    if lowered.contains("too unclear") || lowered.contains("unreadable") {
        return (None, ExtractionStatus::Unclear);
    }

    match extract_value(span) {
        Some(Ok(value)) => (Some(value), ExtractionStatus::Success),
        Some(Err(_)) => (None, ExtractionStatus::ParseError),
        None => (None, ExtractionStatus::Unknown),
    }
}
