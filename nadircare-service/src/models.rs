use serde::Serialize;

/// Content types accepted by `POST /upload`.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "text/plain"];

/// Which interpreter handles an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportModality {
    Image,
    Text,
}

impl ReportModality {
    /// Maps a request content type (parameters ignored) to a modality.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        match essence.as_str() {
            "image/jpeg" | "image/jpg" | "image/png" => Some(ReportModality::Image),
            "text/plain" => Some(ReportModality::Text),
            _ => None,
        }
    }
}

/// The `file` part of a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedReport {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}
