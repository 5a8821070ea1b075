use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use report_triage::{
    ClinicalRecord, InterpretError, Recommendation, ReportInterpreter, TextReportInterpreter,
    classify,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::config::{Config, StartupError};
use crate::models::{ErrorResponse, ReportModality, UploadedReport};

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn bad_request_error(detail: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}

fn internal_error(detail: impl Into<String>) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}

fn interpretation_error(e: InterpretError) -> ApiError {
    match e {
        InterpretError::Configuration(_) | InterpretError::Template { .. } => {
            error!("Setup error: {}", e);
            internal_error(e.to_string())
        }
        other => {
            error!("Error processing file: {}", other);
            internal_error(format!("Error processing report: {}", other))
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub report_interpreter: Arc<ReportInterpreter>,
    pub text_interpreter: Arc<TextReportInterpreter>,
}

impl AppState {
    pub fn new(
        report_interpreter: ReportInterpreter,
        text_interpreter: TextReportInterpreter,
    ) -> Self {
        Self {
            report_interpreter: Arc::new(report_interpreter),
            text_interpreter: Arc::new(text_interpreter),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let models = config.build_models()?;
        Ok(Self::new(
            ReportInterpreter::new(models.vision, config.template_source()),
            TextReportInterpreter::new(models.text),
        ))
    }
}

pub fn create_app(config: &Config) -> Result<Router, StartupError> {
    let app_state = AppState::from_config(config)?;
    Ok(build_router(app_state, config.max_upload_bytes))
}

pub fn build_router(app_state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/upload", post(upload_report))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "NadirCare API is running" }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Accepts a multipart report upload and returns a triage recommendation.
async fn upload_report(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Recommendation> {
    let upload = read_upload(&mut multipart).await?;
    let modality = validate_content_type(upload.content_type.as_deref())?;

    let span = info_span!("upload", request_id = %Uuid::new_v4());
    let record = interpret(&state, modality, &upload).instrument(span).await?;

    Ok(Json(classify(&record)))
}

async fn read_upload(multipart: &mut Multipart) -> Result<UploadedReport, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request_error(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("report").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request_error(format!("Could not read uploaded file: {}", e)))?;

        return Ok(UploadedReport {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(bad_request_error("No file uploaded"))
}

fn validate_content_type(content_type: Option<&str>) -> Result<ReportModality, ApiError> {
    let content_type = content_type
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| bad_request_error("File type not recognized"))?;

    ReportModality::from_content_type(content_type).ok_or_else(|| {
        bad_request_error(format!(
            "File type {} not supported. Please upload JPG, PNG or plain text.",
            content_type.to_lowercase()
        ))
    })
}

async fn interpret(
    state: &AppState,
    modality: ReportModality,
    upload: &UploadedReport,
) -> Result<ClinicalRecord, ApiError> {
    info!(
        file_name = %upload.file_name,
        ?modality,
        bytes = upload.bytes.len(),
        "Processing uploaded report"
    );

    let record = match modality {
        ReportModality::Image => state
            .report_interpreter
            .interpret_image_report(&upload.bytes)
            .await
            .map_err(interpretation_error)?,
        ReportModality::Text => {
            let text = String::from_utf8_lossy(&upload.bytes);
            state.text_interpreter.interpret_text_report(&text).await
        }
    };

    info!(severity = %record.severity, "Report interpreted");
    Ok(record)
}
