use report_triage::llm::{AgentModel, OpenRouterModel};
use report_triage::{ProviderError, ReportModel, TemplateSource};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_VISION_MODEL: &str = "anthropic/claude-haiku-4.5";
pub const DEFAULT_TEXT_MODEL: &str = "anthropic/claude-3.5-sonnet";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_PROMPT_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/anc_extraction_prompt.txt");

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Could not initialize model client: {0}")]
    Model(#[from] ProviderError),
}

/// Service settings, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,
    pub vision_model: String,
    pub text_model: String,
    pub prompt_path: PathBuf,
    pub model_timeout_secs: Option<u64>,
    pub max_upload_bytes: usize,
    pub port: u16,
}

/// Model handles built once at startup and shared by every request.
#[derive(Clone, Default)]
pub struct Models {
    pub vision: Option<Arc<dyn ReportModel>>,
    pub text: Option<Arc<dyn ReportModel>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            prompt_path: PathBuf::from(DEFAULT_PROMPT_PATH),
            model_timeout_secs: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            api_key: non_empty("OPENROUTER_API_KEY"),
            vision_model: non_empty("VISION_MODEL").unwrap_or(defaults.vision_model),
            text_model: non_empty("TEXT_MODEL").unwrap_or(defaults.text_model),
            prompt_path: non_empty("ANC_PROMPT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.prompt_path),
            model_timeout_secs: non_empty("MODEL_TIMEOUT_SECS")
                .and_then(|value| parse_or_warn("MODEL_TIMEOUT_SECS", &value)),
            max_upload_bytes: non_empty("MAX_UPLOAD_BYTES")
                .and_then(|value| parse_or_warn("MAX_UPLOAD_BYTES", &value))
                .unwrap_or(defaults.max_upload_bytes),
            port: non_empty("PORT")
                .and_then(|value| parse_or_warn("PORT", &value))
                .unwrap_or(defaults.port),
        }
    }

    pub fn template_source(&self) -> TemplateSource {
        TemplateSource::File(self.prompt_path.clone())
    }

    /// Builds the model clients. Without an API key both handles are `None`.
    pub fn build_models(&self) -> Result<Models, StartupError> {
        let Some(api_key) = &self.api_key else {
            return Ok(Models::default());
        };

        let vision = OpenRouterModel::with_timeout(
            api_key.as_str(),
            self.vision_model.as_str(),
            self.model_timeout_secs,
        )?;
        let text = AgentModel::new(api_key, self.text_model.as_str(), self.model_timeout_secs)?;

        Ok(Models {
            vision: Some(Arc::new(vision)),
            text: Some(Arc::new(text)),
        })
    }
}

fn parse_or_warn<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring invalid {} value: {}", key, value);
            None
        }
    }
}
