use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Severity tag attached to every clinical record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Case-insensitive parse; anything unrecognized is `Low`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "moderate" => Severity::Moderate,
            _ => Severity::Low,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(label)) => Severity::from_label(&label),
            _ => Severity::Low,
        })
    }
}

/// Outcome classes of the ANC answer span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    Success,
    NotFound,
    Unclear,
    ParseError,
    Unknown,
}

impl fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExtractionStatus::Success => "success",
            ExtractionStatus::NotFound => "not_found",
            ExtractionStatus::Unclear => "unclear",
            ExtractionStatus::ParseError => "parse_error",
            ExtractionStatus::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Result of reading the ANC out of one model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    pub value: Option<f64>,
    pub status: ExtractionStatus,
    pub raw_response: String,
    pub answer_span: Option<String>,
}

/// Structured view of a report, consumed by the triage classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicalRecord {
    #[serde(default, deserialize_with = "lenient_strings")]
    pub conditions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub symptoms: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub test_results: Vec<String>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_metadata: Option<ExtractionOutcome>,
}

impl ClinicalRecord {
    /// Record used when no model is configured for the text path.
    pub fn mock() -> Self {
        Self {
            conditions: vec!["Mild symptoms".to_string()],
            symptoms: vec!["General discomfort".to_string()],
            ..Self::default()
        }
    }

    /// Record used when the text path cannot produce a structured answer.
    pub fn unparsed() -> Self {
        Self {
            conditions: vec!["Unable to parse".to_string()],
            summary: "Error parsing report".to_string(),
            ..Self::default()
        }
    }
}

fn render(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Models sometimes return objects or numbers inside list fields; keep them as text.
fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.into_iter().filter_map(render).collect(),
        Some(other) => render(other).into_iter().collect(),
        None => Vec::new(),
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(render).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_defaults_to_low_when_missing_or_unknown() {
        let record: ClinicalRecord = serde_json::from_str(r#"{"conditions": ["x"]}"#).unwrap();
        assert_eq!(record.severity, Severity::Low);

        let record: ClinicalRecord = serde_json::from_str(r#"{"severity": "severe"}"#).unwrap();
        assert_eq!(record.severity, Severity::Low);

        let record: ClinicalRecord = serde_json::from_str(r#"{"severity": null}"#).unwrap();
        assert_eq!(record.severity, Severity::Low);
    }

    #[test]
    fn severity_is_case_insensitive() {
        let record: ClinicalRecord = serde_json::from_str(r#"{"severity": "HIGH"}"#).unwrap();
        assert_eq!(record.severity, Severity::High);
        assert_eq!(Severity::from_label(" Moderate "), Severity::Moderate);
    }

    #[test]
    fn list_fields_tolerate_odd_shapes() {
        let record: ClinicalRecord = serde_json::from_str(
            r#"{
                "conditions": null,
                "test_results": [{"name": "WBC", "value": 3.2}, "Hb 12 g/dL", null],
                "symptoms": "fatigue",
                "summary": null
            }"#,
        )
        .unwrap();

        assert!(record.conditions.is_empty());
        assert_eq!(
            record.test_results,
            vec![r#"{"name":"WBC","value":3.2}"#.to_string(), "Hb 12 g/dL".to_string()]
        );
        assert_eq!(record.symptoms, vec!["fatigue".to_string()]);
        assert_eq!(record.summary, "");
    }

    #[test]
    fn metadata_is_omitted_from_json_when_absent() {
        let json = serde_json::to_value(ClinicalRecord::mock()).unwrap();
        assert!(json.get("extraction_metadata").is_none());
        assert_eq!(json["severity"], "low");
    }
}
