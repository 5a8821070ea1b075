//! Rule-based triage over a [`ClinicalRecord`].

use serde::{Deserialize, Serialize};

use crate::record::{ClinicalRecord, Severity};

/// Recommendation tiers, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    HomeMedication,
    DoctorVisit,
    Admission,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommendation: Tier,
    pub confidence: f64,
    pub reasoning: String,
    pub suggested_actions: Vec<String>,
}

/// Substring rules evaluated against the record's text. Matching is not
/// whole-word, so short keywords such as `bp` can fire inside other words.
pub const KEYWORD_RULES: &[(&str, Tier)] = &[
    ("severe", Tier::Admission),
    ("critical", Tier::Admission),
    ("emergency", Tier::Admission),
    ("urgent", Tier::Admission),
    ("acute", Tier::Admission),
    ("heart attack", Tier::Admission),
    ("stroke", Tier::Admission),
    ("pneumonia", Tier::Admission),
    ("sepsis", Tier::Admission),
    ("infection", Tier::Admission),
    ("high fever", Tier::Admission),
    ("chest pain", Tier::Admission),
    ("difficulty breathing", Tier::Admission),
    ("unconscious", Tier::Admission),
    ("blood pressure", Tier::Admission),
    ("bp", Tier::Admission),
    ("heart rate", Tier::Admission),
    ("pulse", Tier::Admission),
    ("surgery", Tier::Admission),
    ("moderate", Tier::DoctorVisit),
    ("abnormal", Tier::DoctorVisit),
    ("elevated", Tier::DoctorVisit),
    ("increased", Tier::DoctorVisit),
    ("decreased", Tier::DoctorVisit),
    ("pain", Tier::DoctorVisit),
    ("inflammation", Tier::DoctorVisit),
    ("fever", Tier::DoctorVisit),
    ("consult", Tier::DoctorVisit),
    ("follow up", Tier::DoctorVisit),
    ("examination", Tier::DoctorVisit),
    ("test results", Tier::DoctorVisit),
];

impl Tier {
    pub fn confidence(self) -> f64 {
        match self {
            Tier::Admission => 0.85,
            Tier::DoctorVisit => 0.75,
            Tier::HomeMedication => 0.65,
        }
    }

    pub fn reasoning(self) -> &'static str {
        match self {
            Tier::Admission => {
                "Based on the severity and critical indicators in your report, immediate hospital admission is recommended."
            }
            Tier::DoctorVisit => {
                "Your medical report indicates moderate concerns that require professional medical consultation."
            }
            Tier::HomeMedication => {
                "Based on your report, the condition appears manageable with appropriate home care and medication."
            }
        }
    }

    pub fn suggested_actions(self) -> [&'static str; 4] {
        match self {
            Tier::Admission => [
                "Seek immediate medical attention at the nearest hospital",
                "Call emergency services if symptoms worsen",
                "Do not delay treatment",
                "Inform family members about your condition",
            ],
            Tier::DoctorVisit => [
                "Schedule an appointment with your doctor as soon as possible",
                "Bring this report to your consultation",
                "Follow any prescribed medication or treatment plan",
                "Monitor your symptoms and report any changes",
            ],
            Tier::HomeMedication => [
                "Follow the recommended medication schedule",
                "Rest and maintain good hydration",
                "Monitor your symptoms",
                "Contact a healthcare provider if symptoms persist or worsen",
            ],
        }
    }

    fn from_severity(severity: Severity) -> Self {
        match severity {
            Severity::Critical | Severity::High => Tier::Admission,
            Severity::Moderate => Tier::DoctorVisit,
            Severity::Low => Tier::HomeMedication,
        }
    }
}

impl From<Tier> for Recommendation {
    fn from(tier: Tier) -> Self {
        Self {
            recommendation: tier,
            confidence: tier.confidence(),
            reasoning: tier.reasoning().to_string(),
            suggested_actions: tier
                .suggested_actions()
                .iter()
                .map(|action| action.to_string())
                .collect(),
        }
    }
}

/// Most urgent tier whose keyword appears in `text`.
pub fn keyword_tier(text: &str) -> Option<Tier> {
    KEYWORD_RULES
        .iter()
        .filter(|(keyword, _)| text.contains(keyword))
        .map(|(_, tier)| *tier)
        .max()
}

/// Maps a clinical record to a recommendation.
///
/// The declared severity and the keyword scan are combined by taking the more
/// urgent of the two, so a keyword can escalate a low-severity record but
/// never downgrade a high one.
pub fn classify(record: &ClinicalRecord) -> Recommendation {
    let text = record
        .conditions
        .iter()
        .chain(&record.symptoms)
        .chain(&record.test_results)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let tier = keyword_tier(&text)
        .into_iter()
        .chain(Some(Tier::from_severity(record.severity)))
        .max()
        .unwrap_or(Tier::HomeMedication);

    Recommendation::from(tier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn critical_severity_admits() {
        let record = ClinicalRecord {
            severity: Severity::Critical,
            conditions: strings(&["Severe neutropenia"]),
            ..Default::default()
        };
        let recommendation = classify(&record);
        assert_eq!(recommendation.recommendation, Tier::Admission);
        assert_eq!(recommendation.confidence, 0.85);
        assert_eq!(recommendation.suggested_actions.len(), 4);
    }

    #[test]
    fn high_severity_admits_without_keywords() {
        let record = ClinicalRecord {
            severity: Severity::High,
            test_results: strings(&["ANC 700"]),
            ..Default::default()
        };
        assert_eq!(classify(&record).recommendation, Tier::Admission);
    }

    #[test]
    fn mild_record_without_keywords_stays_home() {
        let record = ClinicalRecord {
            severity: Severity::Low,
            conditions: strings(&["Mild symptoms"]),
            symptoms: strings(&["General discomfort"]),
            ..Default::default()
        };
        let recommendation = classify(&record);
        assert_eq!(recommendation.recommendation, Tier::HomeMedication);
        assert_eq!(recommendation.confidence, 0.65);
        assert_eq!(
            recommendation.reasoning,
            "Based on your report, the condition appears manageable with appropriate home care and medication."
        );
    }

    #[test]
    fn keyword_overrides_low_severity() {
        let record = ClinicalRecord {
            severity: Severity::Low,
            symptoms: strings(&["chest pain"]),
            ..Default::default()
        };
        let recommendation = classify(&record);
        assert_eq!(recommendation.recommendation, Tier::Admission);
        assert_eq!(recommendation.confidence, 0.85);
    }

    #[test]
    fn moderate_severity_or_keyword_sends_to_doctor() {
        let record = ClinicalRecord {
            severity: Severity::Moderate,
            conditions: strings(&["Mild neutropenia"]),
            ..Default::default()
        };
        assert_eq!(classify(&record).recommendation, Tier::DoctorVisit);

        let record = ClinicalRecord {
            test_results: strings(&["Elevated CRP"]),
            ..Default::default()
        };
        let recommendation = classify(&record);
        assert_eq!(recommendation.recommendation, Tier::DoctorVisit);
        assert_eq!(recommendation.confidence, 0.75);
        assert_eq!(
            recommendation.suggested_actions[1],
            "Bring this report to your consultation"
        );
    }

    #[test]
    fn keywords_match_inside_words() {
        assert_eq!(keyword_tier("subpopulation"), Some(Tier::Admission));
        assert_eq!(keyword_tier("painful joints"), Some(Tier::DoctorVisit));
        assert_eq!(keyword_tier("normal neutrophil count"), None);
    }

    #[test]
    fn keywords_are_matched_case_insensitively() {
        let record = ClinicalRecord {
            conditions: strings(&["Suspected SEPSIS"]),
            ..Default::default()
        };
        assert_eq!(classify(&record).recommendation, Tier::Admission);
    }

    #[test]
    fn normal_anc_record_stays_home() {
        let record = ClinicalRecord {
            conditions: strings(&["Normal neutrophil count"]),
            test_results: strings(&["Absolute Neutrophil Count (ANC): 2300 per microliter"]),
            ..Default::default()
        };
        assert_eq!(classify(&record).recommendation, Tier::HomeMedication);
    }

    #[test]
    fn empty_record_defaults_to_home_medication() {
        assert_eq!(
            classify(&ClinicalRecord::default()).recommendation,
            Tier::HomeMedication
        );
    }

    #[test]
    fn classification_is_pure() {
        let record = ClinicalRecord {
            severity: Severity::Moderate,
            symptoms: strings(&["fever", "cough"]),
            ..Default::default()
        };
        let first = classify(&record);
        for _ in 0..5 {
            assert_eq!(classify(&record), first);
        }
    }

    #[test]
    fn tier_serializes_to_wire_labels() {
        let json = serde_json::to_value(Recommendation::from(Tier::DoctorVisit)).unwrap();
        assert_eq!(json["recommendation"], "DOCTOR_VISIT");
        assert_eq!(json["confidence"], 0.75);
        assert_eq!(
            serde_json::to_value(Tier::HomeMedication).unwrap(),
            "HOME_MEDICATION"
        );
    }
}
