//! Numeric value extraction from a model's answer span.

use regex::Regex;
use std::num::ParseFloatError;
use std::sync::LazyLock;

static UNIT_ANCHORED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([\d,]+\.?\d*)\s*(?:(?:per\s+)?micro-?lit(?:er|re)|/\s*(?:µl|μl|mcl|ul)\b)",
    )
    .expect("unit-anchored pattern is valid")
});

static BARE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d,]+\.?\d*").expect("bare number pattern is valid"));

/// Finds the value in `span`.
///
/// A number written next to a per-microliter unit wins; otherwise the first
/// number-like token is used. Returns `None` when the span holds no digits or
/// separators at all, and `Some(Err(_))` when the matched token does not parse.
pub fn extract_value(span: &str) -> Option<Result<f64, ParseFloatError>> {
    let token = UNIT_ANCHORED
        .captures(span)
        .and_then(|caps| caps.get(1))
        .or_else(|| BARE_NUMBER.find(span))?;

    Some(parse_number(token.as_str()))
}

fn parse_number(token: &str) -> Result<f64, ParseFloatError> {
    token.replace(',', "").parse::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(span: &str) -> Option<f64> {
        extract_value(span).and_then(|r| r.ok())
    }

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(value("1,234 per microliter"), Some(1234.0));
        assert_eq!(value("ANC is 12,500.5 microliters"), Some(12500.5));
    }

    #[test]
    fn unit_anchored_number_beats_earlier_numbers() {
        let span = "Row 3 of the CBC: 850 per microliter (ref 1500-8000)";
        assert_eq!(value(span), Some(850.0));
    }

    #[test]
    fn unit_phrase_is_case_insensitive() {
        assert_eq!(value("2100 PER MICROLITER"), Some(2100.0));
        assert_eq!(value("2100 Microlitre"), Some(2100.0));
        assert_eq!(value("1,800/µL"), Some(1800.0));
        assert_eq!(value("640 /uL"), Some(640.0));
    }

    #[test]
    fn falls_back_to_first_bare_number() {
        assert_eq!(value("The count reads 3.4 thousand"), Some(3.4));
    }

    #[test]
    fn separator_only_token_is_a_parse_failure() {
        assert!(matches!(extract_value("Yes, see below"), Some(Err(_))));
    }

    #[test]
    fn no_number_yields_none() {
        assert!(extract_value("no value present").is_none());
    }

    #[test]
    fn extraction_is_deterministic() {
        let span = "approximately 1,050 per microliter";
        let first = value(span);
        for _ in 0..10 {
            assert_eq!(value(span), first);
        }
    }
}
