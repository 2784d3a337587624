//! Forgiving decoders for numbers typed in by hand.
//!
//! Stored grade data may have been edited outside the tool or written
//! half-finished. Instead of rejecting the whole blob, malformed numbers
//! degrade to 0 and blank grades count as ungraded.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Interpret a textual grade: blank is ungraded, unparseable is 0.
pub fn parse_grade_text(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Some(finite_or_zero(s.parse().unwrap_or(0.0)))
}

/// Interpret a textual weight: anything unparseable (including blank) is 0.
pub fn parse_weight_text(s: &str) -> f64 {
    finite_or_zero(s.trim().parse().unwrap_or(0.0))
}

/// Map NaN and infinities to 0 so a single bad value cannot poison a sum.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub fn grade<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(RawNumber::Number(n)) => Some(finite_or_zero(n)),
        Some(RawNumber::Text(s)) => parse_grade_text(&s),
        Some(RawNumber::Other(_)) => Some(0.0),
    })
}

pub fn weight<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawNumber::Number(n)) => finite_or_zero(n),
        Some(RawNumber::Text(s)) => parse_weight_text(&s),
        Some(RawNumber::Other(_)) | None => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::Activity;

    fn parse_activity(fields: &str) -> Activity {
        let json = format!(r#"{{ "id": "a1", "name": "Quiz", {} }}"#, fields);
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_grade_text_blank_is_ungraded() {
        assert_eq!(parse_grade_text(""), None);
        assert_eq!(parse_grade_text("   "), None);
    }

    #[test]
    fn test_grade_text_numeric() {
        assert_eq!(parse_grade_text("85"), Some(85.0));
        assert_eq!(parse_grade_text(" 92.5 "), Some(92.5));
    }

    #[test]
    fn test_grade_text_garbage_is_zero() {
        assert_eq!(parse_grade_text("A+"), Some(0.0));
    }

    #[test]
    fn test_non_finite_text_is_zero() {
        assert_eq!(parse_grade_text("NaN"), Some(0.0));
        assert_eq!(parse_grade_text("inf"), Some(0.0));
        assert_eq!(parse_grade_text("-infinity"), Some(0.0));
        assert_eq!(parse_grade_text("1e999"), Some(0.0));
        assert_eq!(parse_weight_text("NaN"), 0.0);
        assert_eq!(parse_weight_text("1e999"), 0.0);
    }

    #[test]
    fn test_weight_text() {
        assert_eq!(parse_weight_text("40"), 40.0);
        assert_eq!(parse_weight_text(""), 0.0);
        assert_eq!(parse_weight_text("forty"), 0.0);
    }

    #[test]
    fn test_finite_or_zero() {
        assert_eq!(finite_or_zero(42.0), 42.0);
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
        assert_eq!(finite_or_zero(f64::INFINITY), 0.0);
        assert_eq!(finite_or_zero(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_decode_missing_and_null_grade() {
        assert_eq!(parse_activity(r#""weight": 50"#).grade, None);
        assert_eq!(parse_activity(r#""weight": 50, "grade": null"#).grade, None);
        assert_eq!(parse_activity(r#""weight": 50, "grade": """#).grade, None);
    }

    #[test]
    fn test_decode_string_grade() {
        assert_eq!(parse_activity(r#""weight": 50, "grade": "77""#).grade, Some(77.0));
        assert_eq!(parse_activity(r#""weight": 50, "grade": "n/a""#).grade, Some(0.0));
        assert_eq!(parse_activity(r#""weight": 50, "grade": "NaN""#).grade, Some(0.0));
    }

    #[test]
    fn test_decode_odd_grade_types() {
        assert_eq!(parse_activity(r#""weight": 50, "grade": true"#).grade, Some(0.0));
        assert_eq!(parse_activity(r#""weight": 50, "grade": {"x": 1}"#).grade, Some(0.0));
    }

    #[test]
    fn test_decode_weight_variants() {
        assert_eq!(parse_activity(r#""weight": "25""#).weight, 25.0);
        assert_eq!(parse_activity(r#""weight": "heavy""#).weight, 0.0);
        assert_eq!(parse_activity(r#""weight": null"#).weight, 0.0);
        assert_eq!(parse_activity(r#""grade": 80"#).weight, 0.0);
    }
}
