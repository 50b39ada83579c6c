//! Structured output: asking a model for JSON matching a schema, and reading it back.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::reports::Validate;

#[derive(Debug, Error)]
pub enum StructuredError {
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(String),
}

/// Prompt suffix asking for a single JSON object that matches `T`'s schema.
pub fn schema_instructions<T: JsonSchema>() -> String {
    let schema = schemars::schema_for!(T);
    let rendered = serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string());
    format!(
        "Respond with a single JSON object and nothing else. \
         It must validate against this JSON Schema:\n{rendered}"
    )
}

/// Cuts the JSON object out of a model answer.
///
/// Models wrap JSON in markdown fences or add a sentence around it often enough that the raw
/// text cannot be fed to serde directly. Takes everything from the first `{` to the last `}`.
pub fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

pub fn parse_structured<T>(raw: &str) -> Result<T, StructuredError>
where
    T: DeserializeOwned + Validate,
{
    let value: T = serde_json::from_str(extract_json(raw))?;
    value.validate().map_err(StructuredError::Invalid)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::{CompetitorDensity, ValidationReport};

    const REPORT: &str = r#"{"market_demand":"High","competitor_density":"Low","monetization_potential":"Good","viability_score":82,"recommendation":"Proceed"}"#;

    #[test]
    fn strips_markdown_fences_and_chatter() {
        let raw = format!("Here is the report:\n```json\n{REPORT}\n```\nLet me know!");
        let report: ValidationReport = parse_structured(&raw).unwrap();
        assert_eq!(report.viability_score, 82);
        assert_eq!(report.competitor_density, CompetitorDensity::Low);
    }

    #[test]
    fn reports_schema_violations() {
        let raw = REPORT.replace("\"Proceed\"", "\"  \"");
        let err = parse_structured::<ValidationReport>(&raw).unwrap_err();
        assert!(matches!(err, StructuredError::Invalid(_)));
    }

    #[test]
    fn non_json_is_a_parse_error() {
        let err = parse_structured::<ValidationReport>("I cannot help with that.").unwrap_err();
        assert!(matches!(err, StructuredError::Parse(_)));
    }

    #[test]
    fn instructions_embed_field_names() {
        let text = schema_instructions::<ValidationReport>();
        assert!(text.contains("viability_score"));
        assert!(text.contains("competitor_density"));
    }
}
