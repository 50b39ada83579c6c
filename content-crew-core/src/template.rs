//! `{placeholder}` interpolation for agent and task text.

use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::error::TemplateError;

/// Rendering of inputs the user skipped.
pub const NOT_SPECIFIED: &str = "Not specified";

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static regex"))
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => NOT_SPECIFIED.to_string(),
        Value::String(s) if s.trim().is_empty() => NOT_SPECIFIED.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) if items.is_empty() => NOT_SPECIFIED.to_string(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
        other => other.to_string(),
    }
}

/// Replaces every `{name}` with the matching input. Only bare identifiers count as
/// placeholders, so JSON snippets in the text pass through unchanged.
pub fn interpolate(template: &str, inputs: &Map<String, Value>) -> Result<String, TemplateError> {
    let re = placeholder();
    if let Some(missing) = re
        .captures_iter(template)
        .map(|c| c[1].to_string())
        .find(|name| !inputs.contains_key(name))
    {
        return Err(TemplateError::MissingInput(missing));
    }
    Ok(re
        .replace_all(template, |caps: &Captures| render_value(&inputs[&caps[1]]))
        .into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inputs() -> Map<String, Value> {
        match json!({
            "product_name": "Trail Buddy",
            "key_features": ["Offline maps", "Solar charging"],
            "demographics": null,
            "viability_score": 72,
            "validation_report": { "viability_score": 72 },
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn renders_each_value_kind() {
        let out = interpolate(
            "{product_name}: {key_features}; {demographics}; {viability_score}",
            &inputs(),
        )
        .unwrap();
        assert_eq!(
            out,
            "Trail Buddy: Offline maps, Solar charging; Not specified; 72"
        );
    }

    #[test]
    fn objects_render_as_json() {
        let out = interpolate("{validation_report}", &inputs()).unwrap();
        assert_eq!(out, r#"{"viability_score":72}"#);
    }

    #[test]
    fn unknown_placeholder_is_an_error() {
        let err = interpolate("Hello {customer}", &inputs()).unwrap_err();
        assert!(matches!(err, TemplateError::MissingInput(name) if name == "customer"));
    }

    #[test]
    fn json_braces_are_left_alone() {
        let out = interpolate(r#"Return {"headline": "..."} for {product_name}"#, &inputs()).unwrap();
        assert_eq!(out, r#"Return {"headline": "..."} for Trail Buddy"#);
    }
}
