use content_crew::load_config::{load_brief, load_crew_config};
use content_crew_core::brief::DEFAULT_TONE;
use std::fs::write;
use tempfile::NamedTempFile;

fn file_with(content: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), content).unwrap();
    file
}

#[test]
fn loads_a_brief_with_long_field_names() {
    let file = file_with(
        r#"
product_name: Trail Buddy
category: Outdoor gear
detailed_description: A clip-on device that tracks routes offline.
problem_statement: Hikers lose signal and get lost.
primary_audience: Weekend hikers
key_features: [Offline maps, Week-long battery]
unique_selling_proposition: Works without any signal
estimated_price_point: "$49"
budget_range: "$1,000"
"#,
    );

    let brief = load_brief(file.path()).expect("Brief should load");

    assert_eq!(brief.product_name, "Trail Buddy");
    assert_eq!(brief.usp, "Works without any signal");
    assert_eq!(brief.price_point.as_deref(), Some("$49"));
    assert_eq!(brief.tone_and_personality, DEFAULT_TONE);
    assert_eq!(
        brief.key_features,
        Some(vec!["Offline maps".to_string(), "Week-long battery".to_string()])
    );
    assert!(brief.demographics.is_none());
}

#[test]
fn blank_required_field_is_rejected() {
    let file = file_with(
        r#"
product_name: Trail Buddy
category: "  "
detailed_description: A clip-on device.
problem_statement: Hikers get lost.
primary_audience: Weekend hikers
usp: Works without any signal
budget_range: "$1,000"
"#,
    );

    let msg = load_brief(file.path()).unwrap_err().to_string();
    assert!(msg.contains("category is required"), "got: {msg}");
}

#[test]
fn missing_required_field_is_a_parse_error() {
    let file = file_with("product_name: Trail Buddy\n");
    let msg = load_brief(file.path()).unwrap_err().to_string();
    assert!(msg.contains("parse"), "Parse error expected, got: {msg}");
}

#[test]
fn invalid_yaml_is_reported() {
    let file = file_with("not-yaml: [:::");
    let msg = load_brief(file.path()).unwrap_err().to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[test]
fn crew_config_defaults_to_builtin_and_accepts_overrides() {
    let builtin = load_crew_config(None).expect("built-in crew");
    assert_eq!(builtin.tasks.len(), 4);

    let file = file_with(
        r#"
agents:
  editor:
    role: Brand Editor
    goal: Polish copy for {product_name}
    backstory: Ten years at a design agency.
"#,
    );
    let custom = load_crew_config(Some(file.path())).expect("overridden crew");
    assert_eq!(custom.agents["editor"].role, "Brand Editor");
    assert_eq!(custom.agents["validator"], builtin.agents["validator"]);
}
