use std::fs::write;

use content_crew_core::crew_config::{CrewDefinition, EDITING_TASK, RESEARCHER};
use content_crew_core::error::CrewConfigError;
use tempfile::NamedTempFile;

#[test]
fn overrides_replace_agents_and_tasks_by_name() {
    let file = NamedTempFile::new().expect("temp file");
    write(
        file.path(),
        r#"
agents:
  researcher:
    role: Growth Analyst
    goal: Size the market for {product_name}
    backstory: Ex-consultant.
tasks:
  - name: editing_task
    agent: editor
    context: [copywriting_task]
    description: Tighten the copy for {product_name}.
    expected_output: Final copy.
"#,
    )
    .unwrap();

    let def = CrewDefinition::load_with_overrides(file.path()).expect("overrides load");
    assert_eq!(def.agent(RESEARCHER).unwrap().role, "Growth Analyst");
    let editing = def.task(EDITING_TASK).unwrap();
    assert_eq!(editing.context, vec!["copywriting_task".to_string()]);
    assert_eq!(def.tasks.len(), 4, "overridden task keeps its slot");
    assert_eq!(def.tasks[3].name, EDITING_TASK);
}

#[test]
fn overrides_are_validated() {
    let file = NamedTempFile::new().expect("temp file");
    write(
        file.path(),
        r#"
tasks:
  - name: research_task
    agent: researcher
    context: [editing_task]
    description: Research.
    expected_output: Report.
"#,
    )
    .unwrap();

    let err = CrewDefinition::load_with_overrides(file.path()).unwrap_err();
    assert!(matches!(err, CrewConfigError::InvalidContext { .. }));
}

#[test]
fn unreadable_file_reports_its_path() {
    let err = CrewDefinition::load_with_overrides("/definitely/not/here.yaml").unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.yaml"));
}

#[test]
fn invalid_yaml_is_a_parse_error() {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), b"agents: [:::").unwrap();
    assert!(matches!(
        CrewDefinition::load_with_overrides(file.path()),
        Err(CrewConfigError::Yaml(_))
    ));
}
