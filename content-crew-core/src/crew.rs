//! A sequential crew: agents with models, tasks run one after another.
//!
//! Each task is a single model call. The agent's role, goal and backstory become the system
//! prompt; the task description, the outputs of the tasks listed in its `context`, any extra
//! material (web search results) and the JSON schema of the expected result become the user
//! prompt. Outputs are recorded so later tasks can read them.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, info_span, Instrument};

use crate::contract::{CompletionRequest, LanguageModel};
use crate::crew_config::CrewDefinition;
use crate::error::CrewError;
use crate::reports::Validate;
use crate::structured::{parse_structured, schema_instructions, StructuredError};
use crate::template::interpolate;

/// The recorded result of one finished task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutput {
    pub task: String,
    pub agent: String,
    /// The validated result, re-serialised as pretty JSON.
    pub output: String,
}

pub struct Crew<'a> {
    definition: &'a CrewDefinition,
    models: HashMap<String, Arc<dyn LanguageModel>>,
    inputs: Map<String, Value>,
    outputs: Vec<TaskOutput>,
}

impl<'a> Crew<'a> {
    pub fn new(definition: &'a CrewDefinition, inputs: Map<String, Value>) -> Self {
        Self {
            definition,
            models: HashMap::new(),
            inputs,
            outputs: Vec::new(),
        }
    }

    /// Assigns the model an agent runs on.
    pub fn with_model(mut self, agent: &str, model: Arc<dyn LanguageModel>) -> Self {
        self.models.insert(agent.to_string(), model);
        self
    }

    pub fn outputs(&self) -> &[TaskOutput] {
        &self.outputs
    }

    pub fn output_of(&self, task: &str) -> Option<&TaskOutput> {
        self.outputs.iter().find(|o| o.task == task)
    }

    fn system_prompt(&self, task: &str, agent: &str) -> Result<String, CrewError> {
        let def = self
            .definition
            .agent(agent)
            .ok_or_else(|| CrewError::UnknownAgent(agent.to_string()))?;
        let render = |text: &str| {
            interpolate(text.trim(), &self.inputs).map_err(|source| CrewError::Template {
                task: task.to_string(),
                source,
            })
        };
        Ok(format!(
            "You are {role}.\n{backstory}\n\nYour personal goal is: {goal}",
            role = render(&def.role)?,
            backstory = render(&def.backstory)?,
            goal = render(&def.goal)?,
        ))
    }

    /// Runs one task and parses its answer into `T`.
    pub async fn run_task<T>(&mut self, task_name: &str, extra: Option<&str>) -> Result<T, CrewError>
    where
        T: DeserializeOwned + Serialize + JsonSchema + Validate,
    {
        let task = self
            .definition
            .task(task_name)
            .ok_or_else(|| CrewError::UnknownTask(task_name.to_string()))?
            .clone();
        let model = self
            .models
            .get(&task.agent)
            .cloned()
            .ok_or_else(|| CrewError::UnknownAgent(task.agent.clone()))?;

        let template_err = |source| CrewError::Template {
            task: task.name.clone(),
            source,
        };
        let system = self.system_prompt(&task.name, &task.agent)?;
        let mut prompt = format!(
            "Task:\n{}\n",
            interpolate(task.description.trim(), &self.inputs).map_err(template_err)?
        );
        for ctx in &task.context {
            if let Some(previous) = self.output_of(ctx) {
                prompt.push_str(&format!("\nOutput of {}:\n{}\n", previous.task, previous.output));
            }
        }
        if let Some(extra) = extra {
            prompt.push_str(&format!("\nAdditional material:\n{}\n", extra.trim()));
        }
        prompt.push_str(&format!(
            "\nExpected output:\n{}\n\n{}",
            interpolate(task.expected_output.trim(), &self.inputs).map_err(template_err)?,
            schema_instructions::<T>()
        ));

        let span = info_span!("task", task = %task.name, agent = %task.agent);
        let raw = async {
            info!(model = %model.describe(), "Running task");
            model
                .complete(CompletionRequest {
                    system,
                    prompt,
                    json_output: true,
                })
                .await
        }
        .instrument(span)
        .await
        .map_err(|source| {
            error!(task = %task.name, error = %source, "Model call failed");
            CrewError::Llm {
                task: task.name.clone(),
                source,
            }
        })?;

        let value: T = parse_structured(&raw).map_err(|e| {
            error!(task = %task.name, error = %e, "Task output rejected");
            match e {
                StructuredError::Parse(source) => CrewError::Parse {
                    task: task.name.clone(),
                    raw: raw.clone(),
                    source,
                },
                StructuredError::Invalid(reason) => CrewError::Invalid {
                    task: task.name.clone(),
                    reason,
                },
            }
        })?;

        let output = serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.clone());
        info!(task = %task.name, output_len = output.len(), "Task complete");
        self.outputs.push(TaskOutput {
            task: task.name.clone(),
            agent: task.agent.clone(),
            output,
        });
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brief::sample_brief;
    use crate::contract::MockLanguageModel;
    use crate::crew_config::{RESEARCHER, RESEARCH_TASK, VALIDATION_TASK, VALIDATOR};
    use crate::error::LlmError;
    use crate::reports::{sample_research, ResearchReport, ValidationReport};

    fn model_returning(answer: String) -> Arc<dyn LanguageModel> {
        let mut model = MockLanguageModel::new();
        model.expect_describe().return_const("mock / test".to_string());
        model
            .expect_complete()
            .times(1)
            .returning(move |_| Ok(answer.clone()));
        Arc::new(model)
    }

    #[tokio::test]
    async fn prompts_carry_agent_and_brief_details() {
        let def = CrewDefinition::builtin().unwrap();
        let mut model = MockLanguageModel::new();
        model.expect_describe().return_const("mock / test".to_string());
        model
            .expect_complete()
            .withf(|req| {
                req.json_output
                    && req.system.starts_with("You are Market Validation Analyst.")
                    && req.prompt.contains("Product: Trail Buddy")
                    && !req.prompt.contains("Demographics")
                    && req.prompt.contains("viability_score")
            })
            .times(1)
            .returning(|_| {
                Ok(r#"{"market_demand":"Solid","competitor_density":"Medium","monetization_potential":"Hardware margin","viability_score":64,"recommendation":"Proceed with caution"}"#.into())
            });
        let mut crew = Crew::new(&def, sample_brief().to_inputs()).with_model(VALIDATOR, Arc::new(model));

        let report: ValidationReport = crew.run_task(VALIDATION_TASK, None).await.unwrap();
        assert_eq!(report.viability_score, 64);
        assert_eq!(crew.outputs().len(), 1);
        assert_eq!(crew.outputs()[0].agent, VALIDATOR);
    }

    #[tokio::test]
    async fn missing_model_is_an_unknown_agent() {
        let def = CrewDefinition::builtin().unwrap();
        let mut crew = Crew::new(&def, sample_brief().to_inputs());
        let err = crew
            .run_task::<ValidationReport>(VALIDATION_TASK, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CrewError::UnknownAgent(agent) if agent == VALIDATOR));
    }

    #[tokio::test]
    async fn missing_input_fails_before_calling_the_model() {
        let def = CrewDefinition::builtin().unwrap();
        let mut model = MockLanguageModel::new();
        model.expect_complete().times(0);
        // research_task reads {validation_report}, which plain brief inputs do not have.
        let mut crew = Crew::new(&def, sample_brief().to_inputs()).with_model(RESEARCHER, Arc::new(model));
        let err = crew
            .run_task::<ResearchReport>(RESEARCH_TASK, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CrewError::Template { .. }));
    }

    #[tokio::test]
    async fn schema_violations_are_reported_with_the_task_name() {
        let def = CrewDefinition::builtin().unwrap();
        let mut research = sample_research();
        research.seo_keywords.truncate(3);
        let mut inputs = sample_brief().to_inputs();
        inputs.insert("validation_report".into(), Value::Null);
        let mut crew = Crew::new(&def, inputs)
            .with_model(RESEARCHER, model_returning(serde_json::to_string(&research).unwrap()));
        let err = crew
            .run_task::<ResearchReport>(RESEARCH_TASK, Some("1. Source (https://a)\n   text"))
            .await
            .unwrap_err();
        assert!(matches!(err, CrewError::Invalid { task, .. } if task == RESEARCH_TASK));
        assert!(crew.outputs().is_empty());
    }

    #[tokio::test]
    async fn model_errors_keep_their_source() {
        let def = CrewDefinition::builtin().unwrap();
        let mut model = MockLanguageModel::new();
        model.expect_describe().return_const("mock / test".to_string());
        model.expect_complete().returning(|_| {
            Err(LlmError::Api {
                status: 429,
                body: "quota".into(),
            })
        });
        let mut crew = Crew::new(&def, sample_brief().to_inputs()).with_model(VALIDATOR, Arc::new(model));
        let err = crew
            .run_task::<ValidationReport>(VALIDATION_TASK, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("429"));
    }
}
