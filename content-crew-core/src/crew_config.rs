//! Agent and task definitions.
//!
//! The crews are described in YAML, not code: each agent has a role, goal and backstory, and
//! each task names the agent that runs it, what it should do, what it should produce, and which
//! earlier tasks' outputs it reads. The built-in definitions are compiled in from
//! `config/agents.yaml` and `config/tasks.yaml`; a user file can override any agent or task by
//! name.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

use crate::error::CrewConfigError;

const BUILTIN_AGENTS: &str = include_str!("../config/agents.yaml");
const BUILTIN_TASKS: &str = include_str!("../config/tasks.yaml");

pub const VALIDATOR: &str = "validator";
pub const RESEARCHER: &str = "researcher";
pub const COPYWRITER: &str = "copywriter";
pub const EDITOR: &str = "editor";

pub const VALIDATION_TASK: &str = "validation_task";
pub const RESEARCH_TASK: &str = "research_task";
pub const COPYWRITING_TASK: &str = "copywriting_task";
pub const EDITING_TASK: &str = "editing_task";

const REQUIRED_AGENTS: [&str; 4] = [VALIDATOR, RESEARCHER, COPYWRITER, EDITOR];
const REQUIRED_TASKS: [&str; 4] = [VALIDATION_TASK, RESEARCH_TASK, COPYWRITING_TASK, EDITING_TASK];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDefinition {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub name: String,
    pub agent: String,
    pub description: String,
    pub expected_output: String,
    /// Earlier tasks whose output is handed to this one.
    #[serde(default)]
    pub context: Vec<String>,
}

/// Overrides read from a user file. Both sections are optional.
#[derive(Debug, Default, Deserialize)]
struct CrewOverrides {
    #[serde(default)]
    agents: BTreeMap<String, AgentDefinition>,
    #[serde(default)]
    tasks: Vec<TaskDefinition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrewDefinition {
    pub agents: BTreeMap<String, AgentDefinition>,
    /// In execution order.
    pub tasks: Vec<TaskDefinition>,
}

impl CrewDefinition {
    pub fn from_yaml(agents_yaml: &str, tasks_yaml: &str) -> Result<Self, CrewConfigError> {
        let agents: BTreeMap<String, AgentDefinition> = serde_yaml::from_str(agents_yaml)?;
        let tasks: Vec<TaskDefinition> = serde_yaml::from_str(tasks_yaml)?;
        let def = CrewDefinition { agents, tasks };
        def.validate()?;
        Ok(def)
    }

    /// The definitions shipped with the binary.
    pub fn builtin() -> Result<Self, CrewConfigError> {
        Self::from_yaml(BUILTIN_AGENTS, BUILTIN_TASKS)
    }

    /// Built-in definitions with the agents and tasks from a user YAML file laid over them.
    pub fn load_with_overrides<P: AsRef<Path>>(path: P) -> Result<Self, CrewConfigError> {
        let path = path.as_ref();
        info!(config_path = ?path, "Loading crew overrides");
        let content = fs::read_to_string(path).map_err(|source| {
            error!(error = ?source, config_path = ?path, "Failed to read crew config");
            CrewConfigError::Io {
                path: path.display().to_string(),
                source,
            }
        })?;
        let overrides: CrewOverrides = serde_yaml::from_str(&content).map_err(|e| {
            error!(error = ?e, config_path = ?path, "Failed to parse crew config YAML");
            CrewConfigError::Yaml(e)
        })?;

        let mut def = Self::builtin()?;
        def.apply(overrides);
        def.validate()?;
        info!(
            agents = def.agents.len(),
            tasks = def.tasks.len(),
            "Crew definition loaded with overrides"
        );
        Ok(def)
    }

    fn apply(&mut self, overrides: CrewOverrides) {
        for (name, agent) in overrides.agents {
            debug!(agent = %name, "Overriding agent definition");
            self.agents.insert(name, agent);
        }
        for task in overrides.tasks {
            match self.tasks.iter_mut().find(|t| t.name == task.name) {
                Some(existing) => {
                    debug!(task = %task.name, "Overriding task definition");
                    *existing = task;
                }
                None => {
                    debug!(task = %task.name, "Appending task definition");
                    self.tasks.push(task);
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), CrewConfigError> {
        for agent in REQUIRED_AGENTS {
            if !self.agents.contains_key(agent) {
                return Err(CrewConfigError::MissingAgent(agent.to_string()));
            }
        }
        for task in REQUIRED_TASKS {
            if self.task(task).is_none() {
                return Err(CrewConfigError::MissingTask(task.to_string()));
            }
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for task in &self.tasks {
            if !self.agents.contains_key(&task.agent) {
                return Err(CrewConfigError::UnknownAgent {
                    task: task.name.clone(),
                    agent: task.agent.clone(),
                });
            }
            if let Some(bad) = task.context.iter().find(|c| !seen.contains(c.as_str())) {
                return Err(CrewConfigError::InvalidContext {
                    task: task.name.clone(),
                    context: bad.clone(),
                });
            }
            seen.insert(task.name.as_str());
        }
        Ok(())
    }

    pub fn task(&self, name: &str) -> Option<&TaskDefinition> {
        self.tasks.iter().find(|t| t.name == name)
    }

    pub fn agent(&self, name: &str) -> Option<&AgentDefinition> {
        self.agents.get(name)
    }
}
