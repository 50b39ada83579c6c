//! Error types for every external seam of the pipeline.
//!
//! Each collaborator (model provider, web search, object store) gets its own enum so callers can
//! tell a transport failure from an API rejection. [`PipelineError`] is what the orchestration in
//! [`crate::pipeline`] hands back to the CLI.

use thiserror::Error;

/// Missing or malformed configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum BriefError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("model request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model provider returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("model provider returned no content")]
    EmptyResponse,
    #[error("{0} is not set")]
    MissingApiKey(&'static str),
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("search provider returned {status}: {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("storage returned {status} for {operation}: {body}")]
    Api {
        operation: &'static str,
        status: u16,
        body: String,
    },
    #[error("invalid storage endpoint {0:?}")]
    InvalidEndpoint(String),
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template references {0:?} but no such input was provided")]
    MissingInput(String),
}

#[derive(Debug, Error)]
pub enum CrewConfigError {
    #[error("failed to read crew config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse crew config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("agent {0:?} is required but not defined")]
    MissingAgent(String),
    #[error("task {0:?} is required but not defined")]
    MissingTask(String),
    #[error("task {task:?} is assigned to unknown agent {agent:?}")]
    UnknownAgent { task: String, agent: String },
    #[error("task {task:?} lists {context:?} as context, but it is not an earlier task")]
    InvalidContext { task: String, context: String },
}

#[derive(Debug, Error)]
pub enum CrewError {
    #[error("task {0:?} is not defined")]
    UnknownTask(String),
    #[error("agent {0:?} has no model assigned")]
    UnknownAgent(String),
    #[error("task {task:?}: {source}")]
    Template {
        task: String,
        #[source]
        source: TemplateError,
    },
    #[error("task {task:?}: {source}")]
    Llm {
        task: String,
        #[source]
        source: LlmError,
    },
    #[error("task {task:?} returned output that is not valid JSON for its schema: {source}")]
    Parse {
        task: String,
        raw: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("task {task:?} returned an invalid result: {reason}")]
    Invalid { task: String, reason: String },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Brief(#[from] BriefError),
    #[error(transparent)]
    Crew(#[from] CrewError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to serialise {what}: {source}")]
    Serialise {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
