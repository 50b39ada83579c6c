#![allow(unused)]

//! # contract: the seams to every external collaborator
//!
//! The pipeline talks to three outside systems: a language model per agent, an optional web
//! search API for the researcher, and an S3-compatible object store for the results. Each one is
//! a trait here so the orchestration in [`crate::pipeline`] can be driven by real HTTP clients in
//! the binary and by `mockall` mocks in tests.
//!
//! Mocks are exported under the `test-export-mocks` feature (on by default) so the CLI crate's
//! integration tests can use them too.

use async_trait::async_trait;

use mockall::{automock, predicate::*};

use crate::error::{LlmError, SearchError, StorageError};

/// One model call: a system prompt describing the agent and a user prompt describing the task.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    /// Ask the provider for a JSON-only response when it supports it.
    pub json_output: bool,
}

/// A text-completion model behind some provider API.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Human-readable `provider / model` label for logs.
    fn describe(&self) -> String;

    /// Runs a single completion and returns the raw text of the answer.
    async fn complete(&self, req: CompletionRequest) -> Result<String, LlmError>;
}

/// A single web search result.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub content: String,
}

#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;
}

/// Outcome of making sure the target bucket exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketStatus {
    Existing,
    Created,
}

/// A text object to upload.
#[derive(Debug, Clone, PartialEq)]
pub struct PutObject {
    pub bucket: String,
    pub key: String,
    pub content: Vec<u8>,
    pub content_type: String,
}

/// What the store reported back after an upload.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub size: usize,
    pub etag: Option<String>,
}

/// Trait for putting objects into a bucket.
/// The implementor is responsible for transport, addressing and authentication.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Creates the bucket when it does not exist yet.
    async fn ensure_bucket(&self, bucket: &str) -> Result<BucketStatus, StorageError>;

    /// Uploads a single object, overwriting any object with the same key.
    async fn put_object(&self, req: PutObject) -> Result<StoredObject, StorageError>;
}
