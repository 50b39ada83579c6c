//! Google Gemini client on the native Generative Language API.
//!
//! `POST {base}/v1beta/models/{model}:generateContent`, authenticated with the
//! `x-goog-api-key` header.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, error};

use super::DEFAULT_TEMPERATURE;
use crate::contract::{CompletionRequest, LanguageModel};
use crate::error::LlmError;
use crate::settings::Secret;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiClient {
    http: reqwest::Client,
    model: String,
    api_key: Secret,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        http: reqwest::Client,
        model: String,
        api_key: Secret,
        base_url: Option<String>,
    ) -> Self {
        Self {
            http,
            model,
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Request body for `generateContent`.
pub fn request_body(req: &CompletionRequest) -> Value {
    let mut generation_config = json!({ "temperature": DEFAULT_TEMPERATURE });
    if req.json_output {
        generation_config["responseMimeType"] = json!("application/json");
    }
    let mut body = json!({
        "contents": [{ "role": "user", "parts": [{ "text": req.prompt }] }],
        "generationConfig": generation_config,
    });
    if !req.system.is_empty() {
        body["systemInstruction"] = json!({ "parts": [{ "text": req.system }] });
    }
    body
}

/// Joins the text parts of the first candidate.
pub fn response_text(body: &Value) -> Result<String, LlmError> {
    let parts = body
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or(LlmError::EmptyResponse)?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl LanguageModel for GeminiClient {
    fn describe(&self) -> String {
        format!("google / {}", self.model)
    }

    async fn complete(&self, req: CompletionRequest) -> Result<String, LlmError> {
        debug!(model = %self.model, prompt_len = req.prompt.len(), "Sending Gemini request");
        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose())
            .json(&request_body(&req))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(model = %self.model, status = status.as_u16(), "Gemini request rejected");
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = resp.json().await?;
        let text = response_text(&body)?;
        debug!(model = %self.model, response_len = text.len(), "Gemini response received");
        Ok(text)
    }
}
