//! OpenAI chat completions client.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, error};

use super::DEFAULT_TEMPERATURE;
use crate::contract::{CompletionRequest, LanguageModel};
use crate::error::LlmError;
use crate::settings::Secret;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

pub struct OpenAiClient {
    http: reqwest::Client,
    model: String,
    api_key: Secret,
    base_url: String,
}

impl OpenAiClient {
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
}

pub fn request_body(model: &str, req: &CompletionRequest) -> Value {
    let mut messages = Vec::new();
    if !req.system.is_empty() {
        messages.push(json!({ "role": "system", "content": req.system }));
    }
    messages.push(json!({ "role": "user", "content": req.prompt }));

    let mut body = json!({
        "model": model,
        "messages": messages,
        "temperature": DEFAULT_TEMPERATURE,
    });
    if req.json_output {
        body["response_format"] = json!({ "type": "json_object" });
    }
    body
}

pub fn response_text(body: &Value) -> Result<String, LlmError> {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
        .ok_or(LlmError::EmptyResponse)
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    fn describe(&self) -> String {
        format!("openai / {}", self.model)
    }

    async fn complete(&self, req: CompletionRequest) -> Result<String, LlmError> {
        debug!(model = %self.model, prompt_len = req.prompt.len(), "Sending OpenAI request");
        let resp = self
            .http
            .post(format!(
                "{}/v1/chat/completions",
                self.base_url.trim_end_matches('/')
            ))
            .bearer_auth(self.api_key.expose())
            .json(&request_body(&self.model, &req))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(model = %self.model, status = status.as_u16(), "OpenAI request rejected");
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = resp.json().await?;
        response_text(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_goes_first() {
        let body = request_body(
            "gpt-4o-mini",
            &CompletionRequest {
                system: "sys".into(),
                prompt: "user".into(),
                json_output: true,
            },
        );
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "user");
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn reads_first_choice() {
        let body = json!({ "choices": [{ "message": { "role": "assistant", "content": "hello" } }] });
        assert_eq!(response_text(&body).unwrap(), "hello");
        let empty = json!({ "choices": [] });
        assert!(matches!(response_text(&empty), Err(LlmError::EmptyResponse)));
    }
}
