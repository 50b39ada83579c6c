//! Language model providers.
//!
//! Two providers are supported, selected per agent role through [`crate::settings`]:
//! Google Gemini (native `generateContent` API) and OpenAI (chat completions). Both are plain
//! request/response clients; streaming is not needed because every task waits for a complete
//! JSON answer.

pub mod gemini;
pub mod openai;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::contract::LanguageModel;
use crate::error::LlmError;
use crate::settings::Settings;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

/// Sampling temperature shared by all agents.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Google,
    OpenAi,
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" | "gemini" => Ok(LlmProvider::Google),
            "openai" => Ok(LlmProvider::OpenAi),
            other => Err(format!(
                "unknown model provider {other:?} (expected google or openai)"
            )),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::Google => f.write_str("google"),
            LlmProvider::OpenAi => f.write_str("openai"),
        }
    }
}

/// Which provider and model an agent runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub provider: LlmProvider,
    pub model: String,
}

/// Builds the client for a model config, using the matching API key from settings.
pub fn build_model(
    config: &ModelConfig,
    settings: &Settings,
) -> Result<Arc<dyn LanguageModel>, LlmError> {
    let http = reqwest::Client::new();
    match config.provider {
        LlmProvider::Google => {
            let key = settings
                .api_key_for(LlmProvider::Google)
                .ok_or(LlmError::MissingApiKey("GEMINI_API_KEY"))?;
            Ok(Arc::new(GeminiClient::new(
                http,
                config.model.clone(),
                key.clone(),
                None,
            )))
        }
        LlmProvider::OpenAi => {
            let key = settings
                .api_key_for(LlmProvider::OpenAi)
                .ok_or(LlmError::MissingApiKey("OPENAI_API_KEY"))?;
            Ok(Arc::new(OpenAiClient::new(
                http,
                config.model.clone(),
                key.clone(),
                None,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names_are_case_insensitive() {
        assert_eq!("Google".parse::<LlmProvider>(), Ok(LlmProvider::Google));
        assert_eq!("gemini".parse::<LlmProvider>(), Ok(LlmProvider::Google));
        assert_eq!(" OPENAI ".parse::<LlmProvider>(), Ok(LlmProvider::OpenAi));
        assert!("anthropic".parse::<LlmProvider>().is_err());
    }
}
