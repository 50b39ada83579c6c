//! Environment-driven settings.
//!
//! Everything the pipeline needs at runtime (provider keys, per-agent model selection, object
//! storage credentials, the validation threshold) comes from environment variables.
//! [`Settings::from_lookup`] takes the variable source as a closure so the parsing rules can be
//! exercised without touching the process environment.

use std::fmt;
use tracing::{error, info};

use crate::error::SettingsError;
use crate::llm::{LlmProvider, ModelConfig};

pub const DEFAULT_PROVIDER: LlmProvider = LlmProvider::Google;
pub const DEFAULT_MODEL_ID: &str = "gemini-2.0-flash";
pub const DEFAULT_VALIDATION_THRESHOLD: u8 = 50;
pub const DEFAULT_REGION: &str = "us-east-1";

/// A credential that never shows up in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(**********)")
    }
}

/// Connection details for the S3-compatible store.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// `host[:port]`, without a scheme.
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: Secret,
    pub bucket: String,
    pub secure: bool,
    pub region: String,
}

/// Model assignment for each agent role.
#[derive(Debug, Clone)]
pub struct AgentModels {
    pub validator: ModelConfig,
    pub researcher: ModelConfig,
    pub copywriter: ModelConfig,
    pub editor: ModelConfig,
}

impl AgentModels {
    pub fn all(&self) -> [(&'static str, &ModelConfig); 4] {
        [
            ("validator", &self.validator),
            ("researcher", &self.researcher),
            ("copywriter", &self.copywriter),
            ("editor", &self.editor),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub gemini_api_key: Option<Secret>,
    pub openai_api_key: Option<Secret>,
    pub tavily_api_key: Option<Secret>,
    pub models: AgentModels,
    pub storage: StorageSettings,
    /// Minimum viability score for an idea to pass validation without a warning.
    pub validation_threshold: u8,
}

impl Settings {
    /// Loads settings from the process environment. The binary loads `.env` into it at startup.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| {
            get(name).ok_or_else(|| {
                error!(var = name, "Required environment variable not set");
                SettingsError::Missing(name)
            })
        };

        let model = |provider_var: &'static str, id_var: &'static str| {
            let provider = match get(provider_var) {
                Some(raw) => raw.parse::<LlmProvider>().map_err(|reason| {
                    error!(var = provider_var, value = %raw, "Unsupported model provider");
                    SettingsError::Invalid {
                        name: provider_var,
                        value: raw.clone(),
                        reason,
                    }
                })?,
                None => DEFAULT_PROVIDER,
            };
            let model = get(id_var).unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());
            Ok::<_, SettingsError>(ModelConfig { provider, model })
        };

        let models = AgentModels {
            validator: model("VALIDATOR_MODEL_PROVIDER", "VALIDATOR_MODEL_ID")?,
            researcher: model("RESEARCHER_MODEL_PROVIDER", "RESEARCHER_MODEL_ID")?,
            copywriter: model("COPYWRITER_MODEL_PROVIDER", "COPYWRITER_MODEL_ID")?,
            editor: model("EDITOR_MODEL_PROVIDER", "EDITOR_MODEL_ID")?,
        };

        let secure = match get("MINIO_SECURE") {
            None => false,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(SettingsError::Invalid {
                        name: "MINIO_SECURE",
                        value: raw,
                        reason: "expected true or false".into(),
                    })
                }
            },
        };

        let storage = StorageSettings {
            endpoint: required("MINIO_ENDPOINT")?,
            access_key: required("MINIO_ACCESS_KEY")?,
            secret_key: Secret::new(required("MINIO_SECRET_KEY")?),
            bucket: required("MINIO_BUCKET_NAME")?,
            secure,
            region: get("MINIO_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
        };

        let validation_threshold = match get("VALIDATION_THRESHOLD") {
            None => DEFAULT_VALIDATION_THRESHOLD,
            Some(raw) => match raw.trim().parse::<u8>() {
                Ok(v) if v <= 100 => v,
                _ => {
                    error!(value = %raw, "VALIDATION_THRESHOLD must be an integer between 0 and 100");
                    return Err(SettingsError::Invalid {
                        name: "VALIDATION_THRESHOLD",
                        value: raw,
                        reason: "expected an integer between 0 and 100".into(),
                    });
                }
            },
        };

        let settings = Settings {
            gemini_api_key: get("GEMINI_API_KEY").map(Secret::new),
            openai_api_key: get("OPENAI_API_KEY").map(Secret::new),
            tavily_api_key: get("TAVILY_API_KEY").map(Secret::new),
            models,
            storage,
            validation_threshold,
        };
        settings.check_provider_keys()?;
        settings.trace_loaded();
        Ok(settings)
    }

    /// Every provider assigned to a role needs its API key.
    fn check_provider_keys(&self) -> Result<(), SettingsError> {
        for (role, config) in self.models.all() {
            let (var, key) = match config.provider {
                LlmProvider::Google => ("GEMINI_API_KEY", &self.gemini_api_key),
                LlmProvider::OpenAi => ("OPENAI_API_KEY", &self.openai_api_key),
            };
            if key.is_none() {
                error!(role, provider = %config.provider, var, "Model provider key missing");
                return Err(SettingsError::Missing(var));
            }
        }
        Ok(())
    }

    pub fn api_key_for(&self, provider: LlmProvider) -> Option<&Secret> {
        match provider {
            LlmProvider::Google => self.gemini_api_key.as_ref(),
            LlmProvider::OpenAi => self.openai_api_key.as_ref(),
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            bucket = %self.storage.bucket,
            endpoint = %self.storage.endpoint,
            secure = self.storage.secure,
            validation_threshold = self.validation_threshold,
            web_search = self.tavily_api_key.is_some(),
            "Loaded settings"
        );
        for (role, config) in self.models.all() {
            info!(role, provider = %config.provider, model = %config.model, "Agent model");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("GEMINI_API_KEY", "g-key"),
            ("MINIO_ENDPOINT", "localhost:9000"),
            ("MINIO_ACCESS_KEY", "minio"),
            ("MINIO_SECRET_KEY", "minio123"),
            ("MINIO_BUCKET_NAME", "content"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<Settings, SettingsError> {
        Settings::from_lookup(|name| env.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn applies_defaults() {
        let settings = load(&base_env()).unwrap();
        assert_eq!(settings.validation_threshold, 50);
        assert_eq!(settings.models.editor.provider, LlmProvider::Google);
        assert_eq!(settings.models.editor.model, "gemini-2.0-flash");
        assert!(!settings.storage.secure);
        assert_eq!(settings.storage.region, "us-east-1");
        assert!(settings.tavily_api_key.is_none());
    }

    #[test]
    fn missing_bucket_is_reported_by_name() {
        let mut env = base_env();
        env.remove("MINIO_BUCKET_NAME");
        let err = load(&env).unwrap_err();
        assert_eq!(err.to_string(), "MINIO_BUCKET_NAME environment variable not set");
    }

    #[test]
    fn openai_role_requires_openai_key() {
        let mut env = base_env();
        env.insert("COPYWRITER_MODEL_PROVIDER", "OpenAI");
        env.insert("COPYWRITER_MODEL_ID", "gpt-4o-mini");
        assert!(matches!(
            load(&env).unwrap_err(),
            SettingsError::Missing("OPENAI_API_KEY")
        ));
        env.insert("OPENAI_API_KEY", "o-key");
        let settings = load(&env).unwrap();
        assert_eq!(settings.models.copywriter.provider, LlmProvider::OpenAi);
        assert_eq!(settings.models.copywriter.model, "gpt-4o-mini");
    }

    #[test]
    fn threshold_must_be_a_percentage() {
        let mut env = base_env();
        env.insert("VALIDATION_THRESHOLD", "101");
        assert!(matches!(
            load(&env).unwrap_err(),
            SettingsError::Invalid { name: "VALIDATION_THRESHOLD", .. }
        ));
        env.insert("VALIDATION_THRESHOLD", "70");
        assert_eq!(load(&env).unwrap().validation_threshold, 70);
    }

    #[test]
    fn secrets_are_redacted_in_debug_output() {
        let settings = load(&base_env()).unwrap();
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("minio123"));
        assert!(!rendered.contains("g-key"));
    }
}
