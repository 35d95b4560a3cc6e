use crate::{
    error::{GenerationError, Result},
    models::ResponseFormat,
    storage::file::is_valid_key,
};
use std::{env, fmt, path::PathBuf};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "dall-e-3";
pub const DEFAULT_SIZE: &str = "1024x1024";
pub const DEFAULT_QUALITY: &str = "standard";
pub const DEFAULT_HISTORY_KEY: &str = "PromptHistory";

#[derive(Clone)]
pub struct OpenAiConfig {
    pub credential: Option<String>,
    pub api_base: String,
    pub model: String,
    pub size: String,
    pub quality: String,
    pub response_format: ResponseFormat,
}

#[derive(Debug, Clone)]
pub struct HistoryConfig {
    pub directory: Option<PathBuf>,
    pub key: String,
    pub in_memory: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub openai: OpenAiConfig,
    pub history: HistoryConfig,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        OpenAiConfig {
            credential: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            size: DEFAULT_SIZE.to_string(),
            quality: DEFAULT_QUALITY.to_string(),
            response_format: ResponseFormat::Url,
        }
    }
}

// The credential must never reach a log line.
impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("size", &self.size)
            .field("quality", &self.quality)
            .field("response_format", &self.response_format)
            .finish()
    }
}

impl OpenAiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let credential = non_empty_env("OPENAI_API_KEY");
        let api_base = non_empty_env("OPENAI_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base);
        let model = non_empty_env("ARTGENAI_MODEL").unwrap_or(defaults.model);
        let size = non_empty_env("ARTGENAI_SIZE").unwrap_or(defaults.size);
        let quality = non_empty_env("ARTGENAI_QUALITY").unwrap_or(defaults.quality);
        let response_format = match non_empty_env("ARTGENAI_RESPONSE_FORMAT") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                log::warn!("{}, falling back to url", e);
                ResponseFormat::Url
            }),
            None => defaults.response_format,
        };

        OpenAiConfig {
            credential,
            api_base,
            model,
            size,
            quality,
            response_format,
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = quality.into();
        self
    }

    pub fn with_response_format(mut self, response_format: ResponseFormat) -> Self {
        self.response_format = response_format;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/images/generations", self.api_base)
    }

    /// Returns the credential, or a `ConfigError` when it is missing or blank.
    pub fn credential(&self) -> Result<&str> {
        self.credential
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| GenerationError::ConfigError("API credential is required".into()))
    }

    pub fn validate(&self) -> Result<()> {
        self.credential()?;
        if self.api_base.is_empty() {
            return Err(GenerationError::ConfigError("API base URL is empty".into()));
        }
        url::Url::parse(&self.endpoint())
            .map_err(|e| GenerationError::ConfigError(format!("Invalid API base URL: {}", e)))?;
        Ok(())
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            directory: None,
            key: DEFAULT_HISTORY_KEY.to_string(),
            in_memory: false,
        }
    }
}

impl HistoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_memory() -> Self {
        HistoryConfig {
            in_memory: true,
            ..Default::default()
        }
    }

    pub fn from_env() -> Self {
        HistoryConfig {
            directory: non_empty_env("ARTGENAI_HISTORY_DIR").map(PathBuf::from),
            key: non_empty_env("ARTGENAI_HISTORY_KEY")
                .unwrap_or_else(|| DEFAULT_HISTORY_KEY.to_string()),
            in_memory: false,
        }
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// The key names the history blob, and for the file backend its file name.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_key(&self.key) {
            return Err(GenerationError::ConfigError(format!(
                "Invalid history key '{}': use letters, digits, '.', '-' or '_'",
                self.key
            )));
        }
        Ok(())
    }

    /// Explicit directory, else the platform data directory.
    pub fn resolved_directory(&self) -> Result<PathBuf> {
        match &self.directory {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join("artgenai"))
                .ok_or_else(|| {
                    GenerationError::ConfigError("No data directory available".into())
                }),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Config {
            openai: OpenAiConfig::from_env(),
            history: HistoryConfig::from_env(),
        }
    }

    pub fn with_openai(mut self, config: OpenAiConfig) -> Self {
        self.openai = config;
        self
    }

    pub fn with_history(mut self, config: HistoryConfig) -> Self {
        self.history = config;
        self
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_request_shape() {
        let config = OpenAiConfig::default();
        assert_eq!(config.model, "dall-e-3");
        assert_eq!(config.size, "1024x1024");
        assert_eq!(config.quality, "standard");
        assert_eq!(config.response_format, ResponseFormat::Url);
        assert_eq!(
            config.endpoint(),
            "https://api.openai.com/v1/images/generations"
        );
    }

    #[test]
    fn test_missing_credential_is_config_error() {
        let config = OpenAiConfig::new();
        assert!(matches!(
            config.validate(),
            Err(GenerationError::ConfigError(_))
        ));

        let blank = OpenAiConfig::new().with_credential("   ");
        assert!(blank.credential().is_err());
    }

    #[test]
    fn test_api_base_trailing_slash_trimmed() {
        let config = OpenAiConfig::new()
            .with_credential("sk-test")
            .with_api_base("http://127.0.0.1:9000/v1/");
        assert_eq!(config.endpoint(), "http://127.0.0.1:9000/v1/images/generations");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_credential() {
        let config = OpenAiConfig::new().with_credential("sk-very-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_history_directory_override() {
        let config = HistoryConfig::new().with_directory("/tmp/artgenai-test");
        assert_eq!(
            config.resolved_directory().unwrap(),
            PathBuf::from("/tmp/artgenai-test")
        );
        assert_eq!(config.key, "PromptHistory");
        assert!(HistoryConfig::in_memory().in_memory);
    }

    #[test]
    fn test_history_key_must_be_file_safe() {
        assert!(HistoryConfig::new().validate().is_ok());
        assert!(HistoryConfig::new().with_key("history-v2").validate().is_ok());

        for key in ["my history", "", "../escape", ".hidden", "a/b"] {
            let result = HistoryConfig::new().with_key(key).validate();
            assert!(
                matches!(result, Err(GenerationError::ConfigError(_))),
                "key {:?} should be rejected",
                key
            );
        }
    }
}
