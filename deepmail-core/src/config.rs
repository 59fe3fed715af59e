//! 配置管理

use crate::error::{DeepmailError, DeepmailResult};
use crate::types::{DeepmailConfig, EmailConfig, LlmConfig, ResearchConfig, StorageConfig};

use std::path::{Path, PathBuf};
use tracing::{debug, info};

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            base_url: None,
            temperature: 0.7,
            max_tokens: Some(4000),
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            how_many_searches: 5,
            min_questions: 3,
            max_questions: 5,
            max_concurrent_searches: 5,
            search_timeout_secs: 120,
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: "sendgrid".to_string(),
            api_base_url: "https://api.sendgrid.com".to_string(),
            api_key: None,
            from_address: "sdr@example.com".to_string(),
            research_recipient: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:sdr_conversations.db".to_string(),
        }
    }
}

impl DeepmailConfig {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> DeepmailResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DeepmailError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: crate::ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: DeepmailConfig = toml::from_str(&content).map_err(|e| DeepmailError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: crate::ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> DeepmailResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| DeepmailError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: crate::ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content).map_err(|e| DeepmailError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: crate::ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Default locations searched when no explicit path is given, in priority order
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|d| d.join("deepmail").join("config.toml")),
            dirs::home_dir().map(|d| d.join(".deepmail").join("config.toml")),
            Some(PathBuf::from("deepmail.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load from `path`, or the first default location that exists, then apply
    /// environment overrides and validate
    pub fn load(path: Option<&Path>) -> DeepmailResult<Self> {
        let mut config = match path {
            Some(path) => {
                info!("Loading configuration from {:?}", path);
                Self::from_file(path)?
            }
            None => match Self::default_paths().into_iter().find(|p| p.exists()) {
                Some(path) => {
                    info!("Loading configuration from {:?}", path);
                    Self::from_file(&path)?
                }
                None => {
                    info!("No configuration file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Environment variables take precedence over file values
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    pub(crate) fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.llm.api_key.is_none() {
            let key_var = match self.llm.provider.as_str() {
                "anthropic" => "ANTHROPIC_API_KEY",
                "groq" => "GROQ_API_KEY",
                _ => "OPENAI_API_KEY",
            };
            self.llm.api_key = non_empty(key_var);
        }
        if let Some(model) = non_empty("DEEPMAIL_LLM_MODEL") {
            debug!("Overriding LLM model from environment: {}", model);
            self.llm.model = model;
        }
        if let Some(key) = non_empty("SENDGRID_API_KEY") {
            self.email.api_key = Some(key);
        }
        if let Some(sender) = non_empty("SENDGRID_VERIFIED_SENDER") {
            self.email.from_address = sender;
        }
        if let Some(recipient) = non_empty("DEEPMAIL_RESEARCH_RECIPIENT") {
            self.email.research_recipient = Some(recipient);
        }
        if let Some(url) = non_empty("DATABASE_URL") {
            self.storage.database_url = url;
        }
    }

    /// 验证配置
    pub fn validate(&self) -> DeepmailResult<()> {
        let invalid = |message: &str, suggestion: &str| DeepmailError::Config {
            message: message.to_string(),
            source: None,
            context: crate::ErrorContext::new("config")
                .with_operation("validate")
                .with_suggestion(suggestion),
        };

        if self.llm.model.trim().is_empty() {
            return Err(invalid(
                "LLM model must not be empty",
                "Set llm.model, for example \"gpt-4o-mini\"",
            ));
        }

        if self.research.how_many_searches == 0 {
            return Err(invalid(
                "research.how_many_searches must be greater than 0",
                "Set research.how_many_searches to a positive value",
            ));
        }

        if self.research.min_questions == 0
            || self.research.min_questions > self.research.max_questions
        {
            return Err(invalid(
                "research.min_questions must be between 1 and research.max_questions",
                "Use the defaults: min_questions = 3, max_questions = 5",
            ));
        }

        if self.research.max_concurrent_searches == 0 {
            return Err(invalid(
                "research.max_concurrent_searches must be greater than 0",
                "Set research.max_concurrent_searches to a positive value",
            ));
        }

        if self.research.search_timeout_secs == 0 {
            return Err(invalid(
                "research.search_timeout_secs must be greater than 0",
                "Set research.search_timeout_secs to a positive value, default is 120",
            ));
        }

        if !self.email.from_address.contains('@') {
            return Err(invalid(
                "email.from_address must be an email address",
                "Set email.from_address or SENDGRID_VERIFIED_SENDER to your verified sender",
            ));
        }

        if !self.storage.database_url.starts_with("sqlite:") {
            return Err(invalid(
                "storage.database_url must be a sqlite: URL",
                "Use a value such as \"sqlite:sdr_conversations.db\"",
            ));
        }

        Ok(())
    }
}
