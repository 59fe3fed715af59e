//! Agent runtime backed by siumai
//!
//! Builds a provider client from [`LlmConfig`] and runs each agent as a
//! single system + user chat exchange.

use async_trait::async_trait;
use deepmail_core::{
    agent_error, AgentRuntime, AgentSpec, DeepmailError, DeepmailResult, ErrorContext, LlmConfig,
};
use siumai::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

/// [`AgentRuntime`] that sends every agent run to one configured LLM provider
pub struct LlmAgentRuntime {
    client: Box<dyn LlmClient>,
    config: LlmConfig,
}

impl LlmAgentRuntime {
    /// Create a new runtime for the configured provider
    pub async fn new(config: LlmConfig) -> DeepmailResult<Self> {
        let client = Self::build_client(&config).await?;

        info!(
            "Created LLM client for provider: {} with model: {}",
            config.provider, config.model
        );

        Ok(Self { client, config })
    }

    fn missing_key(provider: &str, env_var: &str) -> DeepmailError {
        DeepmailError::Config {
            message: format!("{} API key not found", provider),
            source: None,
            context: ErrorContext::new("llm_client")
                .with_operation("build_client")
                .with_suggestion(&format!("Set {} or llm.api_key in the config file", env_var)),
        }
    }

    fn build_failed(provider: &str, error: impl std::fmt::Display) -> DeepmailError {
        DeepmailError::Config {
            message: format!("Failed to build {} client: {}", provider, error),
            source: None,
            context: ErrorContext::new("llm_client").with_operation("build_client"),
        }
    }

    /// Build the appropriate siumai client based on configuration
    async fn build_client(config: &LlmConfig) -> DeepmailResult<Box<dyn LlmClient>> {
        match config.provider.as_str() {
            "openai" => {
                let api_key = config
                    .api_key
                    .as_deref()
                    .ok_or_else(|| Self::missing_key("OpenAI", "OPENAI_API_KEY"))?;

                let mut builder = LlmBuilder::new()
                    .openai()
                    .api_key(api_key)
                    .model(&config.model)
                    .temperature(config.temperature);

                if let Some(max_tokens) = config.max_tokens {
                    builder = builder.max_tokens(max_tokens);
                }

                if let Some(base_url) = &config.base_url {
                    builder = builder.base_url(base_url);
                }

                let client = builder
                    .build()
                    .await
                    .map_err(|e| Self::build_failed("OpenAI", e))?;

                Ok(Box::new(client))
            }
            "anthropic" => {
                let api_key = config
                    .api_key
                    .as_deref()
                    .ok_or_else(|| Self::missing_key("Anthropic", "ANTHROPIC_API_KEY"))?;

                let mut builder = LlmBuilder::new()
                    .anthropic()
                    .api_key(api_key)
                    .model(&config.model)
                    .temperature(config.temperature);

                if let Some(max_tokens) = config.max_tokens {
                    builder = builder.max_tokens(max_tokens);
                }

                let client = builder
                    .build()
                    .await
                    .map_err(|e| Self::build_failed("Anthropic", e))?;

                Ok(Box::new(client))
            }
            "ollama" => {
                let base_url = config
                    .base_url
                    .clone()
                    .unwrap_or_else(|| "http://localhost:11434".to_string());

                let mut builder = LlmBuilder::new()
                    .ollama()
                    .model(&config.model)
                    .base_url(&base_url)
                    .temperature(config.temperature);

                if let Some(max_tokens) = config.max_tokens {
                    builder = builder.max_tokens(max_tokens);
                }

                let client = builder
                    .build()
                    .await
                    .map_err(|e| Self::build_failed("Ollama", e))?;

                Ok(Box::new(client))
            }
            "groq" => {
                let api_key = config
                    .api_key
                    .as_deref()
                    .ok_or_else(|| Self::missing_key("Groq", "GROQ_API_KEY"))?;

                let mut builder = LlmBuilder::new()
                    .groq()
                    .api_key(api_key)
                    .model(&config.model)
                    .temperature(config.temperature);

                if let Some(max_tokens) = config.max_tokens {
                    builder = builder.max_tokens(max_tokens);
                }

                let client = builder
                    .build()
                    .await
                    .map_err(|e| Self::build_failed("Groq", e))?;

                Ok(Box::new(client))
            }
            provider => Err(DeepmailError::Config {
                message: format!("Unsupported LLM provider: {}", provider),
                source: None,
                context: ErrorContext::new("llm_client")
                    .with_operation("build_client")
                    .with_suggestion("Use one of: openai, anthropic, ollama, groq"),
            }),
        }
    }
}

#[async_trait]
impl AgentRuntime for LlmAgentRuntime {
    async fn run(&self, agent: &AgentSpec, input: &str) -> DeepmailResult<String> {
        let start_time = Instant::now();
        let system_prompt = agent.system_prompt();

        debug!(
            agent = %agent.name,
            model = %self.config.model,
            input_chars = input.len(),
            "Running agent"
        );

        let messages = vec![system!(system_prompt.as_str()), user!(input)];

        let response = self.client.chat(messages).await.map_err(|e| {
            agent_error!(format!("LLM generation failed: {}", e), agent.name)
        })?;

        match response.content_text() {
            Some(content) => {
                info!(
                    agent = %agent.name,
                    model = %self.config.model,
                    "Generated response in {:?} ({} chars)",
                    start_time.elapsed(),
                    content.len()
                );
                Ok(content.to_string())
            }
            None => Err(agent_error!("No text content in LLM response", agent.name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            api_key: api_key.map(str::to_string),
            ..LlmConfig::default()
        }
    }

    #[tokio::test]
    async fn test_unsupported_provider() {
        let result = LlmAgentRuntime::new(config("carrier-pigeon", Some("key"))).await;
        match result {
            Err(DeepmailError::Config { message, .. }) => {
                assert!(message.contains("carrier-pigeon"));
            }
            _ => panic!("expected config error"),
        }
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        for provider in ["openai", "anthropic", "groq"] {
            let result = LlmAgentRuntime::new(config(provider, None)).await;
            assert!(
                matches!(result, Err(DeepmailError::Config { .. })),
                "{} accepted a missing key",
                provider
            );
        }
    }
}
