//! Core data type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logging::LoggingConfig;

/// Definition of an LLM-backed agent: who it is and how it must answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpec {
    /// Display name, also used as the tracing field for the agent
    pub name: String,
    /// System instructions sent with every run
    pub instructions: String,
    /// Description of the JSON shape the agent must reply with, if any
    pub output_schema: Option<String>,
}

impl AgentSpec {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            output_schema: None,
        }
    }

    pub fn with_output_schema(mut self, schema: impl Into<String>) -> Self {
        self.output_schema = Some(schema.into());
        self
    }

    /// Full system prompt including the structured output contract
    pub fn system_prompt(&self) -> String {
        match &self.output_schema {
            Some(schema) => format!(
                "{}\n\nRespond only with a JSON object matching this shape, without commentary:\n{}",
                self.instructions, schema
            ),
            None => self.instructions.clone(),
        }
    }
}

/// Direction of an email relative to us
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inbound" => Ok(Direction::Inbound),
            "outbound" => Ok(Direction::Outbound),
            other => Err(format!("Unknown message direction: {}", other)),
        }
    }
}

/// A grouped email conversation with one prospect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub thread_id: String,
    pub prospect_email: String,
    pub prospect_name: Option<String>,
    pub subject: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Conversation row as listed, with its message count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub thread_id: String,
    pub prospect_email: String,
    pub prospect_name: Option<String>,
    pub subject: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub message_count: i64,
}

/// Input for opening (or touching) a conversation
#[derive(Debug, Clone)]
pub struct NewConversation {
    pub thread_id: String,
    pub prospect_email: String,
    pub prospect_name: Option<String>,
    pub subject: Option<String>,
}

/// A stored email message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub thread_id: String,
    pub direction: Direction,
    pub sender: String,
    pub recipient: String,
    pub subject: Option<String>,
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

/// Input for appending a message to a thread
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub thread_id: String,
    pub direction: Direction,
    pub sender: String,
    pub recipient: String,
    pub subject: Option<String>,
    pub body: String,
}

/// MIME type of an outgoing email body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmailContentType {
    #[serde(rename = "text/plain")]
    Plain,
    #[serde(rename = "text/html")]
    Html,
}

impl EmailContentType {
    pub fn mime(&self) -> &'static str {
        match self {
            EmailContentType::Plain => "text/plain",
            EmailContentType::Html => "text/html",
        }
    }
}

/// An email ready to hand to the delivery provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub content_type: EmailContentType,
}

/// Provider acknowledgement of an accepted email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailReceipt {
    pub status_code: u16,
    pub message_id: Option<String>,
}

/// 配置信息
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeepmailConfig {
    pub llm: LlmConfig,
    pub research: ResearchConfig,
    pub email: EmailConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider type (openai, anthropic, ollama, groq)
    pub provider: String,
    /// Model name
    pub model: String,
    /// API key (optional, can be set via environment)
    pub api_key: Option<String>,
    /// Base URL for custom providers
    pub base_url: Option<String>,
    /// Temperature for generation
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Number of web searches the planner is asked for
    pub how_many_searches: usize,
    /// Lower bound on follow-up questions requested from the query agent
    pub min_questions: usize,
    /// Upper bound on follow-up questions (one answer slot each)
    pub max_questions: usize,
    /// Searches in flight at once
    pub max_concurrent_searches: usize,
    /// A single search slower than this is dropped
    pub search_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Delivery provider (sendgrid)
    pub provider: String,
    /// Provider API base URL
    pub api_base_url: String,
    /// Provider API key (optional, can be set via environment)
    pub api_key: Option<String>,
    /// Verified sender address used for every outgoing email
    pub from_address: String,
    /// Where finished research reports are delivered
    pub research_recipient: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database URL for conversation tracking
    pub database_url: String,
}
