//! Deepmail Agents - agent definitions, LLM runtime and email delivery
//!
//! This crate provides the concrete implementations behind the core
//! `AgentRuntime` and `EmailSender` seams:
//! - Agent definitions for the research pipeline and the SDR persona
//! - A siumai-backed runtime that works with OpenAI, Anthropic, Ollama and Groq
//! - Structured-output parsing for agents that answer in JSON
//! - SendGrid email delivery

pub mod agents;
pub mod email;
pub mod llm_client;
pub mod structured;
pub mod types;

pub use email::{create_email_sender, DisabledEmailSender, SendGridClient};
pub use llm_client::LlmAgentRuntime;
pub use structured::{extract_json, run_structured};
pub use types::*;
