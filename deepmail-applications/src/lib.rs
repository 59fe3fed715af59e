//! Deepmail Applications - the two user-facing workflows
//!
//! - **Deep research**: follow-up questions, search planning, concurrent
//!   searches, report writing and email delivery, streamed as status updates
//! - **SDR auto-reply**: threaded conversation tracking and agent-written
//!   replies to inbound prospect email
//!
//! Both workflows only talk to the outside world through the core seams
//! (`AgentRuntime`, `EmailSender`, `ConversationStore`), so the presentation
//! layers (deepmail-web, deepmail-cli) decide which implementations to inject.

pub mod research;
pub mod sdr;

pub use research::{ResearchManager, ResearchSession, ResearchUpdate, BLANK_QUERY_MESSAGE};
#[cfg(feature = "sqlite")]
pub use sdr::SqliteConversationStore;
pub use sdr::{
    clean_email_body, generate_thread_id, normalize_subject, parse_sender, reply_subject,
    AutoReplyService, InboundEmail, ReplyOutcome, SdrResponder, SenderAddress,
};

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("Core error: {0}")]
    Core(#[from] deepmail_core::DeepmailError),

    #[error("{message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;

impl ApplicationError {
    /// Create a validation error; the message is shown to the user as is
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the caller's input caused the error
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Validation { .. } => true,
            Self::Core(e) => e.is_client_error(),
            _ => false,
        }
    }
}
