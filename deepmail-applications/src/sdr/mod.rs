//! SDR auto-reply
//!
//! Inbound prospect email is grouped into threads by sender and normalized
//! subject, stored, answered by the SDR agent and the answer mailed back.

pub mod responder;
pub mod service;
#[cfg(feature = "sqlite")]
pub mod storage;
pub mod thread;

pub use responder::{build_reply_prompt, SdrResponder};
pub use service::{AutoReplyService, InboundEmail, ReplyOutcome};
#[cfg(feature = "sqlite")]
pub use storage::SqliteConversationStore;
pub use thread::{
    clean_email_body, generate_thread_id, normalize_subject, parse_sender, reply_subject,
    SenderAddress,
};
