//! Core trait definitions

use crate::error::DeepmailResult;
use crate::types::*;
use async_trait::async_trait;

/// Executes an agent against free-form input and returns its final text output
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    async fn run(&self, agent: &AgentSpec, input: &str) -> DeepmailResult<String>;
}

/// Outbound email delivery
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Hand the email to the provider. Any non-2xx answer is an error.
    async fn send(&self, email: &OutboundEmail) -> DeepmailResult<EmailReceipt>;
}

/// Persistent conversation tracking for the auto-reply service
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Return the conversation for `thread_id`, creating it when absent.
    /// An existing conversation only has its `updated_at` refreshed.
    async fn get_or_create_conversation(
        &self,
        conversation: &NewConversation,
    ) -> DeepmailResult<Conversation>;

    /// 保存消息
    async fn save_message(&self, message: &NewMessage) -> DeepmailResult<()>;

    /// All messages of a thread ordered by timestamp ascending
    async fn conversation_history(&self, thread_id: &str) -> DeepmailResult<Vec<Message>>;

    /// All conversations with message counts, most recently updated first
    async fn list_conversations(&self) -> DeepmailResult<Vec<ConversationSummary>>;

    async fn get_conversation(&self, thread_id: &str) -> DeepmailResult<Option<Conversation>>;
}
