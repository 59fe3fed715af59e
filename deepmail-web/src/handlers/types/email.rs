//! Inbound email, simulation and conversation types

use deepmail_core::{ConversationSummary, Message};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fields of an inbound-parse webhook post.
///
/// Sent as `application/x-www-form-urlencoded` or `multipart/form-data`;
/// other fields of the post are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct WebhookForm {
    #[schema(example = "\"Jane Doe\" <jane@acme.com>")]
    pub from: Option<String>,
    #[schema(example = "sdr@complai.com")]
    pub to: Option<String>,
    #[schema(example = "SOC2 Compliance")]
    pub subject: Option<String>,
    /// Plain text body
    pub text: Option<String>,
    /// HTML body, used when the text body is empty
    pub html: Option<String>,
}

impl WebhookForm {
    /// Set a field by its form name; returns false for unknown names
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "from" => &mut self.from,
            "to" => &mut self.to,
            "subject" => &mut self.subject,
            "text" => &mut self.text,
            "html" => &mut self.html,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WebhookResponse {
    #[schema(example = "processed")]
    pub status: String,
    #[schema(example = "3f9a1c2b7d4e")]
    pub thread_id: String,
    pub response_sent: bool,
}

/// Simulated prospect email; every field has a default
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SimulateRequest {
    #[schema(example = "test@example.com")]
    pub from: Option<String>,
    #[schema(example = "Test User")]
    pub name: Option<String>,
    #[schema(example = "Test Subject")]
    pub subject: Option<String>,
    #[schema(example = "This is a test message.")]
    pub body: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SimulateResponse {
    #[schema(example = "processed")]
    pub status: String,
    pub thread_id: String,
    pub response_body: String,
    pub email_sent: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConversationSummaryResponse {
    pub thread_id: String,
    #[schema(example = "jane@acme.com")]
    pub prospect_email: String,
    pub prospect_name: Option<String>,
    pub subject: Option<String>,
    #[schema(example = "active")]
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub message_count: i64,
}

impl From<ConversationSummary> for ConversationSummaryResponse {
    fn from(summary: ConversationSummary) -> Self {
        Self {
            thread_id: summary.thread_id,
            prospect_email: summary.prospect_email,
            prospect_name: summary.prospect_name,
            subject: summary.subject,
            status: summary.status,
            created_at: summary.created_at,
            message_count: summary.message_count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "inbound")]
    pub direction: String,
    pub sender: String,
    pub recipient: String,
    pub subject: Option<String>,
    pub body: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            direction: message.direction.to_string(),
            sender: message.sender,
            recipient: message.recipient,
            subject: message.subject,
            body: message.body,
            timestamp: message.timestamp,
        }
    }
}
