//! Auto-reply service: one inbound email in, one reply out

use crate::sdr::responder::SdrResponder;
use crate::sdr::thread::{clean_email_body, generate_thread_id, parse_sender, reply_subject};
use crate::{ApplicationError, ApplicationResult};
use deepmail_core::{
    AgentRuntime, ConversationStore, Direction, EmailContentType, EmailSender, NewConversation,
    NewMessage, OutboundEmail,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};

pub const DEFAULT_SUBJECT: &str = "No Subject";

/// A normalized inbound email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEmail {
    pub sender_email: String,
    pub sender_name: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl InboundEmail {
    /// Build from inbound-parse webhook fields.
    ///
    /// The plain-text body wins over the HTML one when non-empty; quoted
    /// replies and signatures are stripped.
    pub fn from_webhook_fields(
        from: Option<&str>,
        to: Option<&str>,
        subject: Option<&str>,
        text: Option<&str>,
        html: Option<&str>,
    ) -> ApplicationResult<Self> {
        let sender = parse_sender(from.unwrap_or_default());
        if sender.email.is_empty() {
            return Err(ApplicationError::validation("Missing sender address"));
        }

        let body = match text {
            Some(text) if !text.is_empty() => text,
            _ => html.unwrap_or_default(),
        };

        Ok(Self {
            sender_email: sender.email,
            sender_name: sender.name,
            recipient: to.unwrap_or_default().to_string(),
            subject: subject.unwrap_or(DEFAULT_SUBJECT).to_string(),
            body: clean_email_body(body),
        })
    }
}

/// Result of answering one inbound email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyOutcome {
    pub thread_id: String,
    pub response_body: String,
    /// Whether the provider accepted the reply
    pub response_sent: bool,
}

pub struct AutoReplyService {
    store: Arc<dyn ConversationStore>,
    responder: SdrResponder,
    email_sender: Arc<dyn EmailSender>,
    from_address: String,
}

impl AutoReplyService {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        runtime: Arc<dyn AgentRuntime>,
        email_sender: Arc<dyn EmailSender>,
        from_address: impl Into<String>,
    ) -> Self {
        Self {
            store,
            responder: SdrResponder::new(runtime),
            email_sender,
            from_address: from_address.into(),
        }
    }

    pub fn from_address(&self) -> &str {
        &self.from_address
    }

    /// Record the email, write a reply and send it.
    ///
    /// A delivery failure is not an error: the outcome reports
    /// `response_sent = false` and the reply is not stored.
    pub async fn handle_inbound(&self, email: InboundEmail) -> ApplicationResult<ReplyOutcome> {
        if email.sender_email.trim().is_empty() {
            return Err(ApplicationError::validation("Missing sender address"));
        }

        let thread_id = generate_thread_id(&email.sender_email, &email.subject);
        let span = info_span!("sdr_reply", thread_id = %thread_id);

        self.process(thread_id, email).instrument(span).await
    }

    async fn process(
        &self,
        thread_id: String,
        email: InboundEmail,
    ) -> ApplicationResult<ReplyOutcome> {
        info!(
            from = %email.sender_email,
            subject = %email.subject,
            "Incoming email received"
        );

        self.store
            .get_or_create_conversation(&NewConversation {
                thread_id: thread_id.clone(),
                prospect_email: email.sender_email.clone(),
                prospect_name: Some(email.sender_name.clone()),
                subject: Some(email.subject.clone()),
            })
            .await?;

        self.store
            .save_message(&NewMessage {
                thread_id: thread_id.clone(),
                direction: Direction::Inbound,
                sender: email.sender_email.clone(),
                recipient: email.recipient.clone(),
                subject: Some(email.subject.clone()),
                body: email.body.clone(),
            })
            .await?;

        let history = self.store.conversation_history(&thread_id).await?;
        let response_body = self.responder.respond(&history, &email.body).await?;
        let subject = reply_subject(&email.subject);

        let sent = self
            .email_sender
            .send(&OutboundEmail {
                from: self.from_address.clone(),
                to: email.sender_email.clone(),
                subject: subject.clone(),
                body: response_body.clone(),
                content_type: EmailContentType::Plain,
            })
            .await;

        let response_sent = match sent {
            Ok(receipt) => {
                info!(status = receipt.status_code, "Sent reply");
                self.store
                    .save_message(&NewMessage {
                        thread_id: thread_id.clone(),
                        direction: Direction::Outbound,
                        sender: self.from_address.clone(),
                        recipient: email.sender_email.clone(),
                        subject: Some(subject),
                        body: response_body.clone(),
                    })
                    .await?;
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to send reply");
                false
            }
        };

        Ok(ReplyOutcome {
            thread_id,
            response_body,
            response_sent,
        })
    }
}
