//! Email delivery through SendGrid

use async_trait::async_trait;
use deepmail_core::{
    config_error, email_error, DeepmailResult, EmailConfig, EmailReceipt, EmailSender,
    OutboundEmail,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

const PROVIDER: &str = "sendgrid";

/// SendGrid v3 mail-send client
#[derive(Clone)]
pub struct SendGridClient {
    http: reqwest::Client,
    api_base_url: String,
    api_key: String,
}

impl SendGridClient {
    pub fn new(api_base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &EmailConfig) -> DeepmailResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| config_error!("SendGrid API key not configured", "email"))?;
        Ok(Self::new(&config.api_base_url, api_key))
    }

    fn request_body(email: &OutboundEmail) -> serde_json::Value {
        json!({
            "personalizations": [{ "to": [{ "email": email.to }] }],
            "from": { "email": email.from },
            "subject": email.subject,
            "content": [{ "type": email.content_type.mime(), "value": email.body }],
        })
    }
}

#[async_trait]
impl EmailSender for SendGridClient {
    async fn send(&self, email: &OutboundEmail) -> DeepmailResult<EmailReceipt> {
        let response = self
            .http
            .post(format!("{}/v3/mail/send", self.api_base_url))
            .bearer_auth(&self.api_key)
            .json(&Self::request_body(email))
            .send()
            .await
            .map_err(|e| email_error!(format!("Request to SendGrid failed: {}", e), PROVIDER))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(to = %email.to, status = status.as_u16(), "SendGrid rejected email");
            return Err(email_error!(
                format!("SendGrid answered {}: {}", status, detail),
                PROVIDER,
                status.as_u16()
            ));
        }

        let message_id = response
            .headers()
            .get("x-message-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        info!(to = %email.to, status = status.as_u16(), "Sent email");

        Ok(EmailReceipt {
            status_code: status.as_u16(),
            message_id,
        })
    }
}

/// Sender used when no provider key is configured; every send fails
#[derive(Debug, Default, Clone)]
pub struct DisabledEmailSender;

#[async_trait]
impl EmailSender for DisabledEmailSender {
    async fn send(&self, email: &OutboundEmail) -> DeepmailResult<EmailReceipt> {
        warn!(to = %email.to, "Email delivery is disabled, dropping email");
        Err(email_error!("Email delivery is not configured", "disabled"))
    }
}

/// Build the sender for `config`, falling back to [`DisabledEmailSender`]
/// when no API key is available
pub fn create_email_sender(config: &EmailConfig) -> Arc<dyn EmailSender> {
    match SendGridClient::from_config(config) {
        Ok(client) => Arc::new(client),
        Err(_) => {
            warn!("SENDGRID_API_KEY not set, outgoing email is disabled");
            Arc::new(DisabledEmailSender)
        }
    }
}
