//! Inbound email webhook

use super::types::{ErrorResponse, WebhookForm, WebhookResponse};
use crate::{AppState, WebError, WebResult};
use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    response::Json,
    Form,
};
use deepmail_applications::InboundEmail;
use tracing::{debug, info};

/// Webhook fields extracted from either form encoding
#[derive(Debug)]
pub struct WebhookFields(pub WebhookForm);

impl<S> FromRequest<S> for WebhookFields
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(form) = Form::<WebhookForm>::from_request(req, state)
                .await
                .map_err(|e| WebError::BadRequest(e.body_text()))?;
            return Ok(Self(form));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| WebError::BadRequest(e.body_text()))?;

        let mut form = WebhookForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| WebError::BadRequest(e.body_text()))?
        {
            // Attachments are not part of the conversation
            if field.file_name().is_some() {
                continue;
            }
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let value = field
                .text()
                .await
                .map_err(|e| WebError::BadRequest(e.body_text()))?;
            if !form.set(&name, value) {
                debug!(field = %name, "Ignoring webhook field");
            }
        }

        Ok(Self(form))
    }
}

/// Receive an email from the inbound-parse provider and answer it
#[utoipa::path(
    post,
    path = "/webhook/email",
    tag = "SDR",
    summary = "Inbound email webhook",
    description = "Record an inbound prospect email, generate a reply with the SDR agent and send it",
    request_body(
        content = WebhookForm,
        content_type = "application/x-www-form-urlencoded",
        description = "Inbound parse fields; multipart/form-data is accepted too"
    ),
    responses(
        (status = 200, description = "Email processed", body = WebhookResponse),
        (status = 400, description = "Missing sender", body = ErrorResponse),
        (status = 500, description = "Processing failed", body = ErrorResponse)
    )
)]
pub async fn receive_email(
    State(state): State<AppState>,
    WebhookFields(form): WebhookFields,
) -> WebResult<Json<WebhookResponse>> {
    let email = InboundEmail::from_webhook_fields(
        form.from.as_deref(),
        form.to.as_deref(),
        form.subject.as_deref(),
        form.text.as_deref(),
        form.html.as_deref(),
    )?;

    info!(from = %email.sender_email, "Webhook email received");
    let outcome = state.auto_reply.handle_inbound(email).await?;

    Ok(Json(WebhookResponse {
        status: "processed".to_string(),
        thread_id: outcome.thread_id,
        response_sent: outcome.response_sent,
    }))
}
