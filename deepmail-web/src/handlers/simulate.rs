//! Manual testing without an email provider

use super::extract::ApiJson;
use super::types::{ErrorResponse, SimulateRequest, SimulateResponse};
use crate::{AppState, WebResult};
use axum::{extract::State, response::Json};
use deepmail_applications::InboundEmail;

const DEFAULT_FROM: &str = "test@example.com";
const DEFAULT_NAME: &str = "Test User";
const DEFAULT_SUBJECT: &str = "Test Subject";
const DEFAULT_BODY: &str = "This is a test message.";

/// Run the auto-reply flow for a simulated prospect email.
///
/// The body is used as given; no quote or signature stripping happens here.
#[utoipa::path(
    post,
    path = "/test/simulate",
    tag = "SDR",
    summary = "Simulate an inbound email",
    request_body = SimulateRequest,
    responses(
        (status = 200, description = "Simulated email processed", body = SimulateResponse),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse),
        (status = 500, description = "Processing failed", body = ErrorResponse)
    )
)]
pub async fn simulate_email(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SimulateRequest>,
) -> WebResult<Json<SimulateResponse>> {
    let email = InboundEmail {
        sender_email: request.from.unwrap_or_else(|| DEFAULT_FROM.to_string()),
        sender_name: request.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
        recipient: state.auto_reply.from_address().to_string(),
        subject: request.subject.unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
        body: request.body.unwrap_or_else(|| DEFAULT_BODY.to_string()),
    };

    let outcome = state.auto_reply.handle_inbound(email).await?;

    Ok(Json(SimulateResponse {
        status: "processed".to_string(),
        thread_id: outcome.thread_id,
        response_body: outcome.response_body,
        email_sent: outcome.response_sent,
    }))
}
