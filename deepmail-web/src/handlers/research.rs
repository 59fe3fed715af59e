//! Deep research handlers

use super::extract::ApiJson;
use super::types::{ErrorResponse, QuestionsRequest, QuestionsResponse, ResearchRunRequest};
use crate::{AppState, WebError, WebResult};
use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive},
        Json, Sse,
    },
};
use deepmail_applications::{ApplicationError, ResearchUpdate, BLANK_QUERY_MESSAGE};
use futures_util::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;
use tracing::info;

/// Generate clarifying questions for a research query
#[utoipa::path(
    post,
    path = "/research/questions",
    tag = "Research",
    request_body = QuestionsRequest,
    responses(
        (status = 200, description = "Questions generated, or a prompt to enter a topic", body = QuestionsResponse),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse),
        (status = 500, description = "Question generation failed", body = ErrorResponse)
    )
)]
pub async fn research_questions(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<QuestionsRequest>,
) -> WebResult<Json<QuestionsResponse>> {
    match state.research.generate_questions(&request.query).await {
        Ok(questions) => Ok(Json(QuestionsResponse {
            status: format!(
                "Please answer the {} questions below to help focus the research:",
                questions.len()
            ),
            questions,
        })),
        Err(ApplicationError::Validation { message }) => Ok(Json(QuestionsResponse {
            questions: Vec::new(),
            status: message,
        })),
        Err(e) => Err(e.into()),
    }
}

/// SSE event for one research update
pub fn update_event(update: ResearchUpdate) -> Event {
    match update {
        ResearchUpdate::Status(line) => Event::default().event("status").data(line),
        ResearchUpdate::Report(report) => Event::default().event("report").data(report),
        ResearchUpdate::Failed(message) => Event::default().event("error").data(message),
    }
}

/// Run the research pipeline and stream its progress.
///
/// Emits `status` events, then exactly one `report` or `error` event.
#[utoipa::path(
    post,
    path = "/research/run",
    tag = "Research",
    request_body = ResearchRunRequest,
    responses(
        (status = 200, description = "Server-sent events: status, report, error", content_type = "text/event-stream"),
        (status = 400, description = "Blank query or malformed JSON body", body = ErrorResponse)
    )
)]
pub async fn research_run(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ResearchRunRequest>,
) -> WebResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let query = request.query.trim().to_string();
    if query.is_empty() {
        return Err(WebError::BadRequest(BLANK_QUERY_MESSAGE.to_string()));
    }

    info!(
        query = %query,
        answers = request.answers.len(),
        "Starting research run"
    );

    let events = state
        .research
        .run(query, request.questions, request.answers)
        .map(|update| Ok::<_, Infallible>(update_event(update)));

    Ok(Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    ))
}
