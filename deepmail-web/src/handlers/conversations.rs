//! Conversation inspection

use super::types::{ConversationSummaryResponse, ErrorResponse, MessageResponse};
use crate::{AppState, WebResult};
use axum::{
    extract::{Path, State},
    response::Json,
};

/// List all conversations, most recently active first
#[utoipa::path(
    get,
    path = "/conversations",
    tag = "Conversations",
    responses(
        (status = 200, description = "All conversations", body = [ConversationSummaryResponse]),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_conversations(
    State(state): State<AppState>,
) -> WebResult<Json<Vec<ConversationSummaryResponse>>> {
    let conversations = state.store.list_conversations().await?;
    Ok(Json(conversations.into_iter().map(Into::into).collect()))
}

/// Messages of one thread in chronological order; unknown threads are empty
#[utoipa::path(
    get,
    path = "/conversations/{thread_id}",
    tag = "Conversations",
    params(
        ("thread_id" = String, Path, description = "Conversation thread id")
    ),
    responses(
        (status = 200, description = "Thread messages", body = [MessageResponse]),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
) -> WebResult<Json<Vec<MessageResponse>>> {
    let history = state.store.conversation_history(&thread_id).await?;
    Ok(Json(history.into_iter().map(Into::into).collect()))
}
