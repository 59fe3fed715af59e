//! Deep research request/response types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionsRequest {
    #[schema(example = "SOC2 compliance automation tools for startups")]
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuestionsResponse {
    pub questions: Vec<String>,
    /// Message to show above the questions
    #[schema(example = "Please answer the 3 questions below to help focus the research:")]
    pub status: String,
}

/// Research run request; answers pair with questions by position
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResearchRunRequest {
    #[schema(example = "SOC2 compliance automation tools for startups")]
    pub query: String,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default)]
    pub answers: Vec<String>,
}
