//! Research session types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One step of a running research session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum ResearchUpdate {
    /// Human readable progress line
    Status(String),
    /// The final markdown report; always the last update of a successful run
    Report(String),
    /// The run stopped early
    Failed(String),
}

/// Request-scoped state of one research run. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchSession {
    pub id: Uuid,
    pub query: String,
    pub questions: Vec<String>,
    pub answers: Vec<String>,
}

impl ResearchSession {
    pub fn new(query: impl Into<String>, questions: Vec<String>, answers: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            query: query.into(),
            questions,
            answers,
        }
    }

    /// Question/answer pairs as `Q: ...\nA: ...` blocks joined by newlines.
    /// Unpaired questions or answers are left out.
    pub fn qa_text(&self) -> String {
        self.questions
            .iter()
            .zip(&self.answers)
            .map(|(q, a)| format!("Q: {}\nA: {}", q, a))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Input handed to the planner agent
    pub fn planner_input(&self) -> String {
        format!(
            "Original Query: {}\n\nFollow-up Questions and User's Answers:\n{}",
            self.query,
            self.qa_text()
        )
    }
}
