//! Structured outputs produced by the research agents

use serde::{Deserialize, Serialize};

/// A type an agent can be asked to answer with.
///
/// `SCHEMA` is appended to the agent's system prompt so the model knows the
/// exact JSON shape to produce.
pub trait OutputSchema {
    const SCHEMA: &'static str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUpQuestions {
    /// A list of 3-5 follow up questions to ask the user
    pub questions: Vec<String>,
}

impl OutputSchema for FollowUpQuestions {
    const SCHEMA: &'static str = r#"{"questions": ["<follow up question to ask the user>"]}"#;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearchItem {
    /// Why this search matters for the query
    pub reason: String,
    /// The search term to use
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearchPlan {
    pub searches: Vec<WebSearchItem>,
}

impl OutputSchema for WebSearchPlan {
    const SCHEMA: &'static str = r#"{"searches": [{"reason": "<why this search is important to the query>", "query": "<the search term to use>"}]}"#;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    /// A 2-3 sentence summary of the findings
    pub short_summary: String,
    /// The final report in markdown
    pub markdown_report: String,
    /// Suggested topics to research further
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
}

impl OutputSchema for ReportData {
    const SCHEMA: &'static str = r#"{"short_summary": "<2-3 sentence summary of the findings>", "markdown_report": "<the final report in markdown>", "follow_up_questions": ["<suggested topic to research further>"]}"#;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub subject: String,
    pub html_body: String,
}

impl OutputSchema for EmailDraft {
    const SCHEMA: &'static str =
        r#"{"subject": "<email subject line>", "html_body": "<the report as a well formatted HTML document>"}"#;
}
