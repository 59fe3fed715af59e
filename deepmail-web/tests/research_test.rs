//! Research question and streaming run endpoints

mod helpers;

use deepmail_agents::agents::{EMAIL_AGENT, PLANNER_AGENT, QUERY_AGENT, SEARCH_AGENT, WRITER_AGENT};
use helpers::{spawn_app, RecordingSender, ScriptedRuntime, RESEARCH_RECIPIENT};
use serde_json::{json, Value};

fn research_runtime() -> ScriptedRuntime {
    ScriptedRuntime::new()
        .reply(
            QUERY_AGENT,
            r#"{"questions": ["Company size?", "Timeline?", "Budget?"]}"#,
        )
        .reply(
            PLANNER_AGENT,
            r#"{"searches": [{"reason": "overview", "query": "soc2 tools"}]}"#,
        )
        .reply(SEARCH_AGENT, "Vanta and Drata lead the market.")
        .reply(
            WRITER_AGENT,
            r##"{"short_summary": "Two leaders.", "markdown_report": "# SOC2 Tools\n\nVanta and Drata.", "follow_up_questions": []}"##,
        )
        .reply(
            EMAIL_AGENT,
            r#"{"subject": "SOC2 Tools", "html_body": "<h1>SOC2 Tools</h1>"}"#,
        )
}

#[tokio::test]
async fn questions_are_generated() {
    let app = spawn_app(research_runtime(), RecordingSender::new()).await;

    let response = app.post_research_questions("SOC2 tooling").await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["questions"], json!(["Company size?", "Timeline?", "Budget?"]));
    assert_eq!(
        body["status"],
        "Please answer the 3 questions below to help focus the research:"
    );
}

#[tokio::test]
async fn blank_query_asks_for_topic() {
    let app = spawn_app(research_runtime(), RecordingSender::new()).await;

    let body: Value = app.post_research_questions("   ").await.json().await.unwrap();
    assert_eq!(body["questions"], json!([]));
    assert_eq!(body["status"], "Please enter a research topic first.");
    assert!(app.runtime.inputs_for(QUERY_AGENT).is_empty());
}

#[tokio::test]
async fn run_streams_status_then_report() {
    let app = spawn_app(research_runtime(), RecordingSender::new()).await;

    let response = app
        .post_research_run(&json!({
            "query": "SOC2 tooling",
            "questions": ["Company size?"],
            "answers": ["40 people"]
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let stream = response.text().await.unwrap();
    assert!(stream.contains("event: status\ndata: Research session: "));
    assert!(stream.contains("data: Searches planned, starting to search..."));
    assert!(stream.contains("data: Email sent, research complete"));
    assert!(stream.contains("event: report\ndata: # SOC2 Tools\n"));
    assert!(stream.contains("data: Vanta and Drata."));
    assert!(!stream.contains("event: error"));

    let sent = app.sender.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, RESEARCH_RECIPIENT);
    assert_eq!(sent[0].subject, "SOC2 Tools");

    let planner_input = &app.runtime.inputs_for(PLANNER_AGENT)[0];
    assert!(planner_input.contains("Q: Company size?\nA: 40 people"));
}

#[tokio::test]
async fn run_failure_streams_error_event() {
    let app = spawn_app(research_runtime().fail(PLANNER_AGENT), RecordingSender::new()).await;

    let stream = app
        .post_research_run(&json!({"query": "SOC2 tooling"}))
        .await
        .text()
        .await
        .unwrap();

    assert!(stream.contains("event: error\ndata: Search planning failed"));
    assert!(!stream.contains("event: report"));
}

#[tokio::test]
async fn run_rejects_blank_query() {
    let app = spawn_app(research_runtime(), RecordingSender::new()).await;

    let response = app.post_research_run(&json!({"query": ""})).await;
    assert_eq!(response.status().as_u16(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Please enter a research topic first.");
}
