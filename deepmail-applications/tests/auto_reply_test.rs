//! Auto-reply service over an in-memory conversation store

mod common;

use common::{RecordingSender, ScriptedRuntime};
use deepmail_agents::agents::SDR_AGENT;
use deepmail_applications::{
    generate_thread_id, AutoReplyService, InboundEmail, SqliteConversationStore,
};
use deepmail_core::{ConversationStore, Direction, EmailContentType};
use std::sync::Arc;

const FROM: &str = "sdr@complai.test";

async fn service(
    runtime: ScriptedRuntime,
    sender: Arc<RecordingSender>,
) -> (AutoReplyService, Arc<SqliteConversationStore>, Arc<ScriptedRuntime>) {
    let store = Arc::new(
        SqliteConversationStore::connect("sqlite::memory:")
            .await
            .unwrap(),
    );
    let runtime = Arc::new(runtime);
    let service = AutoReplyService::new(store.clone(), runtime.clone(), sender, FROM);
    (service, store, runtime)
}

fn inbound(subject: &str, body: &str) -> InboundEmail {
    InboundEmail {
        sender_email: "jane@acme.test".to_string(),
        sender_name: "Jane Doe".to_string(),
        recipient: FROM.to_string(),
        subject: subject.to_string(),
        body: body.to_string(),
    }
}

#[tokio::test]
async fn test_reply_is_sent_and_stored() {
    let sender = Arc::new(RecordingSender::new());
    let (service, store, _) = service(
        ScriptedRuntime::new().reply(SDR_AGENT, "Hi Jane,\n\nHappy to show you a demo.\n\nThe ComplAI Team\n"),
        sender.clone(),
    )
    .await;

    let outcome = service
        .handle_inbound(inbound("SOC2 Compliance", "How long does an audit take?"))
        .await
        .unwrap();

    assert_eq!(outcome.thread_id, generate_thread_id("jane@acme.test", "SOC2 Compliance"));
    assert!(outcome.response_sent);
    assert_eq!(
        outcome.response_body,
        "Hi Jane,\n\nHappy to show you a demo.\n\nThe ComplAI Team"
    );

    let sent = sender.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "jane@acme.test");
    assert_eq!(sent[0].from, FROM);
    assert_eq!(sent[0].subject, "Re: SOC2 Compliance");
    assert_eq!(sent[0].content_type, EmailContentType::Plain);

    let history = store.conversation_history(&outcome.thread_id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].direction, Direction::Inbound);
    assert_eq!(history[0].body, "How long does an audit take?");
    assert_eq!(history[1].direction, Direction::Outbound);
    assert_eq!(history[1].subject.as_deref(), Some("Re: SOC2 Compliance"));
    assert_eq!(history[1].recipient, "jane@acme.test");

    let conversation = store
        .get_conversation(&outcome.thread_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(conversation.prospect_name.as_deref(), Some("Jane Doe"));
}

#[tokio::test]
async fn test_follow_up_joins_thread_with_history_in_prompt() {
    let sender = Arc::new(RecordingSender::new());
    let (service, store, runtime) = service(
        ScriptedRuntime::new().reply(SDR_AGENT, "Great, see you Tuesday."),
        sender.clone(),
    )
    .await;

    let first = service
        .handle_inbound(inbound("SOC2 Compliance", "Tell me more."))
        .await
        .unwrap();
    let second = service
        .handle_inbound(inbound("RE: SOC2 Compliance", "Tuesday works."))
        .await
        .unwrap();

    assert_eq!(first.thread_id, second.thread_id);
    assert_eq!(sender.sent()[1].subject, "RE: SOC2 Compliance");

    let prompts = runtime.inputs_for(SDR_AGENT);
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].contains(
        "[PROSPECT]: Tell me more.\n---\n[SDR (us)]: Great, see you Tuesday.\n---\n[PROSPECT]: Tuesday works.\n---\n"
    ));
    assert!(prompts[1].contains("The prospect just replied with:\n\"Tuesday works.\""));

    let conversations = store.list_conversations().await.unwrap();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].message_count, 4);
}

#[tokio::test]
async fn test_send_failure_is_reported_not_raised() {
    let (service, store, _) = service(
        ScriptedRuntime::new().reply(SDR_AGENT, "Thanks for reaching out."),
        Arc::new(RecordingSender::failing()),
    )
    .await;

    let outcome = service
        .handle_inbound(inbound("Pricing", "What does it cost?"))
        .await
        .unwrap();

    assert!(!outcome.response_sent);
    assert_eq!(outcome.response_body, "Thanks for reaching out.");

    let history = store.conversation_history(&outcome.thread_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].direction, Direction::Inbound);
}

#[tokio::test]
async fn test_agent_failure_is_an_error() {
    let sender = Arc::new(RecordingSender::new());
    let (service, store, _) = service(ScriptedRuntime::new().fail(SDR_AGENT), sender.clone()).await;

    let result = service.handle_inbound(inbound("Pricing", "Hello?")).await;
    assert!(result.is_err());
    assert!(sender.sent().is_empty());

    // The inbound message is kept even though no reply was written
    let thread_id = generate_thread_id("jane@acme.test", "Pricing");
    assert_eq!(store.conversation_history(&thread_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_file_database_persists_between_connections() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("sdr.db").display());

    {
        let store = Arc::new(SqliteConversationStore::connect(&url).await.unwrap());
        let service = AutoReplyService::new(
            store,
            Arc::new(ScriptedRuntime::new().reply(SDR_AGENT, "Hello Jane")),
            Arc::new(RecordingSender::new()),
            FROM,
        );
        service
            .handle_inbound(inbound("Audit prep", "Where do we start?"))
            .await
            .unwrap();
    }

    let reopened = SqliteConversationStore::connect(&url).await.unwrap();
    let conversations = reopened.list_conversations().await.unwrap();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].prospect_email, "jane@acme.test");
    assert_eq!(conversations[0].message_count, 2);
}
