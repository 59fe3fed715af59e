//! Reply generation with the SDR agent

use deepmail_agents::agents::sdr_agent;
use deepmail_core::{agent_error, AgentRuntime, AgentSpec, DeepmailResult, Direction, Message};
use std::sync::Arc;
use tracing::{info, info_span, Instrument};

/// Render the thread and the latest prospect message as the SDR agent's input
pub fn build_reply_prompt(history: &[Message], latest_message: &str) -> String {
    let mut context = String::from("Here is the conversation history:\n");

    for message in history {
        let speaker = match message.direction {
            Direction::Inbound => "PROSPECT",
            Direction::Outbound => "SDR (us)",
        };
        context.push_str(&format!("[{}]: {}\n---\n", speaker, message.body));
    }

    format!(
        "{}\n\nThe prospect just replied with:\n\"{}\"\n\n\
         Write a professional follow-up email response to continue the sales conversation.\n\
         Remember to address their message and move the conversation toward scheduling a demo.",
        context, latest_message
    )
}

/// Writes replies to prospects
#[derive(Clone)]
pub struct SdrResponder {
    runtime: Arc<dyn AgentRuntime>,
    agent: AgentSpec,
}

impl SdrResponder {
    pub fn new(runtime: Arc<dyn AgentRuntime>) -> Self {
        Self {
            runtime,
            agent: sdr_agent(),
        }
    }

    pub async fn respond(
        &self,
        history: &[Message],
        latest_message: &str,
    ) -> DeepmailResult<String> {
        let prompt = build_reply_prompt(history, latest_message);

        let reply = self
            .runtime
            .run(&self.agent, &prompt)
            .instrument(info_span!("sdr_auto_reply", messages = history.len()))
            .await?;

        let reply = reply.trim();
        if reply.is_empty() {
            return Err(agent_error!("SDR agent produced an empty reply", self.agent.name));
        }

        info!(chars = reply.len(), "Generated SDR reply");
        Ok(reply.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(direction: Direction, body: &str) -> Message {
        Message {
            thread_id: "t".to_string(),
            direction,
            sender: "a@b.test".to_string(),
            recipient: "c@d.test".to_string(),
            subject: None,
            body: body.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_prompt_labels_speakers() {
        let history = vec![
            message(Direction::Outbound, "Would a demo help?"),
            message(Direction::Inbound, "Yes, Tuesday works."),
        ];
        let prompt = build_reply_prompt(&history, "Yes, Tuesday works.");

        assert!(prompt.starts_with(
            "Here is the conversation history:\n[SDR (us)]: Would a demo help?\n---\n[PROSPECT]: Yes, Tuesday works.\n---\n"
        ));
        assert!(prompt.contains("The prospect just replied with:\n\"Yes, Tuesday works.\""));
        assert!(prompt.ends_with("move the conversation toward scheduling a demo."));
    }

    #[test]
    fn test_prompt_with_empty_history() {
        let prompt = build_reply_prompt(&[], "Hello");
        assert!(prompt.starts_with("Here is the conversation history:\n\n\nThe prospect"));
    }
}
