//! Test doubles for the agent runtime and the email sender

#![allow(dead_code)]

use async_trait::async_trait;
use deepmail_core::{
    agent_error, email_error, AgentRuntime, AgentSpec, DeepmailResult, EmailReceipt, EmailSender,
    OutboundEmail,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Handler = Arc<dyn Fn(&str) -> Result<String, String> + Send + Sync>;

/// Agent runtime answering from per-agent scripts
#[derive(Default)]
pub struct ScriptedRuntime {
    handlers: HashMap<String, Handler>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `reply` for `agent`
    pub fn reply(self, agent: &str, reply: &str) -> Self {
        let reply = reply.to_string();
        self.handle(agent, move |_| Ok(reply.clone()))
    }

    /// Always fail for `agent`
    pub fn fail(self, agent: &str) -> Self {
        self.handle(agent, |_| Err("model unavailable".to_string()))
    }

    pub fn handle<F>(mut self, agent: &str, handler: F) -> Self
    where
        F: Fn(&str) -> Result<String, String> + Send + Sync + 'static,
    {
        self.handlers.insert(agent.to_string(), Arc::new(handler));
        self
    }

    pub fn delay(mut self, agent: &str, delay: Duration) -> Self {
        self.delays.insert(agent.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn inputs_for(&self, agent: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(name, _)| name == agent)
            .map(|(_, input)| input)
            .collect()
    }
}

#[async_trait]
impl AgentRuntime for ScriptedRuntime {
    async fn run(&self, agent: &AgentSpec, input: &str) -> DeepmailResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push((agent.name.clone(), input.to_string()));

        if let Some(delay) = self.delays.get(&agent.name) {
            tokio::time::sleep(*delay).await;
        }

        let handler = self
            .handlers
            .get(&agent.name)
            .ok_or_else(|| agent_error!("no script for agent", agent.name))?;
        handler(input).map_err(|e| agent_error!(e, agent.name))
    }
}

/// Email sender that records every email and can be told to fail
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<OutboundEmail>>,
    fail: bool,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for RecordingSender {
    async fn send(&self, email: &OutboundEmail) -> DeepmailResult<EmailReceipt> {
        if self.fail {
            return Err(email_error!("provider rejected the email", "test", 403));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(EmailReceipt {
            status_code: 202,
            message_id: Some(format!("test-{}", self.sent.lock().unwrap().len())),
        })
    }
}
