//! 集成测试辅助工具
//!
//! 在随机端口上启动完整的应用，LLM 和邮件服务使用可编程的替身

#![allow(dead_code)]

use async_trait::async_trait;
use deepmail_applications::SqliteConversationStore;
use deepmail_core::{
    agent_error, email_error, AgentRuntime, AgentSpec, DeepmailConfig, DeepmailResult,
    EmailReceipt, EmailSender, OutboundEmail,
};
use deepmail_web::{create_app, AppState, WebConfig};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex};
use tokio::net::TcpListener;

pub const SDR_ADDRESS: &str = "sdr@complai.test";
pub const RESEARCH_RECIPIENT: &str = "founder@complai.test";

// 确保tracing只初始化一次
static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
});

/// 按 agent 名称返回预设回复
#[derive(Default)]
pub struct ScriptedRuntime {
    replies: HashMap<String, Result<String, String>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, agent: &str, reply: &str) -> Self {
        self.replies.insert(agent.to_string(), Ok(reply.to_string()));
        self
    }

    pub fn fail(mut self, agent: &str) -> Self {
        self.replies
            .insert(agent.to_string(), Err("model unavailable".to_string()));
        self
    }

    pub fn inputs_for(&self, agent: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == agent)
            .map(|(_, input)| input.clone())
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

        match self.replies.get(&agent.name) {
            Some(Ok(reply)) => Ok(reply.clone()),
            Some(Err(e)) => Err(agent_error!(e.clone(), agent.name)),
            None => Err(agent_error!("no script for agent", agent.name)),
        }
    }
}

/// 记录所有发出的邮件
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
            message_id: None,
        })
    }
}

/// 测试应用实例
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub runtime: Arc<ScriptedRuntime>,
    pub sender: Arc<RecordingSender>,
}

impl TestApp {
    /// 健康检查
    pub async fn get_health(&self) -> reqwest::Response {
        self.api_client
            .get(format!("{}/health", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// 以 urlencoded 表单投递 webhook
    pub async fn post_webhook_form(&self, fields: &[(&str, &str)]) -> reqwest::Response {
        self.api_client
            .post(format!("{}/webhook/email", &self.address))
            .form(fields)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// 以 multipart 表单投递 webhook
    pub async fn post_webhook_multipart(&self, form: reqwest::multipart::Form) -> reqwest::Response {
        self.api_client
            .post(format!("{}/webhook/email", &self.address))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_simulate(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/test/simulate", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_conversations(&self) -> reqwest::Response {
        self.api_client
            .get(format!("{}/conversations", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_conversation(&self, thread_id: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}/conversations/{}", &self.address, thread_id))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_research_questions(&self, query: &str) -> reqwest::Response {
        self.api_client
            .post(format!("{}/research/questions", &self.address))
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_research_run(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/research/run", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// 启动测试应用
pub async fn spawn_app(runtime: ScriptedRuntime, sender: RecordingSender) -> TestApp {
    LazyLock::force(&TRACING);

    let mut settings = DeepmailConfig::default();
    settings.email.from_address = SDR_ADDRESS.to_string();
    settings.email.research_recipient = Some(RESEARCH_RECIPIENT.to_string());

    let store = SqliteConversationStore::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory store");
    let runtime = Arc::new(runtime);
    let sender = Arc::new(sender);

    let state = AppState::with_services(
        WebConfig::default(),
        settings,
        Arc::new(store),
        runtime.clone(),
        sender.clone(),
    );
    let app = create_app(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        port,
        api_client: reqwest::Client::new(),
        runtime,
        sender,
    }
}
