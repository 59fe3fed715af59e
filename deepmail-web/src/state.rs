//! Application state shared by all handlers

use crate::{WebConfig, WebError, WebResult};
use deepmail_agents::{create_email_sender, LlmAgentRuntime};
use deepmail_applications::{AutoReplyService, ResearchManager, SqliteConversationStore};
use deepmail_core::{AgentRuntime, ConversationStore, DeepmailConfig, EmailSender};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: WebConfig,
    /// Conversation persistence
    pub store: Arc<dyn ConversationStore>,
    /// SDR auto-reply workflow
    pub auto_reply: Arc<AutoReplyService>,
    /// Deep research workflow
    pub research: ResearchManager,
}

impl AppState {
    /// Load configuration, open the database and build the LLM and email clients
    pub async fn new(config: WebConfig) -> WebResult<Self> {
        let mut settings = DeepmailConfig::load(config.config_path.as_deref().map(Path::new))?;
        if let Some(url) = &config.database_url {
            settings.storage.database_url = url.clone();
        }

        info!(database = %settings.storage.database_url, "Opening conversation store");
        let store = SqliteConversationStore::connect(&settings.storage.database_url)
            .await
            .map_err(|e| WebError::Config(format!("Failed to open database: {}", e)))?;

        info!(
            provider = %settings.llm.provider,
            model = %settings.llm.model,
            "Initializing LLM runtime"
        );
        let runtime = LlmAgentRuntime::new(settings.llm.clone()).await?;
        let sender = create_email_sender(&settings.email);

        Ok(Self::with_services(
            config,
            settings,
            Arc::new(store),
            Arc::new(runtime),
            sender,
        ))
    }

    /// Assemble state from already constructed services
    pub fn with_services(
        config: WebConfig,
        settings: DeepmailConfig,
        store: Arc<dyn ConversationStore>,
        runtime: Arc<dyn AgentRuntime>,
        email_sender: Arc<dyn EmailSender>,
    ) -> Self {
        let auto_reply = AutoReplyService::new(
            store.clone(),
            runtime.clone(),
            email_sender.clone(),
            settings.email.from_address.clone(),
        );
        let research = ResearchManager::new(
            runtime,
            email_sender,
            settings.research.clone(),
            settings.email.clone(),
        );

        Self {
            config,
            store,
            auto_reply: Arc::new(auto_reply),
            research,
        }
    }
}
