//! SQLite conversation store

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use deepmail_core::{
    storage_error, Conversation, ConversationStore, ConversationSummary, DeepmailResult, Direction,
    Message, NewConversation, NewMessage,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Row, SqlitePool,
};
use std::str::FromStr;
use tracing::{debug, info};

const COMPONENT: &str = "conversation_store";

/// Parse a stored timestamp: RFC3339, or SQLite's `CURRENT_TIMESTAMP` form (UTC)
pub fn parse_stored_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// [`ConversationStore`] on a SQLite database with `conversations` and
/// `messages` tables
#[derive(Clone)]
pub struct SqliteConversationStore {
    pool: SqlitePool,
}

impl SqliteConversationStore {
    /// Open (creating if needed) the database at `database_url` and make sure
    /// the schema exists
    pub async fn connect(database_url: &str) -> DeepmailResult<Self> {
        info!("Connecting to conversation database: {}", database_url);

        let pool = if database_url.contains(":memory:") {
            // Every new connection to :memory: is a separate database
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect(database_url)
                .await
        } else {
            let options = SqliteConnectOptions::from_str(database_url)
                .map_err(|e| storage_error!(format!("Invalid database URL: {}", e), COMPONENT, e))?
                .create_if_missing(true);
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await
        }
        .map_err(|e| {
            storage_error!(format!("Failed to connect to database: {}", e), COMPONENT, e)
        })?;

        let store = Self { pool };
        store.create_tables().await?;
        info!("Conversation database ready");
        Ok(store)
    }

    async fn create_tables(&self) -> DeepmailResult<()> {
        debug!("Creating conversations table...");
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS conversations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                thread_id TEXT UNIQUE NOT NULL,
                prospect_email TEXT NOT NULL,
                prospect_name TEXT,
                subject TEXT,
                status TEXT DEFAULT 'active',
                created_at TEXT,
                updated_at TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            storage_error!(format!("Failed to create conversations table: {}", e), COMPONENT, e)
        })?;

        debug!("Creating messages table...");
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                thread_id TEXT NOT NULL,
                direction TEXT NOT NULL,
                sender TEXT NOT NULL,
                recipient TEXT NOT NULL,
                subject TEXT,
                body TEXT NOT NULL,
                created_at TEXT,
                FOREIGN KEY (thread_id) REFERENCES conversations(thread_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            storage_error!(format!("Failed to create messages table: {}", e), COMPONENT, e)
        })?;

        Ok(())
    }

    fn now() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn parse_timestamp(row: &SqliteRow, column: &str) -> DateTime<Utc> {
        row.try_get::<Option<String>, _>(column)
            .ok()
            .flatten()
            .and_then(|s| parse_stored_timestamp(&s))
            .unwrap_or_else(Utc::now)
    }

    fn conversation_from_row(row: &SqliteRow) -> DeepmailResult<Conversation> {
        Ok(Conversation {
            thread_id: row.try_get("thread_id").map_err(Self::decode_error)?,
            prospect_email: row.try_get("prospect_email").map_err(Self::decode_error)?,
            prospect_name: row.try_get("prospect_name").unwrap_or(None),
            subject: row.try_get("subject").unwrap_or(None),
            status: row
                .try_get::<Option<String>, _>("status")
                .unwrap_or(None)
                .unwrap_or_else(|| "active".to_string()),
            created_at: Self::parse_timestamp(row, "created_at"),
            updated_at: Self::parse_timestamp(row, "updated_at"),
        })
    }

    fn decode_error(e: sqlx::Error) -> deepmail_core::DeepmailError {
        storage_error!(format!("Failed to decode row: {}", e), COMPONENT, e)
    }
}

#[async_trait]
impl ConversationStore for SqliteConversationStore {
    async fn get_or_create_conversation(
        &self,
        conversation: &NewConversation,
    ) -> DeepmailResult<Conversation> {
        let now = Self::now();

        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO conversations (thread_id, prospect_email, prospect_name, subject, status, created_at, updated_at) VALUES (?, ?, ?, ?, 'active', ?, ?)",
        )
        .bind(&conversation.thread_id)
        .bind(&conversation.prospect_email)
        .bind(&conversation.prospect_name)
        .bind(&conversation.subject)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error!(format!("Failed to create conversation: {}", e), COMPONENT, e))?
        .rows_affected();

        if inserted > 0 {
            info!(thread_id = %conversation.thread_id, "Created new conversation thread");
        } else {
            sqlx::query("UPDATE conversations SET updated_at = ? WHERE thread_id = ?")
                .bind(&now)
                .bind(&conversation.thread_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    storage_error!(format!("Failed to touch conversation: {}", e), COMPONENT, e)
                })?;
            info!(thread_id = %conversation.thread_id, "Found existing conversation thread");
        }

        self.get_conversation(&conversation.thread_id)
            .await?
            .ok_or_else(|| {
                storage_error!(
                    format!("Conversation {} vanished after upsert", conversation.thread_id),
                    COMPONENT
                )
            })
    }

    async fn save_message(&self, message: &NewMessage) -> DeepmailResult<()> {
        sqlx::query(
            "INSERT INTO messages (thread_id, direction, sender, recipient, subject, body, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&message.thread_id)
        .bind(message.direction.as_str())
        .bind(&message.sender)
        .bind(&message.recipient)
        .bind(&message.subject)
        .bind(&message.body)
        .bind(Self::now())
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error!(format!("Failed to save message: {}", e), COMPONENT, e))?;

        debug!(thread_id = %message.thread_id, direction = %message.direction, "Saved message");
        Ok(())
    }

    async fn conversation_history(&self, thread_id: &str) -> DeepmailResult<Vec<Message>> {
        let rows = sqlx::query(
            "SELECT thread_id, direction, sender, recipient, subject, body, created_at FROM messages WHERE thread_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(thread_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error!(format!("Failed to load history: {}", e), COMPONENT, e))?;

        rows.iter()
            .map(|row| -> DeepmailResult<Message> {
                let direction: String = row.try_get("direction").map_err(Self::decode_error)?;
                Ok(Message {
                    thread_id: row.try_get("thread_id").map_err(Self::decode_error)?,
                    direction: direction.parse::<Direction>().map_err(|e| {
                        storage_error!(format!("Corrupt message row: {}", e), COMPONENT)
                    })?,
                    sender: row.try_get("sender").map_err(Self::decode_error)?,
                    recipient: row.try_get("recipient").map_err(Self::decode_error)?,
                    subject: row.try_get("subject").unwrap_or(None),
                    body: row.try_get("body").map_err(Self::decode_error)?,
                    timestamp: Self::parse_timestamp(row, "created_at"),
                })
            })
            .collect()
    }

    async fn list_conversations(&self) -> DeepmailResult<Vec<ConversationSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT c.thread_id, c.prospect_email, c.prospect_name, c.subject,
                   c.status, c.created_at, COUNT(m.id) AS message_count
            FROM conversations c
            LEFT JOIN messages m ON c.thread_id = m.thread_id
            GROUP BY c.thread_id
            ORDER BY c.updated_at DESC, c.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            storage_error!(format!("Failed to list conversations: {}", e), COMPONENT, e)
        })?;

        rows.iter()
            .map(|row| -> DeepmailResult<ConversationSummary> {
                Ok(ConversationSummary {
                    thread_id: row.try_get("thread_id").map_err(Self::decode_error)?,
                    prospect_email: row.try_get("prospect_email").map_err(Self::decode_error)?,
                    prospect_name: row.try_get("prospect_name").unwrap_or(None),
                    subject: row.try_get("subject").unwrap_or(None),
                    status: row
                        .try_get::<Option<String>, _>("status")
                        .unwrap_or(None)
                        .unwrap_or_else(|| "active".to_string()),
                    created_at: Self::parse_timestamp(row, "created_at"),
                    message_count: row.try_get("message_count").map_err(Self::decode_error)?,
                })
            })
            .collect()
    }

    async fn get_conversation(&self, thread_id: &str) -> DeepmailResult<Option<Conversation>> {
        let row = sqlx::query(
            "SELECT thread_id, prospect_email, prospect_name, subject, status, created_at, updated_at FROM conversations WHERE thread_id = ?",
        )
        .bind(thread_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error!(format!("Failed to load conversation: {}", e), COMPONENT, e))?;

        row.as_ref().map(Self::conversation_from_row).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stored_timestamp_formats() {
        let rfc = parse_stored_timestamp("2024-03-01T09:30:00.123456Z").unwrap();
        assert_eq!(rfc.to_rfc3339_opts(SecondsFormat::Secs, true), "2024-03-01T09:30:00Z");

        let legacy = parse_stored_timestamp("2024-03-01 09:30:00").unwrap();
        assert_eq!(
            legacy.to_rfc3339_opts(SecondsFormat::Secs, true),
            "2024-03-01T09:30:00Z"
        );

        assert!(parse_stored_timestamp("yesterday").is_none());
    }

    #[tokio::test]
    async fn test_rows_with_sqlite_default_timestamps() {
        let store = SqliteConversationStore::connect("sqlite::memory:").await.unwrap();
        sqlx::query(
            "INSERT INTO conversations (thread_id, prospect_email, created_at, updated_at) \
             VALUES ('legacy', 'old@acme.test', '2023-11-05 14:00:00', '2023-11-05 14:00:00')",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let conversation = store.get_conversation("legacy").await.unwrap().unwrap();
        assert_eq!(
            conversation.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            "2023-11-05T14:00:00Z"
        );
    }

    fn new_conversation(thread_id: &str) -> NewConversation {
        NewConversation {
            thread_id: thread_id.to_string(),
            prospect_email: "jane@acme.test".to_string(),
            prospect_name: Some("Jane".to_string()),
            subject: Some("SOC2 Compliance".to_string()),
        }
    }

    fn message(thread_id: &str, direction: Direction, body: &str) -> NewMessage {
        NewMessage {
            thread_id: thread_id.to_string(),
            direction,
            sender: "jane@acme.test".to_string(),
            recipient: "sdr@complai.test".to_string(),
            subject: Some("SOC2 Compliance".to_string()),
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let store = SqliteConversationStore::connect("sqlite::memory:").await.unwrap();

        let first = store
            .get_or_create_conversation(&new_conversation("abc123def456"))
            .await
            .unwrap();
        let second = store
            .get_or_create_conversation(&new_conversation("abc123def456"))
            .await
            .unwrap();

        assert_eq!(first.thread_id, second.thread_id);
        assert_eq!(first.created_at, second.created_at);
        assert!(second.updated_at >= first.updated_at);
        assert_eq!(second.status, "active");
        assert_eq!(store.list_conversations().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_history_in_arrival_order() {
        let store = SqliteConversationStore::connect("sqlite::memory:").await.unwrap();
        store
            .get_or_create_conversation(&new_conversation("t1"))
            .await
            .unwrap();

        for (i, direction) in [Direction::Inbound, Direction::Outbound, Direction::Inbound]
            .into_iter()
            .enumerate()
        {
            store
                .save_message(&message("t1", direction, &format!("message {}", i)))
                .await
                .unwrap();
        }

        let history = store.conversation_history("t1").await.unwrap();
        let bodies: Vec<_> = history.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["message 0", "message 1", "message 2"]);
        assert_eq!(history[1].direction, Direction::Outbound);
    }

    #[tokio::test]
    async fn test_unknown_thread() {
        let store = SqliteConversationStore::connect("sqlite::memory:").await.unwrap();
        assert!(store.conversation_history("missing").await.unwrap().is_empty());
        assert!(store.get_conversation("missing").await.unwrap().is_none());
    }
}
