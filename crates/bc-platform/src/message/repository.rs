//! Message Repository
//!
//! SQLite-backed storage for the append-only `messages` table.
//! Timestamps are stored as epoch milliseconds; the recipients list
//! is stored as a JSON-serialized array.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::message::entity::Message;
use crate::shared::error::{AppError, Result};

pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the messages table and its ordering index.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                body TEXT NOT NULL,
                code TEXT NOT NULL,
                recipients TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_messages_created_at ON messages(created_at);
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Initialized messages schema");
        Ok(())
    }

    /// Persist a validated message, stamping id and timestamps.
    ///
    /// Create sets both `created_at` and `updated_at` to the same
    /// instant; nothing ever updates a message afterwards.
    pub async fn insert(&self, body: &str, code: &str, recipients: &[String]) -> Result<Message> {
        let now = Utc::now();
        let now_ms = now.timestamp_millis();
        let recipients_json = serde_json::to_string(recipients)?;

        let result = sqlx::query(
            "INSERT INTO messages (body, code, recipients, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(body)
        .bind(code)
        .bind(&recipients_json)
        .bind(now_ms)
        .bind(now_ms)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "Persisted message");

        Ok(Message {
            id,
            body: body.to_string(),
            code: code.to_string(),
            recipients: recipients.to_vec(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Load every message, most recent first. No pagination: the
    /// whole table is rendered on the list view.
    pub async fn list_recent(&self) -> Result<Vec<Message>> {
        let rows = sqlx::query(
            "SELECT id, body, code, recipients, created_at, updated_at \
             FROM messages ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            messages.push(Self::parse_row(row)?);
        }
        Ok(messages)
    }

    /// Count all messages
    pub async fn count_all(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM messages")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    /// Parse a row into a Message
    fn parse_row(row: &sqlx::sqlite::SqliteRow) -> Result<Message> {
        let created_at_ms: i64 = row.get("created_at");
        let created_at = DateTime::from_timestamp_millis(created_at_ms).ok_or_else(|| {
            AppError::configuration(format!("invalid created_at timestamp: {created_at_ms}"))
        })?;

        let updated_at_ms: i64 = row.get("updated_at");
        let updated_at = DateTime::from_timestamp_millis(updated_at_ms).ok_or_else(|| {
            AppError::configuration(format!("invalid updated_at timestamp: {updated_at_ms}"))
        })?;

        let recipients: Vec<String> = serde_json::from_str(row.get("recipients"))?;

        Ok(Message {
            id: row.get("id"),
            body: row.get("body"),
            code: row.get("code"),
            recipients,
            created_at,
            updated_at,
        })
    }
}
