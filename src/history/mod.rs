//! SQLite store of generated emails.
//!
//! Records are append-only: they are inserted after a successful generation
//! and removed individually or all at once, never updated.

mod schema;

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Connection pool size. Every operation is a single statement.
const POOL_SIZE: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub original_text: String,
    pub rewritten_text: String,
    pub tone: String,
    pub timestamp: String,
}

impl HistoryRecord {
    fn from_row(row: &SqliteRow) -> Self {
        Self {
            id: row.get("id"),
            original_text: row.get("original_text"),
            rewritten_text: row.get("rewritten_text"),
            tone: row.get("tone"),
            timestamp: row.get("timestamp"),
        }
    }
}

#[derive(Clone)]
pub struct HistoryStore {
    pool: SqlitePool,
}

impl HistoryStore {
    /// Open (or create) the history database at the given path
    pub async fn open(path: &Path) -> Result<Self> {
        let db_url = format!("sqlite:{}?mode=rwc", path.display());

        let options = SqliteConnectOptions::from_str(&db_url)?
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(POOL_SIZE)
            .connect_with(options)
            .await
            .context("Failed to create history connection pool")?;

        schema::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("Failed to create in-memory connection pool")?;

        schema::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    /// Append a record and return its id
    pub async fn insert(
        &self,
        original_text: &str,
        rewritten_text: &str,
        tone: &str,
        timestamp: &str,
    ) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO email_history (original_text, rewritten_text, tone, timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(original_text)
        .bind(rewritten_text)
        .bind(tone)
        .bind(timestamp)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Most recent records first
    pub async fn recent(&self, limit: u32) -> Result<Vec<HistoryRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, original_text, rewritten_text, tone, timestamp
            FROM email_history
            ORDER BY timestamp DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(HistoryRecord::from_row).collect())
    }

    #[cfg(test)]
    pub async fn get(&self, id: i64) -> Result<Option<HistoryRecord>> {
        let row = sqlx::query(
            "SELECT id, original_text, rewritten_text, tone, timestamp FROM email_history WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(HistoryRecord::from_row))
    }

    /// Delete one record. Returns whether a row existed; a missing id is not an error.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM email_history WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every record, returning how many were removed
    pub async fn clear(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM email_history")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM email_history")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
