//! History database schema.

use anyhow::Result;
use sqlx::SqlitePool;

/// Create the history table and its index if missing.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS email_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            original_text TEXT NOT NULL,
            rewritten_text TEXT NOT NULL,
            tone TEXT NOT NULL,
            timestamp TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_history_timestamp ON email_history(timestamp DESC);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
