use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

/// Create the schema in the configured database. Safe to run repeatedly.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    apply(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Create the `contacts` table and its unique indexes on an open pool.
pub async fn apply(pool: &SqlitePool) -> Result<()> {
    // AUTOINCREMENT keeps ids from being reused after the highest row is deleted
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contacts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Tables created by older deployments lack the column constraints
    sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_contacts_email ON contacts(email)")
        .execute(pool)
        .await
        .context(
            "Failed to add unique index on contacts.email: the table holds duplicate emails, remove them and restart",
        )?;
    sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_contacts_phone ON contacts(phone)")
        .execute(pool)
        .await
        .context(
            "Failed to add unique index on contacts.phone: the table holds duplicate phones, remove them and restart",
        )?;

    Ok(())
}
