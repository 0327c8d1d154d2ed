use anyhow::{Context, Result};
use sqlx::PgPool;

/// Create the tables on startup when they do not exist yet. Idempotent, so
/// restarting against an initialized database is a no-op.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS confessions (
            id          UUID PRIMARY KEY,
            content     TEXT NOT NULL,
            category    TEXT NOT NULL DEFAULT 'other',
            is_read     BOOLEAN NOT NULL DEFAULT FALSE,
            is_archived BOOLEAN NOT NULL DEFAULT FALSE,
            archived_at TIMESTAMPTZ,
            ip_address  TEXT NOT NULL,
            user_agent  TEXT NOT NULL,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        ",
    )
    .execute(pool)
    .await
    .context("failed to create confessions table")?;

    // The rate-limit count scans this pair on every public write.
    sqlx::query(
        r"
        CREATE INDEX IF NOT EXISTS confessions_ip_created_idx
            ON confessions (ip_address, created_at)
        ",
    )
    .execute(pool)
    .await
    .context("failed to create confessions index")?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS banned_ips (
            ip        TEXT PRIMARY KEY,
            banned_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        ",
    )
    .execute(pool)
    .await
    .context("failed to create banned_ips table")?;

    Ok(())
}
