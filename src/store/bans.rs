//! The ban registry: a persistent set of banned submitter IPs.
//!
//! Bans are permanent; no unban operation exists. Banning never cascades on
//! its own — deleting a banned IP's confessions is a separate, explicit step
//! orchestrated by the caller so partial failure stays visible.

use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use tracing::Instrument;

use super::is_unique_violation;

/// Insert outcome; a duplicate is reported, never silently overwritten.
#[derive(Debug, PartialEq, Eq)]
pub enum BanOutcome {
    Banned,
    AlreadyBanned,
}

fn query_span(operation: &str, statement: &str) -> tracing::Span {
    tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = operation,
        db.statement = statement
    )
}

/// Add `ip` to the registry.
pub async fn ban(pool: &PgPool, ip: &str) -> Result<BanOutcome> {
    let query = "INSERT INTO banned_ips (ip) VALUES ($1)";
    let result = sqlx::query(query)
        .bind(ip)
        .execute(pool)
        .instrument(query_span("INSERT", query))
        .await;

    match result {
        Ok(_) => Ok(BanOutcome::Banned),
        Err(err) if is_unique_violation(&err) => Ok(BanOutcome::AlreadyBanned),
        Err(err) => Err(err).context("failed to insert ban entry"),
    }
}

/// Existence check used by the admission controller on every public write.
pub async fn is_banned(pool: &PgPool, ip: &str) -> Result<bool> {
    let query = "SELECT EXISTS(SELECT 1 FROM banned_ips WHERE ip = $1) AS banned";
    let row = sqlx::query(query)
        .bind(ip)
        .fetch_one(pool)
        .instrument(query_span("SELECT", query))
        .await
        .context("failed to check ban registry")?;

    Ok(row.get("banned"))
}
