//! CRUD over confession records.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::Instrument;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Confession {
    pub id: Uuid,
    pub content: String,
    pub category: String,
    pub is_read: bool,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub ip_address: String,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewConfession {
    pub content: String,
    pub category: String,
    pub ip_address: String,
    pub user_agent: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Stats {
    pub total: i64,
    pub unread: i64,
    pub today: i64,
}

fn from_row(row: &PgRow) -> Confession {
    Confession {
        id: row.get("id"),
        content: row.get("content"),
        category: row.get("category"),
        is_read: row.get("is_read"),
        is_archived: row.get("is_archived"),
        archived_at: row.get("archived_at"),
        ip_address: row.get("ip_address"),
        user_agent: row.get("user_agent"),
        created_at: row.get("created_at"),
    }
}

fn query_span(operation: &str, statement: &str) -> tracing::Span {
    tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = operation,
        db.statement = statement
    )
}

/// Persist an accepted confession, returning its id.
pub async fn insert(pool: &PgPool, new: &NewConfession) -> Result<Uuid> {
    let query = r"
        INSERT INTO confessions (id, content, category, ip_address, user_agent)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
    ";
    let row = sqlx::query(query)
        .bind(Uuid::new_v4())
        .bind(&new.content)
        .bind(&new.category)
        .bind(&new.ip_address)
        .bind(&new.user_agent)
        .fetch_one(pool)
        .instrument(query_span("INSERT", query))
        .await
        .context("failed to insert confession")?;

    Ok(row.get("id"))
}

/// All confessions, newest first.
pub async fn list(pool: &PgPool) -> Result<Vec<Confession>> {
    let query = "SELECT * FROM confessions ORDER BY created_at DESC";
    let rows = sqlx::query(query)
        .fetch_all(pool)
        .instrument(query_span("SELECT", query))
        .await
        .context("failed to list confessions")?;

    Ok(rows.iter().map(from_row).collect())
}

/// Flip the read flag. `None` when no record has that id.
pub async fn set_read(pool: &PgPool, id: Uuid, is_read: bool) -> Result<Option<Confession>> {
    let query = "UPDATE confessions SET is_read = $2 WHERE id = $1 RETURNING *";
    let row = sqlx::query(query)
        .bind(id)
        .bind(is_read)
        .fetch_optional(pool)
        .instrument(query_span("UPDATE", query))
        .await
        .context("failed to update confession read flag")?;

    Ok(row.as_ref().map(from_row))
}

/// Archive or unarchive, stamping or clearing `archived_at` accordingly.
pub async fn set_archived(
    pool: &PgPool,
    id: Uuid,
    is_archived: bool,
) -> Result<Option<Confession>> {
    let query = r"
        UPDATE confessions
        SET is_archived = $2,
            archived_at = CASE WHEN $2 THEN NOW() ELSE NULL END
        WHERE id = $1
        RETURNING *
    ";
    let row = sqlx::query(query)
        .bind(id)
        .bind(is_archived)
        .fetch_optional(pool)
        .instrument(query_span("UPDATE", query))
        .await
        .context("failed to update confession archive flag")?;

    Ok(row.as_ref().map(from_row))
}

/// Delete one record; `false` when no record had that id.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
    let query = "DELETE FROM confessions WHERE id = $1";
    let result = sqlx::query(query)
        .bind(id)
        .execute(pool)
        .instrument(query_span("DELETE", query))
        .await
        .context("failed to delete confession")?;

    Ok(result.rows_affected() > 0)
}

/// Delete every confession submitted from `ip`, returning the count removed.
pub async fn delete_by_ip(pool: &PgPool, ip: &str) -> Result<u64> {
    let query = "DELETE FROM confessions WHERE ip_address = $1";
    let result = sqlx::query(query)
        .bind(ip)
        .execute(pool)
        .instrument(query_span("DELETE", query))
        .await
        .context("failed to delete confessions by ip")?;

    Ok(result.rows_affected())
}

/// Start of the trailing window ending at `now`. Rows with
/// `created_at >= window_start` are inside the window.
fn window_start(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    now - window
}

/// Count confessions from `ip` whose creation time falls inside the trailing
/// window. Drives the sliding-window rate limit.
pub async fn count_recent(pool: &PgPool, ip: &str, window: Duration) -> Result<i64> {
    count_recent_at(pool, ip, window, Utc::now()).await
}

async fn count_recent_at(
    pool: &PgPool,
    ip: &str,
    window: Duration,
    now: DateTime<Utc>,
) -> Result<i64> {
    let cutoff = window_start(now, window);
    let query = r"
        SELECT COUNT(*) AS recent
        FROM confessions
        WHERE ip_address = $1 AND created_at >= $2
    ";
    let row = sqlx::query(query)
        .bind(ip)
        .bind(cutoff)
        .fetch_one(pool)
        .instrument(query_span("SELECT", query))
        .await
        .context("failed to count recent confessions")?;

    Ok(row.get("recent"))
}

/// Dashboard counters: total, unread, and submitted since midnight UTC.
pub async fn stats(pool: &PgPool) -> Result<Stats> {
    let query = r"
        SELECT
            COUNT(*) AS total,
            COUNT(*) FILTER (WHERE NOT is_read) AS unread,
            COUNT(*) FILTER (WHERE created_at >= DATE_TRUNC('day', NOW())) AS today
        FROM confessions
    ";
    let row = sqlx::query(query)
        .fetch_one(pool)
        .instrument(query_span("SELECT", query))
        .await
        .context("failed to load confession stats")?;

    Ok(Stats {
        total: row.get("total"),
        unread: row.get("unread"),
        today: row.get("today"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn window_cutoff_is_exactly_one_window_back() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(
            window_start(now, Duration::hours(1)),
            Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap()
        );
    }

    // Mirrors the `created_at >= cutoff` comparison the count query runs.
    #[test]
    fn row_ages_out_once_the_window_passes() {
        let window = Duration::hours(1);
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        // Half an hour later the row still counts.
        let now = created_at + Duration::minutes(30);
        assert!(created_at >= window_start(now, window));

        // At exactly one hour it sits on the boundary and still counts.
        let now = created_at + window;
        assert!(created_at >= window_start(now, window));

        // One second past the window it falls out.
        let now = created_at + window + Duration::seconds(1);
        assert!(created_at < window_start(now, window));
    }
}
