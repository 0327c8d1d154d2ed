use axum::{extract::Extension, response::IntoResponse, Json};
use sqlx::PgPool;
use tracing::instrument;

use crate::error::ApiError;
use crate::store::confessions;

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Total, unread, and today counters", body = confessions::Stats),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "admin"
)]
#[instrument(skip(pool))]
pub async fn stats(Extension(pool): Extension<PgPool>) -> Result<impl IntoResponse, ApiError> {
    let stats = confessions::stats(&pool).await?;
    Ok(Json(stats))
}
