//! Moderation CRUD over stored confessions.

use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::store::confessions;

#[derive(ToSchema, Deserialize, Debug)]
pub struct ReadPatch {
    #[serde(rename = "isRead")]
    is_read: bool,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct ArchivePatch {
    #[serde(rename = "isArchived")]
    is_archived: bool,
}

#[utoipa::path(
    get,
    path = "/api/admin/confessions",
    responses(
        (status = 200, description = "All confessions, newest first", body = [confessions::Confession]),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "admin"
)]
#[instrument(skip(pool))]
pub async fn list(Extension(pool): Extension<PgPool>) -> Result<impl IntoResponse, ApiError> {
    let confessions = confessions::list(&pool).await?;
    Ok(Json(confessions))
}

#[utoipa::path(
    patch,
    path = "/api/admin/confessions/{id}",
    params(("id" = Uuid, Path, description = "Confession id")),
    request_body = ReadPatch,
    responses(
        (status = 200, description = "Updated confession", body = confessions::Confession),
        (status = 404, description = "No confession with that id"),
    ),
    tag = "admin"
)]
#[instrument(skip(pool, payload))]
pub async fn mark_read(
    Extension(pool): Extension<PgPool>,
    Path(id): Path<Uuid>,
    payload: Option<Json<ReadPatch>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(patch)) = payload else {
        return Err(ApiError::Validation("isRead is required".to_string()));
    };

    let updated = confessions::set_read(&pool, id, patch.is_read)
        .await?
        .ok_or_else(|| ApiError::NotFound("Confession not found".to_string()))?;

    Ok(Json(updated))
}

#[utoipa::path(
    patch,
    path = "/api/admin/confessions/{id}/archive",
    params(("id" = Uuid, Path, description = "Confession id")),
    request_body = ArchivePatch,
    responses(
        (status = 200, description = "Archive flag updated", body = confessions::Confession),
        (status = 404, description = "No confession with that id"),
    ),
    tag = "admin"
)]
#[instrument(skip(pool, payload))]
pub async fn archive(
    Extension(pool): Extension<PgPool>,
    Path(id): Path<Uuid>,
    payload: Option<Json<ArchivePatch>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(patch)) = payload else {
        return Err(ApiError::Validation("isArchived is required".to_string()));
    };

    let updated = confessions::set_archived(&pool, id, patch.is_archived)
        .await?
        .ok_or_else(|| ApiError::NotFound("Confession not found".to_string()))?;

    let message = if patch.is_archived {
        "Confession archived successfully"
    } else {
        "Confession unarchived successfully"
    };

    Ok(Json(json!({
        "success": true,
        "confession": updated,
        "message": message,
    })))
}

#[utoipa::path(
    delete,
    path = "/api/admin/confessions/{id}",
    params(("id" = Uuid, Path, description = "Confession id")),
    responses(
        (status = 200, description = "Confession deleted"),
        (status = 404, description = "No confession with that id"),
    ),
    tag = "admin"
)]
#[instrument(skip(pool))]
pub async fn remove(
    Extension(pool): Extension<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !confessions::delete(&pool, id).await? {
        return Err(ApiError::NotFound("Confession not found".to_string()));
    }

    info!(%id, "Confession deleted");

    Ok(Json(json!({ "success": true })))
}
