//! Ban a submitter IP and, separately, purge its confessions.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use tracing::{error, info, instrument};
use utoipa::ToSchema;

use super::AdminUser;
use crate::error::ApiError;
use crate::store::{bans, confessions, BanOutcome};

#[derive(ToSchema, Deserialize, Debug)]
pub struct BanRequest {
    ip: String,
    /// Also delete the IP's existing confessions after the ban holds.
    #[serde(default)]
    purge: bool,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct IpRequest {
    ip: String,
}

#[utoipa::path(
    post,
    path = "/api/admin/ban",
    request_body = BanRequest,
    responses(
        (status = 200, description = "IP banned"),
        (status = 400, description = "Missing IP"),
        (status = 409, description = "IP is already banned"),
    ),
    tag = "admin"
)]
#[instrument(skip(pool, payload))]
pub async fn ban(
    Extension(pool): Extension<PgPool>,
    Extension(admin): Extension<AdminUser>,
    payload: Option<Json<BanRequest>>,
) -> Result<Response, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("IP address is required".to_string()));
    };

    let ip = request.ip.trim();
    if ip.is_empty() {
        return Err(ApiError::Validation("IP address is required".to_string()));
    }

    match bans::ban(&pool, ip).await? {
        BanOutcome::AlreadyBanned => {
            return Err(ApiError::Conflict("IP is already banned".to_string()));
        }
        BanOutcome::Banned => info!(ip, admin = %admin.username, "IP banned"),
    }

    if !request.purge {
        return Ok(Json(json!({
            "success": true,
            "message": format!("IP {ip} has been banned"),
        }))
        .into_response());
    }

    // Cascade step, only after the ban holds. A failure here leaves the ban
    // in place, and the response has to say so instead of claiming success.
    match confessions::delete_by_ip(&pool, ip).await {
        Ok(deleted) => Ok(Json(json!({
            "success": true,
            "message": format!("IP {ip} has been banned"),
            "deletedCount": deleted,
        }))
        .into_response()),
        Err(err) => {
            error!("Ban cascade delete failed: {err:#}");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!(
                        "IP {ip} has been banned, but deleting its confessions failed"
                    ),
                    "banned": true,
                })),
            )
                .into_response())
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/admin/confessions/by-ip",
    request_body = IpRequest,
    responses(
        (status = 200, description = "Confessions from the IP deleted, returns the count"),
        (status = 400, description = "Missing IP"),
    ),
    tag = "admin"
)]
#[instrument(skip(pool, payload))]
pub async fn delete_by_ip(
    Extension(pool): Extension<PgPool>,
    Extension(admin): Extension<AdminUser>,
    payload: Option<Json<IpRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("IP is required".to_string()));
    };

    let ip = request.ip.trim();
    if ip.is_empty() {
        return Err(ApiError::Validation("IP is required".to_string()));
    }

    let deleted = confessions::delete_by_ip(&pool, ip).await?;

    info!(ip, deleted, admin = %admin.username, "Confessions deleted by IP");

    Ok(Json(json!({ "success": true, "deletedCount": deleted })))
}
