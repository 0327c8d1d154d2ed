//! The public submission endpoint.

use axum::{
    extract::Extension,
    http::{header::USER_AGENT, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::admission;
use crate::error::ApiError;
use crate::store::{confessions, NewConfession};

#[derive(ToSchema, Deserialize, Debug)]
pub struct ConfessionRequest {
    content: String,
    category: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/confessions",
    request_body = ConfessionRequest,
    responses(
        (status = 201, description = "Confession accepted, returns its id"),
        (status = 400, description = "Missing, empty, or oversized content"),
        (status = 403, description = "Submitter IP is banned"),
        (status = 429, description = "Rate limit exceeded for this IP"),
    ),
    tag = "confessions"
)]
#[instrument(skip(pool, headers, payload))]
pub async fn create(
    Extension(pool): Extension<PgPool>,
    headers: HeaderMap,
    payload: Option<Json<ConfessionRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation(
            "Confession content is required".to_string(),
        ));
    };

    let content = admission::validate_content(&request.content)?;
    let category = admission::validate_category(request.category.as_deref())?;

    let ip = admission::submitter_ip(&headers);
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    admission::admit(&pool, &ip).await?;

    let id = confessions::insert(
        &pool,
        &NewConfession {
            content: content.to_string(),
            category: category.to_string(),
            ip_address: ip,
            user_agent,
        },
    )
    .await?;

    debug!(%id, "Confession accepted");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "id": id })),
    ))
}
