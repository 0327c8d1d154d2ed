use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use super::session_cookie;
use crate::auth::AuthState;
use crate::error::ApiError;

#[derive(ToSchema, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[utoipa::path(
    post,
    path = "/api/admin/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted, session cookie set"),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "auth"
)]
#[instrument(skip(auth, payload))]
pub async fn login(
    Extension(auth): Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    // Missing fields are a client error, checked before any comparison.
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation(
            "Username and password are required".to_string(),
        ));
    };

    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    if !auth.identity().verify(&request.username, &request.password) {
        warn!("Rejected admin login attempt");
        return Err(ApiError::Authentication("Invalid credentials".to_string()));
    }

    let token = auth
        .authority()
        .issue(auth.identity().username())
        .map_err(|err| ApiError::Upstream(anyhow::Error::new(err)))?;

    let cookie = session_cookie(auth.config(), &token)
        .map_err(|err| ApiError::Upstream(anyhow::Error::new(err)))?;

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);

    info!("Admin login successful");

    Ok((
        StatusCode::OK,
        headers,
        Json(json!({ "success": true, "message": "Login successful" })),
    ))
}
