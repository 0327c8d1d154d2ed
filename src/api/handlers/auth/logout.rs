use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::instrument;

use super::clear_session_cookie;
use crate::auth::AuthState;

#[utoipa::path(
    post,
    path = "/api/admin/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared"),
    ),
    tag = "auth"
)]
#[instrument(skip(auth))]
pub async fn logout(Extension(auth): Extension<Arc<AuthState>>) -> impl IntoResponse {
    // Always clear the cookie; there is no server-side state to drop and the
    // token itself remains valid until expiry.
    let mut headers = HeaderMap::new();
    if let Ok(cookie) = clear_session_cookie(auth.config()) {
        headers.insert(SET_COOKIE, cookie);
    }

    (
        StatusCode::OK,
        headers,
        Json(json!({ "success": true, "message": "Logged out successfully" })),
    )
}
