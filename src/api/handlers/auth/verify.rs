use axum::{
    extract::Extension, http::HeaderMap, response::IntoResponse, Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::instrument;

use super::extract_admin_token;
use crate::auth::{AuthState, TokenError};
use crate::error::ApiError;

#[utoipa::path(
    get,
    path = "/api/admin/auth/verify",
    responses(
        (status = 200, description = "Token is valid, returns the identity"),
        (status = 401, description = "Token missing, invalid, or expired"),
        (status = 403, description = "Token valid but not an admin"),
    ),
    tag = "auth"
)]
#[instrument(skip(auth, headers))]
pub async fn verify(
    Extension(auth): Extension<Arc<AuthState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = extract_admin_token(&headers).ok_or(TokenError::Missing)?;

    let claims = auth.authority().verify(&token)?;

    Ok(Json(json!({
        "success": true,
        "user": {
            "username": claims.sub,
            "role": claims.role,
        }
    })))
}
