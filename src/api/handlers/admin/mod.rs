//! Admin surface: every route here is registered through [`routes`], which
//! applies the token gate once. There is no other way to add an admin route,
//! so an ungated one cannot be expressed.

use axum::{
    extract::{Extension, Request},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::auth::{AuthState, TokenError};
use crate::error::ApiError;

use super::auth::extract_admin_token;

pub mod bans;
pub mod confessions;
pub mod stats;

/// Verified admin identity, attached to the request for the wrapped handler.
#[derive(Clone, Debug)]
pub struct AdminUser {
    pub username: String,
    pub role: String,
}

/// The guarded admin router.
pub fn routes() -> Router {
    Router::new()
        .route("/api/admin/confessions", get(confessions::list))
        .route(
            "/api/admin/confessions/by-ip",
            delete(bans::delete_by_ip),
        )
        .route(
            "/api/admin/confessions/:id",
            patch(confessions::mark_read).delete(confessions::remove),
        )
        .route(
            "/api/admin/confessions/:id/archive",
            patch(confessions::archive),
        )
        .route("/api/admin/ban", post(bans::ban))
        .route("/api/admin/stats", get(stats::stats))
        .layer(middleware::from_fn(require_admin))
}

/// Token gate in front of every admin handler: 401 for a missing, invalid,
/// or expired token, 403 for a valid token without the admin role.
pub async fn require_admin(
    Extension(auth): Extension<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_admin_token(request.headers()) else {
        return ApiError::from(TokenError::Missing).into_response();
    };

    match auth.authority().verify(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(AdminUser {
                username: claims.sub,
                role: claims.role,
            });
            next.run(request).await
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}
