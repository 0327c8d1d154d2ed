use axum::{
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Json},
};
use serde_json::json;
use tracing::debug;

use crate::GIT_COMMIT_HASH;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service name, version and build")
    ),
    tag = "health"
)]
// axum handler for health
pub async fn health() -> impl IntoResponse {
    let body = Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "build": GIT_COMMIT_HASH,
    }));

    let short_hash = if GIT_COMMIT_HASH.len() > 7 {
        &GIT_COMMIT_HASH[0..7]
    } else {
        ""
    };

    let headers = format!(
        "{}:{}:{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_hash
    )
    .parse::<HeaderValue>()
    .map(|x_app_header_value| {
        let mut headers = HeaderMap::new();
        headers.insert("X-App", x_app_header_value);
        headers
    })
    .map_err(|err| {
        debug!("Failed to parse X-App header: {}", err);
    })
    .unwrap_or_else(|()| HeaderMap::new());

    (headers, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emits_x_app_header() {
        let response = health().await.into_response();
        assert!(response.headers().contains_key("X-App"));
    }
}
