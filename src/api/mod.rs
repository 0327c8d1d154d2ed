use crate::{auth::AuthState, cli::globals::GlobalArgs, store};
use anyhow::{anyhow, Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{
        header::CONTENT_TYPE, HeaderName, HeaderValue, Method, Request,
    },
    routing::{get, post},
    Extension, Router,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use url::Url;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod handlers;
mod openapi;

pub use openapi::ApiDoc;

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn serve(port: u16, dsn: String, globals: &GlobalArgs) -> Result<()> {
    // Bounded acquire keeps a slow database from hanging requests forever.
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(&dsn)
        .await
        .context("Failed to connect to database")?;

    store::init_schema(&pool).await?;

    let auth_state = Arc::new(AuthState::from_globals(globals));

    let app = router(auth_state, pool)?;

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Build the full application router. Admin routes only exist behind the
/// guarded constructor in [`handlers::admin`].
///
/// # Errors
/// Returns an error when the configured frontend origin is not a valid URL.
pub fn router(auth_state: Arc<AuthState>, pool: PgPool) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_origin(AllowOrigin::exact(frontend_origin(
            auth_state.config().frontend_origin(),
        )?))
        .allow_credentials(true);

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health::health))
        .route("/api/confessions", post(handlers::confess::create))
        .route("/api/admin/auth/login", post(handlers::auth::login::login))
        .route(
            "/api/admin/auth/logout",
            post(handlers::auth::logout::logout),
        )
        .route(
            "/api/admin/auth/verify",
            get(handlers::auth::verify::verify),
        )
        .merge(handlers::admin::routes())
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(auth_state))
                .layer(Extension(pool)),
        );

    Ok(app)
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

fn frontend_origin(frontend_base_url: &str) -> Result<HeaderValue> {
    let parsed = Url::parse(frontend_base_url)
        .with_context(|| format!("Invalid frontend base URL: {frontend_base_url}"))?;
    let host = parsed.host_str().ok_or_else(|| {
        anyhow!("Frontend base URL must include a valid host: {frontend_base_url}")
    })?;
    let port = parsed
        .port()
        .map_or_else(String::new, |port| format!(":{port}"));
    let origin = format!("{}://{}{}", parsed.scheme(), host, port);
    HeaderValue::from_str(&origin).context("Failed to build frontend origin header")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontend_origin_strips_path_and_keeps_port() {
        let origin = frontend_origin("https://confessio.tld:8443/app/").unwrap();
        assert_eq!(origin, "https://confessio.tld:8443");

        let origin = frontend_origin("http://localhost:3000").unwrap();
        assert_eq!(origin, "http://localhost:3000");
    }

    #[test]
    fn frontend_origin_rejects_garbage() {
        assert!(frontend_origin("not a url").is_err());
    }
}
