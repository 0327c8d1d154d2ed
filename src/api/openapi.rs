use utoipa::OpenApi;

use super::handlers::{admin, auth, confess, health};
use crate::store::{Confession, Stats};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        confess::create,
        auth::login::login,
        auth::logout::logout,
        auth::verify::verify,
        admin::confessions::list,
        admin::confessions::mark_read,
        admin::confessions::archive,
        admin::confessions::remove,
        admin::bans::ban,
        admin::bans::delete_by_ip,
        admin::stats::stats,
    ),
    components(schemas(
        Confession,
        Stats,
        confess::ConfessionRequest,
        auth::login::LoginRequest,
        admin::confessions::ReadPatch,
        admin::confessions::ArchivePatch,
        admin::bans::BanRequest,
        admin::bans::IpRequest,
    )),
    tags(
        (name = "confessions", description = "Anonymous submission endpoint"),
        (name = "auth", description = "Admin login, logout, and token verification"),
        (name = "admin", description = "Gated moderation API"),
        (name = "health", description = "Service health and build info"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_admin_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/admin/confessions",
            "/api/admin/confessions/{id}",
            "/api/admin/confessions/{id}/archive",
            "/api/admin/confessions/by-ip",
            "/api/admin/ban",
            "/api/admin/stats",
            "/api/admin/auth/login",
            "/api/admin/auth/logout",
            "/api/admin/auth/verify",
            "/api/confessions",
            "/health",
        ] {
            assert!(paths.contains_key(path), "missing path: {path}");
        }
    }
}
