//! Login, logout, and verify endpoints plus the session cookie plumbing.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};

use crate::auth::{token::TOKEN_TTL_SECONDS, AuthConfig};

pub mod login;
pub mod logout;
pub mod verify;

pub const SESSION_COOKIE_NAME: &str = "admin_token";

/// Pull the admin token out of the request cookies, if present.
pub(crate) fn extract_admin_token(headers: &HeaderMap) -> Option<String> {
    headers.get_all(COOKIE).iter().find_map(|header| {
        header.to_str().ok().and_then(|cookies| {
            cookies.split(';').find_map(|cookie| {
                let (name, value) = cookie.trim().split_once('=')?;
                (name == SESSION_COOKIE_NAME && !value.is_empty()).then(|| value.to_string())
            })
        })
    })
}

/// Build the HTTP-only session cookie carrying the admin token.
pub(crate) fn session_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={TOKEN_TTL_SECONDS}"
    );
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Cookie that instructs the client to drop the session immediately. The
/// token itself stays valid until its expiry; only the client forgets it.
pub(crate) fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie =
        format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0");
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secure: bool) -> AuthConfig {
        AuthConfig::new(secure, "http://localhost:3000".to_string())
    }

    #[test]
    fn extracts_token_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; admin_token=abc.def.ghi; lang=en"),
        );
        assert_eq!(
            extract_admin_token(&headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn missing_or_empty_cookie_yields_none() {
        assert_eq!(extract_admin_token(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("admin_token="));
        assert_eq!(extract_admin_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("other=value"));
        assert_eq!(extract_admin_token(&headers), None);
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie(&config(false), "tok").unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with("admin_token=tok"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(!cookie.contains("Secure"));

        let secure = session_cookie(&config(true), "tok").unwrap();
        assert!(secure.to_str().unwrap().contains("Secure"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cookie = clear_session_cookie(&config(false)).unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with("admin_token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
