//! Shared auth state handed to handlers as an extension.

use crate::auth::{credentials::AdminIdentity, token::TokenAuthority};
use crate::cli::globals::GlobalArgs;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    cookie_secure: bool,
    frontend_origin: String,
}

impl AuthConfig {
    #[must_use]
    pub fn new(cookie_secure: bool, frontend_origin: String) -> Self {
        Self {
            cookie_secure,
            frontend_origin,
        }
    }

    #[must_use]
    pub const fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    #[must_use]
    pub fn frontend_origin(&self) -> &str {
        &self.frontend_origin
    }
}

/// Everything the auth endpoints and the admin gate need: the configured
/// identity, the token authority, and cookie settings.
pub struct AuthState {
    config: AuthConfig,
    identity: AdminIdentity,
    authority: TokenAuthority,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, identity: AdminIdentity, authority: TokenAuthority) -> Self {
        Self {
            config,
            identity,
            authority,
        }
    }

    #[must_use]
    pub fn from_globals(globals: &GlobalArgs) -> Self {
        Self::new(
            AuthConfig::new(globals.secure_cookies, globals.frontend_origin.clone()),
            AdminIdentity::from_globals(globals),
            TokenAuthority::new(&globals.token_secret),
        )
    }

    #[must_use]
    pub const fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub const fn identity(&self) -> &AdminIdentity {
        &self.identity
    }

    #[must_use]
    pub const fn authority(&self) -> &TokenAuthority {
        &self.authority
    }
}
