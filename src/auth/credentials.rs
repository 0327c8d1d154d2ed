//! Verification of the statically configured administrator credentials.

use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use crate::cli::globals::GlobalArgs;

/// The single administrator principal, built once at startup from
/// configuration and injected wherever credentials are checked.
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    username: String,
    password_hash: Option<String>,
    password: Option<SecretString>,
}

impl AdminIdentity {
    #[must_use]
    pub fn new(
        username: String,
        password_hash: Option<String>,
        password: Option<SecretString>,
    ) -> Self {
        if password_hash.is_none() && password.is_some() {
            // Plaintext comparison is a bootstrap mode, weaker than the hash
            // path. Deployments should configure a bcrypt hash.
            warn!("No admin password hash configured, falling back to plaintext comparison");
        }
        Self {
            username,
            password_hash,
            password,
        }
    }

    #[must_use]
    pub fn from_globals(globals: &GlobalArgs) -> Self {
        Self::new(
            globals.admin_username.clone(),
            globals.admin_password_hash.clone(),
            globals.admin_password.clone(),
        )
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check a claimed username/password pair.
    ///
    /// The username must match exactly (case-sensitive). The password is
    /// checked against the bcrypt hash when one is configured; if that fails
    /// or no hash exists, the plaintext fallback secret is compared directly.
    #[must_use]
    pub fn verify(&self, username: &str, password: &str) -> bool {
        if username != self.username {
            return false;
        }

        if let Some(hash) = &self.password_hash {
            if bcrypt::verify(password, hash).unwrap_or(false) {
                return true;
            }
        }

        if let Some(plain) = &self.password {
            return password == plain.expose_secret();
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(password: &str) -> String {
        // DEFAULT_COST is slow; the minimum cost keeps the test suite fast.
        bcrypt::hash(password, 4).unwrap()
    }

    #[test]
    fn accepts_matching_hash() {
        let identity = AdminIdentity::new("admin".to_string(), Some(hash("hunter2")), None);
        assert!(identity.verify("admin", "hunter2"));
        assert!(!identity.verify("admin", "wrong"));
    }

    #[test]
    fn username_is_case_sensitive_and_checked_first() {
        let identity = AdminIdentity::new("admin".to_string(), Some(hash("hunter2")), None);
        assert!(!identity.verify("Admin", "hunter2"));
        assert!(!identity.verify("someone-else", "hunter2"));
    }

    #[test]
    fn plaintext_fallback_when_no_hash() {
        let identity = AdminIdentity::new(
            "admin".to_string(),
            None,
            Some(SecretString::from("hunter2")),
        );
        assert!(identity.verify("admin", "hunter2"));
        assert!(!identity.verify("admin", "hunter3"));
    }

    #[test]
    fn plaintext_fallback_when_hash_rejects() {
        let identity = AdminIdentity::new(
            "admin".to_string(),
            Some(hash("old-password")),
            Some(SecretString::from("new-password")),
        );
        assert!(identity.verify("admin", "old-password"));
        assert!(identity.verify("admin", "new-password"));
        assert!(!identity.verify("admin", "neither"));
    }

    #[test]
    fn malformed_hash_does_not_panic() {
        let identity = AdminIdentity::new(
            "admin".to_string(),
            Some("not-a-bcrypt-hash".to_string()),
            None,
        );
        assert!(!identity.verify("admin", "anything"));
    }

    #[test]
    fn no_secret_configured_rejects_everything() {
        let identity = AdminIdentity::new("admin".to_string(), None, None);
        assert!(!identity.verify("admin", ""));
        assert!(!identity.verify("admin", "hunter2"));
    }
}
