use secrecy::SecretString;

/// Process-wide configuration resolved once at startup and injected from there.
///
/// Secrets live behind [`SecretString`] so they never land in logs or debug
/// output.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub admin_username: String,
    pub admin_password_hash: Option<String>,
    pub admin_password: Option<SecretString>,
    pub token_secret: SecretString,
    pub frontend_origin: String,
    pub secure_cookies: bool,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(admin_username: String, token_secret: SecretString) -> Self {
        Self {
            admin_username,
            admin_password_hash: None,
            admin_password: None,
            token_secret,
            frontend_origin: "http://localhost:3000".to_string(),
            secure_cookies: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new("admin".to_string(), SecretString::from("sekret"));
        assert_eq!(args.admin_username, "admin");
        assert_eq!(args.token_secret.expose_secret(), "sekret");
        assert!(args.admin_password_hash.is_none());
        assert!(args.admin_password.is_none());
        assert!(!args.secure_cookies);
    }

    #[test]
    fn test_global_args_debug_hides_secrets() {
        let mut args = GlobalArgs::new("admin".to_string(), SecretString::from("sekret"));
        args.admin_password = Some(SecretString::from("hunter2"));
        let debug = format!("{args:?}");
        assert!(!debug.contains("sekret"));
        assert!(!debug.contains("hunter2"));
    }
}
