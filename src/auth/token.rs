//! HS256 session tokens for the single admin role.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ADMIN_ROLE: &str = "admin";

/// Token lifetime: 24 hours from issuance.
pub const TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Each verification failure is distinguishable so the gate can map missing,
/// invalid, and expired tokens to 401 and a wrong role to 403.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("No token provided")]
    Missing,

    #[error("Invalid or expired token")]
    Invalid,

    #[error("Invalid or expired token")]
    Expired,

    #[error("Insufficient permissions")]
    WrongRole,
}

/// Issues and verifies the admin session token. Pure CPU-bound work, no I/O.
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenAuthority {
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Sign a token asserting `username` holds the admin role, issued now.
    ///
    /// # Errors
    /// Returns an error if token serialization or signing fails.
    pub fn issue(&self, username: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(username, Utc::now().timestamp())
    }

    fn issue_at(&self, username: &str, iat: i64) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: username.to_string(),
            role: ADMIN_ROLE.to_string(),
            iat,
            // exp is embedded for interoperability, but verification recomputes
            // it from iat so the signature covers the effective expiry.
            exp: iat + TOKEN_TTL_SECONDS,
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Decode and check a token.
    ///
    /// # Errors
    /// `Invalid` for a bad signature or corrupt payload, `Expired` once
    /// now > iat + 24h, `WrongRole` for a valid token without the admin role.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    fn verify_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        // Expiry is derived from iat below; a tampered iat already breaks the
        // signature, so a separate exp claim is never trusted.
        validation.validate_exp = false;

        let data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|_| TokenError::Invalid)?;

        let claims = data.claims;

        if now > claims.iat + TOKEN_TTL_SECONDS {
            return Err(TokenError::Expired);
        }

        if claims.role != ADMIN_ROLE {
            return Err(TokenError::WrongRole);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authority() -> TokenAuthority {
        TokenAuthority::new(&SecretString::from("test-signing-secret"))
    }

    #[test]
    fn issue_verify_round_trip() {
        let authority = authority();
        let token = authority.issue("admin").unwrap();
        let claims = authority.verify(&token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.role, ADMIN_ROLE);
    }

    #[test]
    fn expired_token_fails_with_expiry_not_signature() {
        let authority = authority();
        let iat = Utc::now().timestamp() - TOKEN_TTL_SECONDS - 1;
        let token = authority.issue_at("admin", iat).unwrap();
        assert_eq!(authority.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn token_valid_until_the_last_second() {
        let authority = authority();
        let iat = 1_000_000;
        let token = authority.issue_at("admin", iat).unwrap();
        assert!(authority
            .verify_at(&token, iat + TOKEN_TTL_SECONDS)
            .is_ok());
        assert_eq!(
            authority.verify_at(&token, iat + TOKEN_TTL_SECONDS + 1),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn tampered_token_is_invalid() {
        let authority = authority();
        let token = authority.issue("admin").unwrap();

        // Flip one character in every position; none may verify or panic.
        for position in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[position] = if bytes[position] == b'A' { b'B' } else { b'A' };
            let Ok(tampered) = String::from_utf8(bytes) else {
                continue;
            };
            if tampered == token {
                continue;
            }
            assert_eq!(authority.verify(&tampered), Err(TokenError::Invalid));
        }
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = authority().issue("admin").unwrap();
        let other = TokenAuthority::new(&SecretString::from("another-secret"));
        assert_eq!(other.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn wrong_role_is_rejected() {
        let authority = authority();
        let claims = Claims {
            sub: "admin".to_string(),
            role: "viewer".to_string(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + TOKEN_TTL_SECONDS,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-signing-secret"),
        )
        .unwrap();
        assert_eq!(authority.verify(&token), Err(TokenError::WrongRole));
    }

    #[test]
    fn garbage_is_invalid() {
        assert_eq!(authority().verify("not-a-token"), Err(TokenError::Invalid));
        assert_eq!(authority().verify(""), Err(TokenError::Invalid));
    }
}
