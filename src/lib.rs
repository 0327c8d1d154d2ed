//! # Confessio
//!
//! `confessio` is an anonymous confession box with a single-admin moderation
//! API. Visitors submit short text confessions without an account; one
//! statically configured administrator reads, archives, deletes, and bans.
//!
//! ## Access control
//!
//! There is exactly one privileged role. Admin requests carry a signed,
//! stateless session token (HS256, 24 hour lifetime) in an HTTP-only cookie.
//! No server-side session store and no revocation list: possession of an
//! unexpired token is authority, and logout only instructs the client to drop
//! the cookie.
//!
//! All admin routes are registered through a single guarded constructor, so an
//! ungated admin route cannot be expressed.
//!
//! ## Abuse mitigation
//!
//! Every public submission passes admission control before it is stored:
//!
//! - content must be non-empty after trimming and at most 2000 characters,
//! - the submitter IP must not be in the ban registry,
//! - at most 15 accepted confessions per IP within the trailing hour, counted
//!   against persisted rows.
//!
//! Concurrent submissions racing the count can exceed the limit by a small
//! margin; the overshoot is bounded and accepted.

pub mod admission;
pub mod api;
pub mod auth;
pub mod cli;
pub mod error;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }
}
