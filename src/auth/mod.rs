//! Credential verification and the stateless session-token authority.
//!
//! Tokens are bearer credentials signed with a server-held secret. There is no
//! revocation list; logout only tells the client to drop the cookie, and a
//! replayed token stays valid until its 24 hour expiry.

pub mod credentials;
mod state;
pub mod token;

pub use credentials::AdminIdentity;
pub use state::{AuthConfig, AuthState};
pub use token::{Claims, TokenAuthority, TokenError, ADMIN_ROLE};
