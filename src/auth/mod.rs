//! Admin authentication: password hashes, signed access tokens and the
//! credential check that turns one into the other.

pub mod credentials;
pub mod password;
pub mod token;

use thiserror::Error;

pub use credentials::{verify_credentials, LoginGrant};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKeys, ADMIN_ROLE};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username and wrong password share this variant and message.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access token required")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}
