use once_cell::sync::Lazy;

use super::{hash_password, verify_password, AuthError, TokenKeys};
use crate::database::models::AdminUser;

/// Verified against when the username is unknown so both failure paths cost
/// one hash verification.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("portfolio-api-dummy-password").ok());

#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub token: String,
    pub admin: AdminUser,
}

/// Check a password against the looked-up admin record and issue a token.
///
/// `admin` is the result of the exact, case-sensitive username lookup. This
/// is CPU bound; run it on the blocking pool.
pub fn verify_credentials(
    admin: Option<AdminUser>,
    password: &str,
    keys: &TokenKeys,
) -> Result<LoginGrant, AuthError> {
    let Some(admin) = admin else {
        if let Some(dummy) = DUMMY_HASH.as_deref() {
            let _ = verify_password(password, dummy);
        }
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password(password, &admin.password_hash) {
        return Err(AuthError::InvalidCredentials);
    }

    let token = keys.issue(admin.id, &admin.username)?;
    Ok(LoginGrant { token, admin })
}
