use thiserror::Error;

use crate::password::PasswordError;

/// Error type for the authentication subsystem.
///
/// `InvalidCredentials`, `InvalidToken`, `ExpiredToken` and `UnknownUser` are
/// per-request rejections. Callers must present all of them to clients as
/// the same unauthorized outcome; the distinct kind is for logs only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token is expired")]
    ExpiredToken,

    #[error("Token subject does not match any user")]
    UnknownUser,

    #[error("Signing secret is not configured")]
    MissingSecret,

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("User store error: {0}")]
    Store(String),
}

impl AuthError {
    /// Whether this is a rejection of what the caller presented, as opposed
    /// to a failure of the server.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials
                | AuthError::InvalidToken
                | AuthError::ExpiredToken
                | AuthError::UnknownUser
        )
    }
}
