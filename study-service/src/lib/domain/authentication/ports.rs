use async_trait::async_trait;
use auth::AuthError;

use crate::domain::authentication::models::LoginOutcome;
use crate::domain::user::models::User;

/// The single gate every protected operation passes through.
///
/// Nothing else in the service validates tokens, so policy changes such as
/// revocation lists belong here.
#[async_trait]
pub trait AuthGate: Send + Sync + 'static {
    /// Resolve a presented bearer token to the user it was issued for.
    ///
    /// # Arguments
    /// * `token` - Bearer token exactly as presented
    ///
    /// # Returns
    /// The resolved user
    ///
    /// # Errors
    /// * `InvalidToken` - Malformed, forged, or without a usable subject
    /// * `ExpiredToken` - Past its expiry
    /// * `UnknownUser` - Subject does not match any user
    /// * `Store` - User store lookup failed
    async fn authenticate(&self, token: &str) -> Result<User, AuthError>;
}

/// Credential exchange on top of the gate.
#[async_trait]
pub trait AuthServicePort: AuthGate {
    /// Exchange a username and password for a session token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `TokenIssuance` - Token could not be signed
    /// * `Store` - User store lookup failed
    async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError>;
}
