use std::sync::Arc;

use chrono::Duration;

use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::errors::AuthError;
use crate::jwt::IssuedToken;
use crate::jwt::JwtHandler;
use crate::jwt::TokenIssuer;
use crate::jwt::TokenVerifier;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::password::DUMMY_PASSWORD_HASH;
use crate::secret::SigningSecret;

/// Authentication coordinator combining password verification and session
/// tokens.
///
/// Built once at startup from the signing secret and shared read-only by
/// every request.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
}

impl Authenticator {
    /// Create a new authenticator on the system clock.
    ///
    /// # Arguments
    /// * `secret` - Secret key for token signing
    /// * `token_ttl` - Default lifetime of issued tokens
    ///
    /// # Returns
    /// Configured Authenticator instance
    pub fn new(secret: &SigningSecret, token_ttl: Duration) -> Self {
        Self::with_clock(secret, token_ttl, Arc::new(SystemClock))
    }

    /// Create a new authenticator reading time from `clock`.
    pub fn with_clock(secret: &SigningSecret, token_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let handler = Arc::new(JwtHandler::new(secret));

        Self {
            password_hasher: PasswordHasher::new(),
            issuer: TokenIssuer::new(Arc::clone(&handler), Arc::clone(&clock), token_ttl),
            verifier: TokenVerifier::new(handler, clock),
        }
    }

    pub fn token_ttl(&self) -> Duration {
        self.issuer.default_ttl()
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Password empty or hashing failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password and issue a token for `identity`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `identity` - Identity to assert in the token
    ///
    /// # Returns
    /// Issued token with its expiry
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `TokenIssuance` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        identity: &str,
    ) -> Result<IssuedToken, AuthError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        self.issuer.issue(identity)
    }

    /// Reject a login for a username that does not exist.
    ///
    /// Still runs one full password verification so that unknown usernames
    /// take as long as wrong passwords.
    pub fn reject_unknown_user(&self, password: &str) -> AuthError {
        let _ = self.password_hasher.verify(password, DUMMY_PASSWORD_HASH);
        AuthError::InvalidCredentials
    }

    /// Issue a token without password verification.
    ///
    /// # Errors
    /// * `TokenIssuance` - Token generation failed
    pub fn issue_token(&self, identity: &str) -> Result<IssuedToken, AuthError> {
        self.issuer.issue(identity)
    }

    /// Issue a token with an explicit lifetime.
    ///
    /// # Errors
    /// * `TokenIssuance` - Token generation failed
    pub fn issue_token_with_ttl(
        &self,
        identity: &str,
        ttl: Duration,
    ) -> Result<IssuedToken, AuthError> {
        self.issuer.issue_with_ttl(identity, ttl)
    }

    /// Validate a token and return the identity it asserts.
    ///
    /// Does not check that the identity still exists.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is malformed, forged, or has no subject
    /// * `ExpiredToken` - Token is past its expiry
    pub fn verify_token(&self, token: &str) -> Result<String, AuthError> {
        self.verifier.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn authenticator() -> Authenticator {
        let secret = SigningSecret::new("test_secret_key_at_least_32_bytes!").unwrap();
        Authenticator::new(&secret, Duration::minutes(1440))
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator();

        let password = "my_password";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        let issued = authenticator
            .authenticate(password, &hash, "user123")
            .expect("Authentication failed");

        assert!(!issued.token.as_str().is_empty());

        let identity = authenticator
            .verify_token(issued.token.as_str())
            .expect("Token validation failed");
        assert_eq!(identity, "user123");
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator();

        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        let result = authenticator.authenticate("wrong_password", &hash, "user123");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_authenticate_malformed_stored_hash() {
        let authenticator = authenticator();

        let result = authenticator.authenticate("my_password", "not-a-phc-string", "user123");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_reject_unknown_user() {
        let authenticator = authenticator();
        assert_eq!(
            authenticator.reject_unknown_user("whatever"),
            AuthError::InvalidCredentials
        );
    }

    #[test]
    fn test_issue_and_verify_token() {
        let authenticator = authenticator();

        let issued = authenticator
            .issue_token("user123")
            .expect("Failed to generate token");

        let identity = authenticator
            .verify_token(issued.token.as_str())
            .expect("Failed to validate token");
        assert_eq!(identity, "user123");
    }

    #[test]
    fn test_verify_invalid_token() {
        let authenticator = authenticator();

        let result = authenticator.verify_token("invalid.token.here");
        assert_eq!(result, Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_token_expires_on_shared_clock() {
        let clock = Arc::new(ManualClock::starting_now());
        let secret = SigningSecret::new("test_secret_key_at_least_32_bytes!").unwrap();
        let authenticator = Authenticator::with_clock(&secret, Duration::minutes(1440), clock.clone());

        let issued = authenticator.issue_token("user123").unwrap();
        assert!(authenticator.verify_token(issued.token.as_str()).is_ok());

        clock.advance(Duration::minutes(1440));
        assert_eq!(
            authenticator.verify_token(issued.token.as_str()),
            Err(AuthError::ExpiredToken)
        );
    }

    #[test]
    fn test_out_of_range_ttl_fails_issuance() {
        let secret = SigningSecret::new("test_secret_key_at_least_32_bytes!").unwrap();

        let huge = Authenticator::new(&secret, Duration::minutes(1_000_000_000_000));
        assert!(matches!(
            huge.issue_token("user123"),
            Err(AuthError::TokenIssuance(_))
        ));

        let negative = Authenticator::new(&secret, Duration::minutes(-5));
        assert!(matches!(
            negative.issue_token("user123"),
            Err(AuthError::TokenIssuance(_))
        ));
    }

    #[test]
    fn test_token_ttl() {
        assert_eq!(authenticator().token_ttl(), Duration::minutes(1440));
    }
}
