use std::sync::Arc;

use super::claims::Claims;
use super::handler::JwtHandler;
use crate::clock::Clock;
use crate::errors::AuthError;

/// Checks a presented session token and extracts the identity it asserts.
///
/// Checks run in order: structure and signature, then expiry, then subject.
/// Malformed tokens and bad signatures both come back as `InvalidToken`.
pub struct TokenVerifier {
    handler: Arc<JwtHandler>,
    clock: Arc<dyn Clock>,
}

impl TokenVerifier {
    pub fn new(handler: Arc<JwtHandler>, clock: Arc<dyn Clock>) -> Self {
        Self { handler, clock }
    }

    /// Verify `token` and return the identity it was issued for.
    ///
    /// # Errors
    /// * `InvalidToken` - Malformed, bad signature, no `exp`, or no subject
    /// * `ExpiredToken` - Expiry is not in the future
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let claims: Claims = self.handler.decode(token).map_err(|e| {
            tracing::debug!(error = %e, "Token failed to decode");
            AuthError::InvalidToken
        })?;

        if claims.exp.is_none() {
            tracing::debug!("Token has no expiry claim");
            return Err(AuthError::InvalidToken);
        }

        if claims.is_expired(self.clock.now().timestamp()) {
            return Err(AuthError::ExpiredToken);
        }

        claims
            .subject()
            .map(str::to_string)
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::clock::ManualClock;
    use crate::jwt::issuer::TokenIssuer;
    use crate::secret::SigningSecret;

    struct Fixture {
        clock: Arc<ManualClock>,
        handler: Arc<JwtHandler>,
        issuer: TokenIssuer,
        verifier: TokenVerifier,
    }

    fn fixture(secret: &str) -> Fixture {
        let clock = Arc::new(ManualClock::starting_now());
        let handler = Arc::new(JwtHandler::new(&SigningSecret::new(secret).unwrap()));
        let issuer = TokenIssuer::new(
            Arc::clone(&handler),
            clock.clone(),
            Duration::minutes(60),
        );
        let verifier = TokenVerifier::new(Arc::clone(&handler), clock.clone());
        Fixture {
            clock,
            handler,
            issuer,
            verifier,
        }
    }

    /// Replace one character in the middle of the payload segment.
    fn tamper_payload(token: &str) -> String {
        let parts: Vec<&str> = token.split('.').collect();
        let mut payload: Vec<char> = parts[1].chars().collect();
        let middle = payload.len() / 2;
        payload[middle] = if payload[middle] == 'A' { 'B' } else { 'A' };
        let payload: String = payload.into_iter().collect();
        format!("{}.{}.{}", parts[0], payload, parts[2])
    }

    #[test]
    fn test_verify_valid_token() {
        let fx = fixture("verifier_test_secret_at_least_32_bytes");
        let issued = fx.issuer.issue("user123").unwrap();

        assert_eq!(
            fx.verifier.verify(issued.token.as_str()),
            Ok("user123".to_string())
        );
    }

    #[test]
    fn test_verify_zero_ttl_is_expired_immediately() {
        let fx = fixture("verifier_test_secret_at_least_32_bytes");
        let issued = fx
            .issuer
            .issue_with_ttl("user123", Duration::zero())
            .unwrap();

        assert_eq!(
            fx.verifier.verify(issued.token.as_str()),
            Err(AuthError::ExpiredToken)
        );
    }

    #[test]
    fn test_verify_expires_after_ttl() {
        let fx = fixture("verifier_test_secret_at_least_32_bytes");
        let issued = fx.issuer.issue("user123").unwrap();

        fx.clock.advance(Duration::minutes(59));
        assert!(fx.verifier.verify(issued.token.as_str()).is_ok());

        fx.clock.advance(Duration::minutes(1));
        assert_eq!(
            fx.verifier.verify(issued.token.as_str()),
            Err(AuthError::ExpiredToken)
        );
    }

    #[test]
    fn test_verify_tampered_payload() {
        let fx = fixture("verifier_test_secret_at_least_32_bytes");
        let issued = fx.issuer.issue("user123").unwrap();

        let tampered = tamper_payload(issued.token.as_str());
        assert_ne!(tampered, issued.token.as_str());
        assert_eq!(fx.verifier.verify(&tampered), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_verify_tampered_signature() {
        let fx = fixture("verifier_test_secret_at_least_32_bytes");
        let issued = fx.issuer.issue("user123").unwrap();

        let token = issued.token.as_str();
        let (head, signature) = token.rsplit_once('.').unwrap();
        let forged_signature: String = signature.chars().rev().collect();
        let forged = format!("{}.{}", head, forged_signature);

        assert_eq!(fx.verifier.verify(&forged), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_verify_token_from_other_secret() {
        let ours = fixture("verifier_test_secret_at_least_32_bytes");
        let theirs = fixture("some_other_secret_also_32_bytes_long!");
        let issued = theirs.issuer.issue("user123").unwrap();

        assert_eq!(
            ours.verifier.verify(issued.token.as_str()),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn test_verify_malformed_token() {
        let fx = fixture("verifier_test_secret_at_least_32_bytes");

        assert_eq!(fx.verifier.verify(""), Err(AuthError::InvalidToken));
        assert_eq!(
            fx.verifier.verify("invalid.token.here"),
            Err(AuthError::InvalidToken)
        );
        assert_eq!(
            fx.verifier.verify("not-a-jwt"),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn test_verify_token_without_subject() {
        let fx = fixture("verifier_test_secret_at_least_32_bytes");
        let exp = (fx.clock.now() + Duration::minutes(10)).timestamp();
        let token = fx
            .handler
            .encode(&Claims::new().with_expiration(exp))
            .unwrap();

        assert_eq!(fx.verifier.verify(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_verify_token_with_empty_subject() {
        let fx = fixture("verifier_test_secret_at_least_32_bytes");
        let exp = (fx.clock.now() + Duration::minutes(10)).timestamp();
        let token = fx
            .handler
            .encode(&Claims::new().with_subject("").with_expiration(exp))
            .unwrap();

        assert_eq!(fx.verifier.verify(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_verify_token_without_expiry() {
        let fx = fixture("verifier_test_secret_at_least_32_bytes");
        let token = fx
            .handler
            .encode(&Claims::new().with_subject("user123"))
            .unwrap();

        assert_eq!(fx.verifier.verify(&token), Err(AuthError::InvalidToken));
    }
}
