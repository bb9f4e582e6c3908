use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::claims::Claims;
use super::handler::JwtHandler;
use super::token::IssuedToken;
use super::token::SessionToken;
use crate::clock::Clock;
use crate::errors::AuthError;

/// Default session token lifetime: 24 hours.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60 * 24;

/// Issues stateless session tokens.
///
/// Nothing is recorded about issued tokens, so a token stays valid until it
/// expires. There is no way to revoke one earlier.
pub struct TokenIssuer {
    handler: Arc<JwtHandler>,
    clock: Arc<dyn Clock>,
    default_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(handler: Arc<JwtHandler>, clock: Arc<dyn Clock>, default_ttl: Duration) -> Self {
        Self {
            handler,
            clock,
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token for `identity` with the default lifetime.
    pub fn issue(&self, identity: &str) -> Result<IssuedToken, AuthError> {
        self.issue_with_ttl(identity, self.default_ttl)
    }

    /// Issue a token for `identity` that expires `ttl` from now.
    ///
    /// A zero `ttl` yields a token that is already expired.
    ///
    /// # Errors
    /// * `TokenIssuance` - Identity is empty, `ttl` is negative or overflows the
    ///   expiry time, or signing failed
    pub fn issue_with_ttl(&self, identity: &str, ttl: Duration) -> Result<IssuedToken, AuthError> {
        if identity.trim().is_empty() {
            return Err(AuthError::TokenIssuance(
                "cannot issue a token for an empty identity".to_string(),
            ));
        }
        if ttl < Duration::zero() {
            return Err(AuthError::TokenIssuance(format!(
                "token lifetime must not be negative, got {} seconds",
                ttl.num_seconds()
            )));
        }

        let issued_at = self.clock.now();
        let overflow = || {
            AuthError::TokenIssuance(format!(
                "token lifetime of {} seconds overflows the expiry time",
                ttl.num_seconds()
            ))
        };
        let claims = Claims::for_identity(identity, issued_at, ttl).ok_or_else(overflow)?;

        let token = self
            .handler
            .encode(&claims)
            .map_err(|e| AuthError::TokenIssuance(e.to_string()))?;

        let expires_at = claims
            .exp
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
            .ok_or_else(overflow)?;

        Ok(IssuedToken {
            token: SessionToken::from(token),
            expires_at,
        })
    }
}
