use std::fmt;

use crate::errors::AuthError;

/// Secret used when development mode runs without a configured one.
///
/// Anyone who reads this source can forge tokens signed with it.
pub const INSECURE_DEVELOPMENT_SECRET: &str = "insecure-development-secret-change-me-0123456789";

/// Symmetric key that signs and verifies session tokens.
///
/// Loaded once at startup and held for the life of the process. Whoever
/// holds it can mint a token for any identity.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Wrap raw key material.
    ///
    /// # Errors
    /// * `MissingSecret` - Key is empty
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, AuthError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }
        Ok(Self(secret))
    }

    /// Pick the signing secret from configuration.
    ///
    /// An unset or blank secret is a startup failure unless the insecure
    /// development default is explicitly allowed.
    ///
    /// # Arguments
    /// * `configured` - Secret from configuration, if any
    /// * `allow_insecure_default` - Fall back to the development secret
    ///
    /// # Errors
    /// * `MissingSecret` - No secret configured and fallback not allowed
    pub fn resolve(
        configured: Option<&str>,
        allow_insecure_default: bool,
    ) -> Result<Self, AuthError> {
        // Whitespace decides blankness only; the key is used byte for byte
        match configured.filter(|s| !s.trim().is_empty()) {
            Some(secret) => Self::new(secret.as_bytes()),
            None if allow_insecure_default => {
                tracing::warn!(
                    "No JWT signing secret configured, falling back to the insecure \
                     development secret. Tokens can be forged by anyone"
                );
                Self::new(INSECURE_DEVELOPMENT_SECRET.as_bytes())
            }
            None => Err(AuthError::MissingSecret),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_insecure_default(&self) -> bool {
        self.0 == INSECURE_DEVELOPMENT_SECRET.as_bytes()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}
