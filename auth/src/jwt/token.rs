use std::fmt;

use chrono::DateTime;
use chrono::Utc;

/// Signed bearer token asserting an identity until its expiry.
///
/// Opaque to holders. The `Debug` rendering hides the token itself since it
/// is a credential.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for SessionToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Result of issuing a token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: SessionToken,
    pub expires_at: DateTime<Utc>,
}
