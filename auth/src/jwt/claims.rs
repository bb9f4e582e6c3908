use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by a session token.
///
/// `sub` holds the user identity, `exp` and `iat` are Unix timestamps in
/// seconds. Fields are optional on the wire so that a decoded token missing
/// one of them can be rejected explicitly instead of failing to parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create claims asserting `identity` until `issued_at + ttl`.
    ///
    /// # Arguments
    /// * `identity` - Unique user identifier
    /// * `issued_at` - Issuance time
    /// * `ttl` - Lifetime of the token
    ///
    /// # Returns
    /// Claims with sub, exp, and iat set, or `None` when the expiry is not a
    /// representable time
    pub fn for_identity(
        identity: impl ToString,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Option<Self> {
        let expiration = issued_at.checked_add_signed(ttl)?;

        Some(Self {
            sub: Some(identity.to_string()),
            exp: Some(expiration.timestamp()),
            iat: Some(issued_at.timestamp()),
        })
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Subject, if present and non-empty.
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Check if token is expired.
    ///
    /// A token stops being valid at the second it expires. Without an `exp`
    /// claim the token is never considered expired here; verification rejects
    /// such tokens separately.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.map_or(false, |exp| current_timestamp >= exp)
    }
}
