use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Authenticated payload of an identity token.
///
/// `sub` carries the identity (an email address) and `role` an optional
/// single role tag. `iat` and `exp` are Unix timestamps in seconds and are
/// stamped by the token handler at issuance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (asserted identity)
    #[serde(default)]
    pub sub: String,

    /// Role tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a subject. Timestamps are left unset until issuance.
    pub fn new(subject: impl ToString) -> Self {
        Self {
            sub: subject.to_string(),
            role: None,
            iat: 0,
            exp: 0,
        }
    }

    /// Set role.
    pub fn with_role(mut self, role: impl ToString) -> Self {
        self.role = Some(role.to_string());
        self
    }

    /// Stamp issuance and expiry relative to `now`.
    ///
    /// Returns `None` when `now + lifetime` falls outside the representable range.
    pub fn stamped(mut self, now: DateTime<Utc>, lifetime: Duration) -> Option<Self> {
        self.iat = now.timestamp();
        self.exp = now.checked_add_signed(lifetime)?.timestamp();
        Some(self)
    }

    /// Check if token is expired.
    ///
    /// A token is valid strictly before `exp`; there is no leeway.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}
