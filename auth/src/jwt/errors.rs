use thiserror::Error;

use crate::keys::KeyError;

/// Error type for JWT operations.
///
/// Every variant except `EncodingFailed` and `Key` describes why a presented
/// token was rejected. Callers facing the outside world should collapse these
/// into a single "unauthenticated" outcome.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token algorithm does not match the configured algorithm")]
    UnexpectedAlgorithm,

    #[error("Token is expired")]
    Expired,

    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    #[error("Key error: {0}")]
    Key(#[from] KeyError),
}

impl JwtError {
    /// Whether this error is a rejection of a presented token, as opposed to
    /// a failure to mint one.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, JwtError::EncodingFailed(_) | JwtError::Key(_))
    }

    /// Short machine-readable reason, suitable for log fields.
    pub fn reason(&self) -> &'static str {
        match self {
            JwtError::EncodingFailed(_) => "encoding_failed",
            JwtError::Malformed(_) => "malformed",
            JwtError::InvalidSignature => "invalid_signature",
            JwtError::UnexpectedAlgorithm => "unexpected_algorithm",
            JwtError::Expired => "expired",
            JwtError::MissingClaim(_) => "missing_claim",
            JwtError::Key(_) => "key_unavailable",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            ErrorKind::InvalidAlgorithm => JwtError::UnexpectedAlgorithm,
            ErrorKind::ExpiredSignature => JwtError::Expired,
            ErrorKind::MissingRequiredClaim(claim) => JwtError::MissingClaim(claim.clone()),
            _ => JwtError::Malformed(err.to_string()),
        }
    }
}
