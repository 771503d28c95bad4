use thiserror::Error;

/// Error type for key material loading.
///
/// Raised while a key provider is being constructed. A provider that was
/// built successfully never produces these during token operations, apart
/// from `SigningUnavailable` on verifier-only deployments.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("Shared secret too short: minimum {min} bytes, got {actual}")]
    SecretTooShort { min: usize, actual: usize },

    #[error("Invalid PEM key material: {0}")]
    InvalidPem(String),

    #[error("Private and public keys do not form a key pair")]
    KeyPairMismatch,

    #[error("Signing key is not available in a verifier-only deployment")]
    SigningUnavailable,

    #[error("Missing key material: {0}")]
    Missing(String),

    #[error("Unknown signing scheme: {0}")]
    UnknownScheme(String),

    #[error("Failed to read key material: {0}")]
    Io(String),
}
