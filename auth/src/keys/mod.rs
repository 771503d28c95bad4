pub mod errors;
pub mod hmac;
pub mod rsa;

use std::fmt;
use std::str::FromStr;

use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;

pub use errors::KeyError;
pub use hmac::HmacKeyProvider;
pub use rsa::RsaKeyProvider;

/// Signing scheme a deployment is configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningScheme {
    /// Shared secret, HMAC-SHA256.
    Hmac,
    /// RSA key pair, RSASSA-PKCS1-v1_5 with SHA-256.
    Rsa,
}

impl SigningScheme {
    /// JWT algorithm bound to this scheme.
    pub fn algorithm(&self) -> Algorithm {
        match self {
            SigningScheme::Hmac => Algorithm::HS256,
            SigningScheme::Rsa => Algorithm::RS256,
        }
    }
}

impl FromStr for SigningScheme {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hmac" | "hs256" => Ok(SigningScheme::Hmac),
            "rsa" | "rs256" => Ok(SigningScheme::Rsa),
            other => Err(KeyError::UnknownScheme(other.to_string())),
        }
    }
}

impl fmt::Display for SigningScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningScheme::Hmac => f.write_str("hmac"),
            SigningScheme::Rsa => f.write_str("rsa"),
        }
    }
}

/// Source of the key material used to sign and verify tokens.
///
/// Implementations are loaded once at startup and are read-only afterwards,
/// so a single provider can be shared across any number of concurrent callers.
/// The algorithm is fixed by the provider; tokens are never verified with an
/// algorithm taken from their own header.
pub trait KeyProvider: Send + Sync {
    /// Scheme this provider implements.
    fn scheme(&self) -> SigningScheme;

    /// Algorithm used for both signing and verification.
    fn algorithm(&self) -> Algorithm {
        self.scheme().algorithm()
    }

    /// Key used to mint tokens.
    ///
    /// # Errors
    /// * `SigningUnavailable` - Provider only holds verification material
    fn signing_key(&self) -> Result<&EncodingKey, KeyError>;

    /// Key used to check token signatures.
    fn verification_key(&self) -> &DecodingKey;

    /// Verification key as PEM text, for schemes with a distributable public half.
    fn public_key_pem(&self) -> Option<&str> {
        None
    }
}
