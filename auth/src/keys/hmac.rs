use std::fmt;

use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;

use super::KeyError;
use super::KeyProvider;
use super::SigningScheme;

/// Shared-secret key provider (HS256).
///
/// Signing and verification use the same secret. Only the derived
/// jsonwebtoken keys are kept; the caller's secret buffer is not retained.
pub struct HmacKeyProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl HmacKeyProvider {
    /// Minimum secret length for HS256 (the SHA-256 output size).
    pub const MIN_SECRET_LENGTH: usize = 32;

    /// Create a provider from a shared secret.
    ///
    /// # Arguments
    /// * `secret` - Secret key bytes (at least 32 bytes)
    ///
    /// # Errors
    /// * `SecretTooShort` - Secret is shorter than 32 bytes
    pub fn new(secret: &[u8]) -> Result<Self, KeyError> {
        if secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(KeyError::SecretTooShort {
                min: Self::MIN_SECRET_LENGTH,
                actual: secret.len(),
            });
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        })
    }
}

impl KeyProvider for HmacKeyProvider {
    fn scheme(&self) -> SigningScheme {
        SigningScheme::Hmac
    }

    fn signing_key(&self) -> Result<&EncodingKey, KeyError> {
        Ok(&self.encoding_key)
    }

    fn verification_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

impl fmt::Debug for HmacKeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacKeyProvider")
            .field("secret", &"<redacted>")
            .finish()
    }
}
