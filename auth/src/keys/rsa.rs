use std::fmt;

use jsonwebtoken::crypto;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;

use super::KeyError;
use super::KeyProvider;
use super::SigningScheme;

const PROBE_MESSAGE: &[u8] = b"key-pair-probe";

/// RSA key provider (RS256).
///
/// Tokens are minted with the private half and verified with the public half.
/// A provider built with [`RsaKeyProvider::verifier_only`] holds just the public
/// key and can validate tokens minted elsewhere.
pub struct RsaKeyProvider {
    encoding_key: Option<EncodingKey>,
    decoding_key: DecodingKey,
    public_key_pem: String,
}

impl RsaKeyProvider {
    /// Create a signing and verifying provider from a PEM key pair.
    ///
    /// Accepts PKCS#1 or PKCS#8 private keys and SPKI or PKCS#1 public keys.
    /// The two halves are checked against each other by signing and
    /// verifying a probe message.
    ///
    /// # Arguments
    /// * `private_key_pem` - Private key in PEM format
    /// * `public_key_pem` - Matching public key in PEM format
    ///
    /// # Errors
    /// * `InvalidPem` - Either key cannot be parsed as an RSA key
    /// * `KeyPairMismatch` - Public key does not belong to the private key
    pub fn new(private_key_pem: &str, public_key_pem: &str) -> Result<Self, KeyError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| KeyError::InvalidPem(format!("private key: {}", e)))?;
        let decoding_key = parse_public_key(public_key_pem)?;

        ensure_key_pair(&encoding_key, &decoding_key)?;

        Ok(Self {
            encoding_key: Some(encoding_key),
            decoding_key,
            public_key_pem: public_key_pem.to_string(),
        })
    }

    /// Create a provider that can only verify tokens.
    ///
    /// # Arguments
    /// * `public_key_pem` - Public key in PEM format
    ///
    /// # Errors
    /// * `InvalidPem` - Key cannot be parsed as an RSA public key
    pub fn verifier_only(public_key_pem: &str) -> Result<Self, KeyError> {
        Ok(Self {
            encoding_key: None,
            decoding_key: parse_public_key(public_key_pem)?,
            public_key_pem: public_key_pem.to_string(),
        })
    }

    /// Whether this provider holds the private half.
    pub fn can_sign(&self) -> bool {
        self.encoding_key.is_some()
    }
}

fn parse_public_key(public_key_pem: &str) -> Result<DecodingKey, KeyError> {
    DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
        .map_err(|e| KeyError::InvalidPem(format!("public key: {}", e)))
}

fn ensure_key_pair(encoding_key: &EncodingKey, decoding_key: &DecodingKey) -> Result<(), KeyError> {
    let signature = crypto::sign(PROBE_MESSAGE, encoding_key, Algorithm::RS256)
        .map_err(|e| KeyError::InvalidPem(format!("private key: {}", e)))?;

    match crypto::verify(&signature, PROBE_MESSAGE, decoding_key, Algorithm::RS256) {
        Ok(true) => Ok(()),
        _ => Err(KeyError::KeyPairMismatch),
    }
}

impl KeyProvider for RsaKeyProvider {
    fn scheme(&self) -> SigningScheme {
        SigningScheme::Rsa
    }

    fn signing_key(&self) -> Result<&EncodingKey, KeyError> {
        self.encoding_key
            .as_ref()
            .ok_or(KeyError::SigningUnavailable)
    }

    fn verification_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    fn public_key_pem(&self) -> Option<&str> {
        Some(&self.public_key_pem)
    }
}

impl fmt::Debug for RsaKeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaKeyProvider")
            .field("can_sign", &self.can_sign())
            .field("public_key_pem", &self.public_key_pem)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVATE_KEY: &str = include_str!("../../testdata/primary_private.pem");
    const PUBLIC_KEY: &str = include_str!("../../testdata/primary_public.pem");
    const OTHER_PUBLIC_KEY: &str = include_str!("../../testdata/other_public.pem");
    const EC_PRIVATE_KEY: &str = include_str!("../../testdata/ec_private.pem");

    #[test]
    fn test_new_with_matching_pair() {
        let provider = RsaKeyProvider::new(PRIVATE_KEY, PUBLIC_KEY).expect("Failed to load keys");

        assert_eq!(provider.scheme(), SigningScheme::Rsa);
        assert_eq!(provider.algorithm(), Algorithm::RS256);
        assert!(provider.can_sign());
        assert!(provider.signing_key().is_ok());
        assert_eq!(provider.public_key_pem(), Some(PUBLIC_KEY));
    }

    #[test]
    fn test_new_rejects_mismatched_pair() {
        let result = RsaKeyProvider::new(PRIVATE_KEY, OTHER_PUBLIC_KEY);
        assert_eq!(result.err(), Some(KeyError::KeyPairMismatch));
    }

    #[test]
    fn test_new_rejects_garbage_pem() {
        let result = RsaKeyProvider::new("not a pem", PUBLIC_KEY);
        assert!(matches!(result, Err(KeyError::InvalidPem(_))));

        let result = RsaKeyProvider::new(
            PRIVATE_KEY,
            "-----BEGIN PUBLIC KEY-----\n!!!corrupted!!!\n-----END PUBLIC KEY-----",
        );
        assert!(matches!(result, Err(KeyError::InvalidPem(_))));
    }

    #[test]
    fn test_new_rejects_wrong_key_type() {
        let result = RsaKeyProvider::new(EC_PRIVATE_KEY, PUBLIC_KEY);
        assert!(matches!(result, Err(KeyError::InvalidPem(_))));
    }

    #[test]
    fn test_verifier_only_cannot_sign() {
        let provider = RsaKeyProvider::verifier_only(PUBLIC_KEY).expect("Failed to load key");

        assert!(!provider.can_sign());
        assert!(matches!(
            provider.signing_key(),
            Err(KeyError::SigningUnavailable)
        ));
        assert_eq!(provider.public_key_pem(), Some(PUBLIC_KEY));
    }

    #[test]
    fn test_debug_hides_private_key() {
        let provider = RsaKeyProvider::new(PRIVATE_KEY, PUBLIC_KEY).unwrap();
        let rendered = format!("{:?}", provider);
        assert!(!rendered.contains("PRIVATE KEY"));
    }
}
