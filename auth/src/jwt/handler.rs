use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::clock::Clock;
use super::clock::SystemClock;
use super::errors::JwtError;
use crate::keys::KeyProvider;

/// Default token lifetime.
pub const DEFAULT_LIFETIME_HOURS: i64 = 24;

/// JWT token handler for issuing and verifying identity tokens.
///
/// The algorithm and keys come from the injected [`KeyProvider`]. Verification
/// only accepts tokens whose header names that same algorithm, and expiry is
/// checked against the handler's clock with no leeway.
pub struct JwtHandler {
    keys: Arc<dyn KeyProvider>,
    validation: Validation,
    lifetime: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtHandler {
    /// Create a new JWT handler.
    ///
    /// # Arguments
    /// * `keys` - Key provider selected at startup
    ///
    /// # Returns
    /// JwtHandler issuing tokens valid for 24 hours, using the wall clock
    pub fn new(keys: Arc<dyn KeyProvider>) -> Self {
        let mut validation = Validation::new(keys.algorithm());
        validation.set_required_spec_claims(&["exp", "sub"]);
        // Expiry is checked against our own clock in `verify`.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            keys,
            validation,
            lifetime: Duration::hours(DEFAULT_LIFETIME_HOURS),
            clock: Arc::new(SystemClock),
        }
    }

    /// Set the token lifetime applied to every issued token.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Issue a signed token for the given claims.
    ///
    /// `iat` is set to now and `exp` to now plus the configured lifetime;
    /// any timestamps already present on `claims` are overwritten.
    ///
    /// # Arguments
    /// * `claims` - Subject and optional role to assert
    ///
    /// # Returns
    /// Compact JWT string (`header.claims.signature`)
    ///
    /// # Errors
    /// * `MissingClaim` - Subject is empty
    /// * `Key` - Provider holds no signing key
    /// * `EncodingFailed` - Expiry is out of range or token encoding failed
    pub fn issue(&self, claims: &Claims) -> Result<String, JwtError> {
        if claims.sub.trim().is_empty() {
            return Err(JwtError::MissingClaim("sub".to_string()));
        }

        let claims = claims
            .clone()
            .stamped(self.clock.now(), self.lifetime)
            .ok_or_else(|| JwtError::EncodingFailed("Token expiry out of range".to_string()))?;
        let header = Header::new(self.keys.algorithm());

        encode(&header, &claims, self.keys.signing_key()?)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// # Arguments
    /// * `token` - JWT token string
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `Malformed` - Token structure or payload is invalid, `iat` included
    /// * `UnexpectedAlgorithm` - Header names a different algorithm
    /// * `InvalidSignature` - Signature does not match
    /// * `MissingClaim` - Subject or expiry is absent, or subject is blank
    /// * `Expired` - Current time is at or past `exp`
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = decode::<Claims>(token, self.keys.verification_key(), &self.validation)
            .map_err(JwtError::from)?
            .claims;

        if claims.sub.trim().is_empty() {
            return Err(JwtError::MissingClaim("sub".to_string()));
        }

        if claims.is_expired(self.clock.now()) {
            return Err(JwtError::Expired);
        }

        Ok(claims)
    }

    /// Whether a token is currently valid.
    pub fn is_valid(&self, token: &str) -> bool {
        match self.verify(token) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(reason = e.reason(), "Token rejected");
                false
            }
        }
    }

    /// Verify a token and return its subject.
    pub fn extract_subject(&self, token: &str) -> Result<String, JwtError> {
        self.verify(token).map(|claims| claims.sub)
    }

    /// Verify a token and return its role, if any.
    pub fn extract_role(&self, token: &str) -> Result<Option<String>, JwtError> {
        self.verify(token).map(|claims| claims.role)
    }

    /// Verification key as PEM text, when the scheme has a public half.
    pub fn public_key_pem(&self) -> Option<&str> {
        self.keys.public_key_pem()
    }
}
