use std::sync::Arc;

use super::argon2::Argon2Hasher;
use super::errors::PasswordError;
use super::PasswordHasher;

/// Checks plaintext passwords against stored one-way hashes.
///
/// Delegates to an injected [`PasswordHasher`]; plaintext never leaves the call.
#[derive(Clone)]
pub struct CredentialVerifier {
    hasher: Arc<dyn PasswordHasher>,
}

impl CredentialVerifier {
    pub fn new(hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { hasher }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `Blank` - Password is empty or whitespace only
    /// * `HashingFailed` - Underlying hasher failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        if password.trim().is_empty() {
            return Err(PasswordError::Blank);
        }
        self.hasher.hash(password)
    }

    /// Report whether `password` matches `stored_hash`.
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash cannot be interpreted
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.hasher.verify(password, stored_hash)
    }
}

impl Default for CredentialVerifier {
    fn default() -> Self {
        Self::new(Arc::new(Argon2Hasher::new()))
    }
}
