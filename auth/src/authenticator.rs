use std::sync::Arc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::keys::KeyProvider;
use crate::password::CredentialVerifier;
use crate::password::PasswordError;

/// Authentication coordinator combining credential verification and token issuance.
pub struct Authenticator {
    credentials: CredentialVerifier,
    jwt_handler: JwtHandler,
}

/// Result of successful authentication.
#[derive(Debug)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator using Argon2id and a 24 hour token lifetime.
    ///
    /// # Arguments
    /// * `keys` - Key provider selected at startup
    ///
    /// # Returns
    /// Configured Authenticator instance
    pub fn new(keys: Arc<dyn KeyProvider>) -> Self {
        Self::from_parts(CredentialVerifier::default(), JwtHandler::new(keys))
    }

    /// Assemble an authenticator from explicit parts.
    pub fn from_parts(credentials: CredentialVerifier, jwt_handler: JwtHandler) -> Self {
        Self {
            credentials,
            jwt_handler,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.credentials.hash(password)
    }

    /// Verify credentials and issue a token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `claims` - Claims to assert in the token
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password verification failed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        claims: &Claims,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.credentials.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.jwt_handler.issue(claims)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue a token without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn generate_token(&self, claims: &Claims) -> Result<String, JwtError> {
        self.jwt_handler.issue(claims)
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    /// * `JwtError` - Token is malformed, forged or expired
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.verify(token)
    }

    pub fn is_valid(&self, token: &str) -> bool {
        self.jwt_handler.is_valid(token)
    }

    pub fn extract_subject(&self, token: &str) -> Result<String, JwtError> {
        self.jwt_handler.extract_subject(token)
    }

    pub fn extract_role(&self, token: &str) -> Result<Option<String>, JwtError> {
        self.jwt_handler.extract_role(token)
    }

    /// Public verification key as PEM text (RSA scheme only).
    pub fn public_key_pem(&self) -> Option<&str> {
        self.jwt_handler.public_key_pem()
    }
}
