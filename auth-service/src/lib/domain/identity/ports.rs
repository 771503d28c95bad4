use async_trait::async_trait;
use auth::Claims;

use crate::identity::errors::IdentityError;
use crate::identity::models::Identity;
use crate::identity::models::LoginCommand;
use crate::identity::models::RegisterCommand;

/// Port for authentication service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new identity.
    ///
    /// # Arguments
    /// * `command` - Validated email and plaintext password
    ///
    /// # Returns
    /// Registered identity (no token is issued)
    ///
    /// # Errors
    /// * `DuplicateIdentity` - Email is already registered
    /// * `Password` - Password is blank or could not be hashed
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Identity, IdentityError>;

    /// Check credentials and issue a token.
    ///
    /// # Arguments
    /// * `command` - Email and plaintext password
    ///
    /// # Returns
    /// Signed token asserting the identity's email and role
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `DatabaseError` - Store operation failed
    async fn authenticate(&self, command: LoginCommand) -> Result<String, IdentityError>;

    /// Verify a presented token.
    ///
    /// # Errors
    /// * `Unauthenticated` - Token is malformed, forged or expired
    fn verify_token(&self, token: &str) -> Result<Claims, IdentityError>;

    /// Public verification key as PEM text, when the RSA scheme is active.
    fn public_key_pem(&self) -> Option<String>;
}

/// Identity store operations required by the auth service.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Check whether an identity with this email exists.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn exists_by_email(&self, email: &str) -> Result<bool, IdentityError>;

    /// Retrieve identity by email address (case-sensitive).
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, IdentityError>;

    /// Persist a new identity.
    ///
    /// # Errors
    /// * `DuplicateIdentity` - Store already holds this email
    /// * `DatabaseError` - Store operation failed
    async fn save(&self, identity: Identity) -> Result<Identity, IdentityError>;
}
