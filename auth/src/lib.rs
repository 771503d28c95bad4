//! Identity token library
//!
//! Provides the token boundary for credential-based authentication:
//! - Key providers for shared-secret (HS256) and RSA (RS256) signing
//! - JWT issuance and verification with fixed algorithm and expiry checks
//! - Password hashing (Argon2id) behind an injectable capability
//! - Authentication coordination
//!
//! Key material is loaded once by the caller and shared read-only. Nothing in
//! this crate reads the environment or touches storage.
//!
//! # Examples
//!
//! ## JWT Tokens
//! ```
//! use std::sync::Arc;
//! use auth::{Claims, HmacKeyProvider, JwtHandler};
//!
//! let keys = HmacKeyProvider::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let handler = JwtHandler::new(Arc::new(keys));
//! let token = handler.issue(&Claims::new("alice@example.com").with_role("USER")).unwrap();
//! let claims = handler.verify(&token).unwrap();
//! assert_eq!(claims.sub, "alice@example.com");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use std::sync::Arc;
//! use auth::{Authenticator, Claims, HmacKeyProvider};
//!
//! let keys = HmacKeyProvider::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let auth = Authenticator::new(Arc::new(keys));
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let result = auth
//!     .authenticate("password123", &hash, &Claims::new("alice@example.com"))
//!     .unwrap();
//!
//! // Validate token
//! assert_eq!(auth.extract_subject(&result.access_token).unwrap(), "alice@example.com");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod keys;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::Clock;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::ManualClock;
pub use jwt::SystemClock;
pub use keys::HmacKeyProvider;
pub use keys::KeyError;
pub use keys::KeyProvider;
pub use keys::RsaKeyProvider;
pub use keys::SigningScheme;
pub use password::Argon2Hasher;
pub use password::CredentialVerifier;
pub use password::PasswordError;
pub use password::PasswordHasher;
