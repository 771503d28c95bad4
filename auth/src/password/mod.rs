pub mod argon2;
pub mod errors;
pub mod verifier;

pub use argon2::Argon2Hasher;
pub use errors::PasswordError;
pub use verifier::CredentialVerifier;

/// One-way password hashing capability.
///
/// `hash` output is an opaque, self-describing string; `verify` must accept
/// it back and report whether the plaintext matches.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;
}
