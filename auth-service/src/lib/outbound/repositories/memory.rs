use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::identity::models::Identity;
use crate::domain::identity::ports::IdentityRepository;
use crate::identity::errors::IdentityError;

/// Process-local identity store keyed by email.
///
/// Used for local development and tests. `save` enforces email uniqueness
/// under the write lock, so concurrent registrations of the same address
/// cannot both succeed.
#[derive(Default)]
pub struct InMemoryIdentityRepository {
    identities: RwLock<HashMap<String, Identity>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.identities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.identities.read().await.is_empty()
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn exists_by_email(&self, email: &str) -> Result<bool, IdentityError> {
        Ok(self.identities.read().await.contains_key(email))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, IdentityError> {
        Ok(self.identities.read().await.get(email).cloned())
    }

    async fn save(&self, identity: Identity) -> Result<Identity, IdentityError> {
        let mut identities = self.identities.write().await;
        let email = identity.email.as_str().to_string();

        if identities.contains_key(&email) {
            return Err(IdentityError::DuplicateIdentity(email));
        }

        identities.insert(email, identity.clone());
        Ok(identity)
    }
}
