use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Claims;
use chrono::Utc;

use crate::identity::errors::IdentityError;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::identity::models::LoginCommand;
use crate::identity::models::RegisterCommand;
use crate::identity::models::Role;
use crate::identity::ports::AuthServicePort;
use crate::identity::ports::IdentityRepository;

/// Domain service implementation for registration and login.
///
/// Stateless between calls: every login is checked against the store and
/// every token is verified from its own signature and expiry.
pub struct AuthService<IR>
where
    IR: IdentityRepository,
{
    repository: Arc<IR>,
    authenticator: Arc<Authenticator>,
}

impl<IR> AuthService<IR>
where
    IR: IdentityRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity store implementation
    /// * `authenticator` - Credential verifier and token codec
    pub fn new(repository: Arc<IR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<IR> AuthServicePort for AuthService<IR>
where
    IR: IdentityRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<Identity, IdentityError> {
        // Check-then-write; the store's uniqueness constraint covers the race.
        if self
            .repository
            .exists_by_email(command.email.as_str())
            .await?
        {
            tracing::info!(email = %command.email, "Registration rejected: email already exists");
            return Err(IdentityError::DuplicateIdentity(
                command.email.as_str().to_string(),
            ));
        }

        let password_hash = self.authenticator.hash_password(&command.password)?;

        let identity = Identity {
            id: IdentityId::new(),
            email: command.email,
            password_hash,
            role: Role::User,
            created_at: Utc::now(),
        };

        let saved = self.repository.save(identity).await?;
        tracing::info!(identity_id = %saved.id, email = %saved.email, "Identity registered");

        Ok(saved)
    }

    async fn authenticate(&self, command: LoginCommand) -> Result<String, IdentityError> {
        let Some(identity) = self.repository.find_by_email(&command.email).await? else {
            tracing::debug!(reason = "unknown_identity", "Authentication rejected");
            return Err(IdentityError::InvalidCredentials);
        };

        let claims = Claims::new(identity.email.as_str()).with_role(identity.role.as_str());

        let result = self
            .authenticator
            .authenticate(&command.password, &identity.password_hash, &claims)
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::debug!(
                        reason = "credential_mismatch",
                        identity_id = %identity.id,
                        "Authentication rejected"
                    );
                    IdentityError::InvalidCredentials
                }
                AuthenticationError::PasswordError(err) => {
                    tracing::error!(identity_id = %identity.id, error = %err, "Stored password hash is unusable");
                    IdentityError::Password(err)
                }
                AuthenticationError::JwtError(err) => {
                    tracing::error!(error = %err, "Token issuance failed");
                    IdentityError::Token(err)
                }
            })?;

        tracing::info!(identity_id = %identity.id, "Token issued");
        Ok(result.access_token)
    }

    fn verify_token(&self, token: &str) -> Result<Claims, IdentityError> {
        self.authenticator.validate_token(token).map_err(|e| {
            if e.is_rejection() {
                tracing::debug!(reason = e.reason(), "Token rejected");
                IdentityError::Unauthenticated
            } else {
                IdentityError::Token(e)
            }
        })
    }

    fn public_key_pem(&self) -> Option<String> {
        self.authenticator.public_key_pem().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use auth::Argon2Hasher;
    use auth::HmacKeyProvider;
    use auth::PasswordHasher;
    use mockall::mock;
    use mockall::Sequence;

    use super::*;
    use crate::identity::models::EmailAddress;

    mock! {
        pub TestIdentityRepository {}

        #[async_trait]
        impl IdentityRepository for TestIdentityRepository {
            async fn exists_by_email(&self, email: &str) -> Result<bool, IdentityError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, IdentityError>;
            async fn save(&self, identity: Identity) -> Result<Identity, IdentityError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(Arc::new(
            HmacKeyProvider::new(b"test_secret_key_at_least_32_bytes!").unwrap(),
        )))
    }

    fn stored_identity(email: &str, password: &str, role: Role) -> Identity {
        Identity {
            id: IdentityId::new(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: Argon2Hasher::new().hash(password).unwrap(),
            role,
            created_at: Utc::now(),
        }
    }

    fn register_command(email: &str, password: &str) -> RegisterCommand {
        RegisterCommand::new(
            EmailAddress::new(email.to_string()).unwrap(),
            password.to_string(),
        )
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestIdentityRepository::new();
        let mut sequence = Sequence::new();

        // Existence is checked before any write
        repository
            .expect_exists_by_email()
            .withf(|email| email == "test@example.com")
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(false));

        repository
            .expect_save()
            .withf(|identity| {
                identity.email.as_str() == "test@example.com"
                    && identity.role == Role::User
                    && identity.password_hash.starts_with("$argon2")
            })
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|identity| Ok(identity));

        let service = AuthService::new(Arc::new(repository), authenticator());

        let identity = service
            .register(register_command("test@example.com", "password123"))
            .await
            .expect("Registration failed");

        assert_eq!(identity.email.as_str(), "test@example.com");
        assert!(!identity.password_hash.contains("password123"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut repository = MockTestIdentityRepository::new();

        repository
            .expect_exists_by_email()
            .times(1)
            .returning(|_| Ok(true));
        repository.expect_save().times(0);

        let service = AuthService::new(Arc::new(repository), authenticator());

        let result = service
            .register(register_command("test@example.com", "password"))
            .await;
        assert!(matches!(
            result,
            Err(IdentityError::DuplicateIdentity(email)) if email == "test@example.com"
        ));
    }

    #[tokio::test]
    async fn test_register_store_uniqueness_violation() {
        let mut repository = MockTestIdentityRepository::new();

        // A concurrent registration won the race between check and write
        repository
            .expect_exists_by_email()
            .times(1)
            .returning(|_| Ok(false));
        repository.expect_save().times(1).returning(|identity| {
            Err(IdentityError::DuplicateIdentity(
                identity.email.as_str().to_string(),
            ))
        });

        let service = AuthService::new(Arc::new(repository), authenticator());

        let result = service
            .register(register_command("test@example.com", "password"))
            .await;
        assert!(matches!(result, Err(IdentityError::DuplicateIdentity(_))));
    }

    #[tokio::test]
    async fn test_register_blank_password() {
        let mut repository = MockTestIdentityRepository::new();

        repository
            .expect_exists_by_email()
            .times(1)
            .returning(|_| Ok(false));
        repository.expect_save().times(0);

        let service = AuthService::new(Arc::new(repository), authenticator());

        let result = service
            .register(register_command("test@example.com", "  "))
            .await;
        assert!(matches!(result, Err(IdentityError::Password(_))));
    }

    #[tokio::test]
    async fn test_register_store_failure() {
        let mut repository = MockTestIdentityRepository::new();

        repository
            .expect_exists_by_email()
            .times(1)
            .returning(|_| Err(IdentityError::DatabaseError("connection reset".to_string())));
        repository.expect_save().times(0);

        let service = AuthService::new(Arc::new(repository), authenticator());

        let result = service
            .register(register_command("test@example.com", "password"))
            .await;
        assert!(matches!(result, Err(IdentityError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_authenticate_returns_token() {
        let mut repository = MockTestIdentityRepository::new();
        let identity = stored_identity("test@example.com", "password", Role::Admin);

        repository
            .expect_find_by_email()
            .withf(|email| email == "test@example.com")
            .times(1)
            .returning(move |_| Ok(Some(identity.clone())));

        let authenticator = authenticator();
        let service = AuthService::new(Arc::new(repository), authenticator.clone());

        let token = service
            .authenticate(LoginCommand::new(
                "test@example.com".to_string(),
                "password".to_string(),
            ))
            .await
            .expect("Authentication failed");

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(
            authenticator.extract_subject(&token).unwrap(),
            "test@example.com"
        );
        assert_eq!(
            authenticator.extract_role(&token).unwrap(),
            Some("ADMIN".to_string())
        );
    }

    #[tokio::test]
    async fn test_authenticate_unknown_and_wrong_password_are_indistinguishable() {
        let mut repository = MockTestIdentityRepository::new();
        let identity = stored_identity("test@example.com", "password", Role::User);

        repository
            .expect_find_by_email()
            .withf(|email| email == "test@example.com")
            .returning(move |_| Ok(Some(identity.clone())));
        repository
            .expect_find_by_email()
            .withf(|email| email == "notfound@example.com")
            .returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(repository), authenticator());

        let wrong_password = service
            .authenticate(LoginCommand::new(
                "test@example.com".to_string(),
                "wrongpassword".to_string(),
            ))
            .await
            .unwrap_err();
        let unknown = service
            .authenticate(LoginCommand::new(
                "notfound@example.com".to_string(),
                "password".to_string(),
            ))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, IdentityError::InvalidCredentials));
        assert!(matches!(unknown, IdentityError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_verify_token() {
        let repository = MockTestIdentityRepository::new();
        let authenticator = authenticator();
        let service = AuthService::new(Arc::new(repository), authenticator.clone());

        let token = authenticator
            .generate_token(&Claims::new("a@x.com").with_role("USER"))
            .unwrap();

        let claims = service.verify_token(&token).expect("Token rejected");
        assert_eq!(claims.sub, "a@x.com");

        assert!(matches!(
            service.verify_token("invalid.token.here"),
            Err(IdentityError::Unauthenticated)
        ));
        assert!(service.public_key_pem().is_none());
    }
}
