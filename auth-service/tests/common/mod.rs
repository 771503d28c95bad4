use std::sync::Arc;

use auth::Authenticator;
use auth::HmacKeyProvider;
use auth::KeyProvider;
use auth::RsaKeyProvider;
use auth_service::domain::identity::service::AuthService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryIdentityRepository;

pub const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const PRIVATE_KEY: &str = include_str!("../../../auth/testdata/primary_private.pem");
pub const PUBLIC_KEY: &str = include_str!("../../../auth/testdata/primary_public.pem");

/// Test application that spawns a real server backed by the in-memory store
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    /// Shares the server's keys, for minting and checking tokens directly
    pub authenticator: Arc<Authenticator>,
    pub repository: Arc<InMemoryIdentityRepository>,
}

impl TestApp {
    /// Spawn the application with a shared-secret signing scheme
    pub async fn spawn() -> Self {
        Self::spawn_with_keys(Arc::new(HmacKeyProvider::new(SECRET).unwrap())).await
    }

    /// Spawn the application with an RSA signing scheme
    pub async fn spawn_rsa() -> Self {
        Self::spawn_with_keys(Arc::new(
            RsaKeyProvider::new(PRIVATE_KEY, PUBLIC_KEY).unwrap(),
        ))
        .await
    }

    async fn spawn_with_keys(keys: Arc<dyn KeyProvider>) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(Authenticator::new(keys));
        let repository = Arc::new(InMemoryIdentityRepository::new());
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&repository),
            Arc::clone(&authenticator),
        ));

        let router = create_router(auth_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            authenticator,
            repository,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Register an identity through the API
    pub async fn signup(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/auth/signup")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in through the API
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/auth/login")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the issued token
    pub async fn login_token(&self, email: &str, password: &str) -> String {
        let body: serde_json::Value = self
            .login(email, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Response carries no token")
            .to_string()
    }
}
