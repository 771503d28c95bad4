use std::sync::Arc;

use auth::Authenticator;
use auth::CredentialVerifier;
use auth::JwtHandler;
use auth::KeyProvider;
use auth_service::config::Config;
use auth_service::domain::identity::ports::AuthServicePort;
use auth_service::domain::identity::service::AuthService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryIdentityRepository;
use auth_service::outbound::repositories::PostgresIdentityRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        signing_scheme = %config.jwt.scheme,
        expiration_hours = config.jwt.expiration_hours,
        persistent_store = config.database.url.is_some(),
        "Configuration loaded"
    );

    // Key material is loaded once; a bad key stops the process here.
    let key_provider = config.jwt.key_provider().map_err(|e| {
        tracing::error!(error = %e, "Failed to load signing key material");
        e
    })?;
    tracing::info!(algorithm = ?key_provider.algorithm(), "Signing keys loaded");

    let jwt_handler = JwtHandler::new(key_provider).with_lifetime(config.jwt.token_lifetime()?);
    let authenticator = Arc::new(Authenticator::from_parts(
        CredentialVerifier::default(),
        jwt_handler,
    ));

    let auth_service: Arc<dyn AuthServicePort> = match &config.database.url {
        Some(database_url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            tracing::info!(
                max_connections = 5,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let repository = Arc::new(PostgresIdentityRepository::new(pg_pool));
            Arc::new(AuthService::new(repository, authenticator))
        }
        None => {
            tracing::warn!("No database configured, identities are kept in memory");
            let repository = Arc::new(InMemoryIdentityRepository::new());
            Arc::new(AuthService::new(repository, authenticator))
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
    }

    Ok(())
}
