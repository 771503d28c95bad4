use std::env;
use std::fmt;
use std::fs;
use std::sync::Arc;

use auth::HmacKeyProvider;
use auth::KeyError;
use auth::KeyProvider;
use auth::RsaKeyProvider;
use auth::SigningScheme;
use chrono::Duration;
use chrono::Utc;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Application configuration for auth-service.
///
/// Loaded from configuration files with environment variable overrides.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

/// HTTP server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// PostgreSQL database configuration.
///
/// Without a URL the service falls back to the in-memory identity store.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

/// Token signing configuration.
#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    /// "hmac" or "rsa"
    pub scheme: String,
    /// Shared secret for the hmac scheme
    pub secret: Option<String>,
    /// PEM private key file for the rsa scheme; omit for a verifier-only deployment
    pub private_key_path: Option<String>,
    /// PEM public key file for the rsa scheme
    pub public_key_path: Option<String>,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
}

fn default_expiration_hours() -> i64 {
    auth::jwt::handler::DEFAULT_LIFETIME_HOURS
}

impl JwtConfig {
    /// Token lifetime derived from `expiration_hours`.
    ///
    /// # Errors
    /// * `ConfigError::Message` - Hours are not positive, or the lifetime
    ///   cannot be added to the current time
    pub fn token_lifetime(&self) -> Result<Duration, ConfigError> {
        if self.expiration_hours <= 0 {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be positive, got {}",
                self.expiration_hours
            )));
        }

        Duration::try_hours(self.expiration_hours)
            .filter(|lifetime| Utc::now().checked_add_signed(*lifetime).is_some())
            .ok_or_else(|| {
                ConfigError::Message(format!(
                    "jwt.expiration_hours is out of range: {}",
                    self.expiration_hours
                ))
            })
    }

    /// Build the key provider for the configured scheme.
    ///
    /// Called once at startup; any error here is fatal.
    ///
    /// # Errors
    /// * `UnknownScheme` - Scheme is neither hmac nor rsa
    /// * `Missing` - Secret or key path required by the scheme is absent
    /// * `Io` - Key file cannot be read
    /// * `SecretTooShort`, `InvalidPem`, `KeyPairMismatch` - Key material is unusable
    pub fn key_provider(&self) -> Result<Arc<dyn KeyProvider>, KeyError> {
        match self.scheme.parse::<SigningScheme>()? {
            SigningScheme::Hmac => {
                let secret = self
                    .secret
                    .as_deref()
                    .ok_or_else(|| KeyError::Missing("jwt.secret".to_string()))?;
                Ok(Arc::new(HmacKeyProvider::new(secret.as_bytes())?))
            }
            SigningScheme::Rsa => {
                let public_key_path = self
                    .public_key_path
                    .as_deref()
                    .ok_or_else(|| KeyError::Missing("jwt.public_key_path".to_string()))?;
                let public_key = read_key_file(public_key_path)?;

                match self.private_key_path.as_deref() {
                    Some(private_key_path) => {
                        let private_key = read_key_file(private_key_path)?;
                        Ok(Arc::new(RsaKeyProvider::new(&private_key, &public_key)?))
                    }
                    None => Ok(Arc::new(RsaKeyProvider::verifier_only(&public_key)?)),
                }
            }
        }
    }
}

fn read_key_file(path: &str) -> Result<String, KeyError> {
    fs::read_to_string(path).map_err(|e| KeyError::Io(format!("{}: {}", path, e)))
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("scheme", &self.scheme)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("private_key_path", &self.private_key_path)
            .field("public_key_path", &self.public_key_path)
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides.
    ///
    /// # Configuration Priority (highest to lowest)
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// # Errors
    /// * `ConfigError` - A source cannot be read or required fields are missing
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Self = configuration.try_deserialize()?;
        config.jwt.token_lifetime()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const PRIVATE_KEY: &str = include_str!("../../../auth/testdata/primary_private.pem");
    const PUBLIC_KEY: &str = include_str!("../../../auth/testdata/primary_public.pem");

    fn jwt_config(scheme: &str) -> JwtConfig {
        JwtConfig {
            scheme: scheme.to_string(),
            secret: None,
            private_key_path: None,
            public_key_path: None,
            expiration_hours: 24,
        }
    }

    fn write_temp(name: &str, contents: &str) -> String {
        let path = env::temp_dir().join(format!("auth-service-{}-{}", std::process::id(), name));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_hmac_provider() {
        let mut config = jwt_config("hmac");
        config.secret = Some("secret_key_at_least_32_bytes_long!".to_string());

        let provider = config.key_provider().expect("Failed to build provider");
        assert_eq!(provider.scheme(), SigningScheme::Hmac);
    }

    #[test]
    fn test_hmac_requires_secret() {
        let result = jwt_config("hmac").key_provider();
        assert!(matches!(result, Err(KeyError::Missing(_))));
    }

    #[test]
    fn test_hmac_short_secret_fails_at_load() {
        let mut config = jwt_config("hmac");
        config.secret = Some("short".to_string());

        assert!(matches!(
            config.key_provider(),
            Err(KeyError::SecretTooShort { .. })
        ));
    }

    #[test]
    fn test_unknown_scheme() {
        assert!(matches!(
            jwt_config("none").key_provider(),
            Err(KeyError::UnknownScheme(_))
        ));
    }

    #[test]
    fn test_rsa_provider_from_files() {
        let mut config = jwt_config("rsa");
        config.private_key_path = Some(write_temp("private.pem", PRIVATE_KEY));
        config.public_key_path = Some(write_temp("public.pem", PUBLIC_KEY));

        let provider = config.key_provider().expect("Failed to build provider");
        assert_eq!(provider.scheme(), SigningScheme::Rsa);
        assert!(provider.signing_key().is_ok());
        assert_eq!(provider.public_key_pem(), Some(PUBLIC_KEY));
    }

    #[test]
    fn test_rsa_verifier_only_without_private_key() {
        let mut config = jwt_config("rsa");
        config.public_key_path = Some(write_temp("verifier-public.pem", PUBLIC_KEY));

        let provider = config.key_provider().expect("Failed to build provider");
        assert!(matches!(
            provider.signing_key(),
            Err(KeyError::SigningUnavailable)
        ));
    }

    #[test]
    fn test_rsa_missing_file() {
        let mut config = jwt_config("rsa");
        config.public_key_path = Some("/nonexistent/public.pem".to_string());

        assert!(matches!(config.key_provider(), Err(KeyError::Io(_))));
    }

    #[test]
    fn test_token_lifetime() {
        assert_eq!(jwt_config("hmac").token_lifetime().unwrap(), Duration::hours(24));
    }

    #[test]
    fn test_token_lifetime_rejects_invalid_hours() {
        for hours in [0, -1, 3_000_000_000, i64::MAX] {
            let mut config = jwt_config("hmac");
            config.expiration_hours = hours;

            assert!(
                matches!(config.token_lifetime(), Err(ConfigError::Message(_))),
                "expiration_hours = {} was accepted",
                hours
            );
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let mut config = jwt_config("hmac");
        config.secret = Some("secret_key_at_least_32_bytes_long!".to_string());

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret_key"));
    }
}
