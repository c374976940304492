//! App configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_API_KEY` - App client ID (the `aud` of embedded-admin session tokens)
//! - `SHOPIFY_API_SECRET` - App client secret (signs session tokens)
//! - `SHOPIFY_ADMIN_ACCESS_TOKEN` - Offline Admin API access token for the store
//!
//! ## Optional
//! - `BUNDLE_DATABASE_URL` - `SQLite` URL for the feedback store (default: sqlite://feedback.db)
//! - `BUNDLE_HOST` - Bind address (default: 127.0.0.1)
//! - `BUNDLE_PORT` - Listen port (falls back to `BACKEND_PORT`, then `PORT`, default: 3000)
//! - `BUNDLE_RUN_MIGRATIONS` - Run embedded migrations on startup (default: false)
//! - `SHOPIFY_API_VERSION` - API version (default: 2025-01)
//! - `BUNDLE_POLL_INTERVAL_MS` - Delay between bundle operation polls (default: 1000)
//! - `BUNDLE_POLL_MAX_ATTEMPTS` - Maximum polls per operation (default: 120)
//! - `BUNDLE_POLL_TIMEOUT_SECS` - Overall polling deadline (default: 180)
//! - `BUNDLE_MAX_CONCURRENT_CREATIONS` - Bundle creations allowed in flight (default: 4)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_API_VERSION: &str = "2025-01";
const DEFAULT_DATABASE_URL: &str = "sqlite://feedback.db";

/// Upper bound on the time spent polling one bundle operation.
pub const MAX_POLL_TIMEOUT: Duration = Duration::from_secs(3600);

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `SQLite` database URL for the feedback store
    pub database_url: SecretString,
    /// Whether to run embedded migrations at startup
    pub run_migrations: bool,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify Admin API configuration
    pub shopify: ShopifyAppConfig,
    /// Bundle workflow tuning
    pub bundles: BundleConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Shopify app credentials.
///
/// Implements `Debug` manually to redact the secrets.
#[derive(Clone)]
pub struct ShopifyAppConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2025-01)
    pub api_version: String,
    /// App client ID
    pub api_key: String,
    /// App client secret (HMAC key for session tokens)
    pub api_secret: SecretString,
    /// Offline Admin API access token
    pub access_token: SecretString,
}

impl std::fmt::Debug for ShopifyAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyAppConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Bundle creation workflow tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleConfig {
    /// Delay between operation status polls.
    pub poll_interval: Duration,
    /// Maximum number of status polls per operation.
    pub poll_max_attempts: u32,
    /// Overall deadline for an operation to reach a terminal state.
    pub poll_timeout: Duration,
    /// Bundle creations allowed in flight across all requests.
    pub max_concurrent_creations: usize,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            poll_max_attempts: 120,
            poll_timeout: Duration::from_secs(180),
            max_concurrent_creations: 4,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("BUNDLE_DATABASE_URL");
        let run_migrations = parse_env_or_default("BUNDLE_RUN_MIGRATIONS", false)?;
        let host = parse_env_or_default::<IpAddr>("BUNDLE_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = get_port()?;

        let shopify = ShopifyAppConfig::from_env()?;
        let bundles = BundleConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            run_migrations,
            host,
            port,
            shopify,
            bundles,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyAppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            store: get_required_env("SHOPIFY_STORE")?,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            api_key: get_required_env("SHOPIFY_API_KEY")?,
            api_secret: get_validated_secret("SHOPIFY_API_SECRET")?,
            access_token: get_validated_secret("SHOPIFY_ADMIN_ACCESS_TOKEN")?,
        })
    }

    /// The shop's admin subdomain (`my-shop` for `my-shop.myshopify.com`).
    #[must_use]
    pub fn shop_subdomain(&self) -> &str {
        self.store.split('.').next().unwrap_or(&self.store)
    }
}

impl BundleConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let poll_interval_ms: u64 = parse_env_or_default(
            "BUNDLE_POLL_INTERVAL_MS",
            u64::try_from(defaults.poll_interval.as_millis()).unwrap_or(1000),
        )?;
        let poll_max_attempts =
            parse_env_or_default("BUNDLE_POLL_MAX_ATTEMPTS", defaults.poll_max_attempts)?;
        let poll_timeout_secs =
            parse_env_or_default("BUNDLE_POLL_TIMEOUT_SECS", defaults.poll_timeout.as_secs())?;
        let max_concurrent_creations = parse_env_or_default(
            "BUNDLE_MAX_CONCURRENT_CREATIONS",
            defaults.max_concurrent_creations,
        )?;

        let config = Self {
            poll_interval: Duration::from_millis(poll_interval_ms),
            poll_max_attempts,
            poll_timeout: Duration::from_secs(poll_timeout_secs),
            max_concurrent_creations,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every creation fail or stall.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] naming the offending variable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_max_attempts == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "BUNDLE_POLL_MAX_ATTEMPTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        if self.poll_timeout.is_zero() || self.poll_timeout > MAX_POLL_TIMEOUT {
            return Err(ConfigError::InvalidEnvVar(
                "BUNDLE_POLL_TIMEOUT_SECS".to_string(),
                format!("must be between 1 and {}", MAX_POLL_TIMEOUT.as_secs()),
            ));
        }
        if self.max_concurrent_creations == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "BUNDLE_MAX_CONCURRENT_CREATIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`, then the local default.
/// Database URL from `BUNDLE_DATABASE_URL`, then `DATABASE_URL`, else the default file.
///
/// Does not load `.env`; callers that want it call `dotenvy::dotenv()` first.
#[must_use]
pub fn database_url_from_env() -> SecretString {
    get_database_url("BUNDLE_DATABASE_URL")
}

fn get_database_url(primary_key: &str) -> SecretString {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_or_else(
            |_| SecretString::from(DEFAULT_DATABASE_URL),
            SecretString::from,
        )
}

/// Resolve the listen port from `BUNDLE_PORT`, `BACKEND_PORT`, then `PORT`.
fn get_port() -> Result<u16, ConfigError> {
    for key in ["BUNDLE_PORT", "BACKEND_PORT", "PORT"] {
        if let Some(value) = get_optional_env(key) {
            return value
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()));
        }
    }
    Ok(3000)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |value| {
        value
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real secrets like API keys have high entropy
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shopify_config() -> ShopifyAppConfig {
        ShopifyAppConfig {
            store: "bundle-test.myshopify.com".to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            api_key: "test_api_key".to_string(),
            api_secret: SecretString::from("super_secret_api_secret"),
            access_token: SecretString::from("shpat_super_secret_token"),
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-secret-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_bundle_config_defaults() {
        let config = BundleConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.poll_max_attempts, 120);
        assert_eq!(config.poll_timeout, Duration::from_secs(180));
        assert_eq!(config.max_concurrent_creations, 4);
    }

    #[test]
    fn test_bundle_config_rejects_zero_poll_timeout() {
        let config = BundleConfig {
            poll_timeout: Duration::ZERO,
            ..BundleConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEnvVar(ref key, _)) if key == "BUNDLE_POLL_TIMEOUT_SECS"
        ));
    }

    #[test]
    fn test_bundle_config_rejects_huge_poll_timeout() {
        let config = BundleConfig {
            poll_timeout: Duration::from_secs(u64::MAX),
            ..BundleConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEnvVar(ref key, _)) if key == "BUNDLE_POLL_TIMEOUT_SECS"
        ));

        let config = BundleConfig {
            poll_timeout: MAX_POLL_TIMEOUT,
            ..BundleConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bundle_config_rejects_zero_attempts_and_slots() {
        let config = BundleConfig {
            poll_max_attempts: 0,
            ..BundleConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEnvVar(ref key, _)) if key == "BUNDLE_POLL_MAX_ATTEMPTS"
        ));

        let config = BundleConfig {
            max_concurrent_creations: 0,
            ..BundleConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEnvVar(ref key, _)) if key == "BUNDLE_MAX_CONCURRENT_CREATIONS"
        ));
        assert!(BundleConfig::default().validate().is_ok());
    }

    #[test]
    fn test_shop_subdomain() {
        assert_eq!(shopify_config().shop_subdomain(), "bundle-test");
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            database_url: SecretString::from("sqlite::memory:"),
            run_migrations: false,
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            shopify: shopify_config(),
            bundles: BundleConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_shopify_config_debug_redacts_secrets() {
        let debug_output = format!("{:?}", shopify_config());

        assert!(debug_output.contains("bundle-test.myshopify.com"));
        assert!(debug_output.contains("test_api_key"));

        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_api_secret"));
        assert!(!debug_output.contains("shpat_super_secret_token"));
    }
}
