//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_API_KEY` - App client ID (public, handed to App Bridge)
//! - `SHOPIFY_API_SECRET` - App client secret (verifies launch HMACs)
//! - `SHOPIFY_APP_URL` - Public URL the app is served from
//! - `SHOPIFY_STORE_DOMAIN` - Store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_ADMIN_API_ACCESS_TOKEN` - Admin API access token (HIGH PRIVILEGE)
//! - `OPENAI_API_KEY` - Completion provider API key
//!
//! ## Optional
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 3000)
//! - `SCOPES` - Comma-separated access scopes (default: none)
//! - `SHOP_CUSTOM_DOMAIN` - Additional domain the store is reachable on
//! - `SHOPIFY_API_VERSION` - API version (default: 2025-01)
//! - `OPENAI_MODEL` - Completion model (default: gpt-4)
//! - `OPENAI_BASE_URL` - Completion API base URL (default: <https://api.openai.com/v1>)
//! - `OPENAI_TIMEOUT_SECS` - Completion request timeout (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_API_VERSION: &str = "2025-01";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_TIMEOUT_SECS: u64 = 60;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
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

/// Admin application configuration.
///
/// Built once at startup and shared through `AppState`; nothing reads the
/// process environment after that.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify app (partner dashboard) configuration
    pub app: ShopifyAppConfig,
    /// Shopify Admin API configuration
    pub shopify: ShopifyAdminConfig,
    /// Completion API configuration
    pub openai: OpenAIConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Shopify app credentials and embedding settings.
///
/// Implements `Debug` manually to redact the client secret.
#[derive(Clone)]
pub struct ShopifyAppConfig {
    /// App client ID, exposed to App Bridge
    pub api_key: String,
    /// App client secret
    pub api_secret: SecretString,
    /// Requested access scopes
    pub scopes: Vec<String>,
    /// Public URL the app is served from
    pub app_url: Url,
    /// Custom storefront domain, if any
    pub custom_domain: Option<String>,
}

impl std::fmt::Debug for ShopifyAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyAppConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .field("app_url", &self.app_url.as_str())
            .field("custom_domain", &self.custom_domain)
            .finish()
    }
}

/// Shopify Admin API configuration.
///
/// Implements `Debug` manually to redact the HIGH PRIVILEGE access token.
#[derive(Clone)]
pub struct ShopifyAdminConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store_domain: String,
    /// Shopify API version (e.g., 2025-01)
    pub api_version: String,
    /// Admin API access token (HIGH PRIVILEGE - full store access)
    pub access_token: SecretString,
}

impl std::fmt::Debug for ShopifyAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyAdminConfig")
            .field("store_domain", &self.store_domain)
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl ShopifyAdminConfig {
    /// The Admin GraphQL endpoint for the configured store and version.
    #[must_use]
    pub fn graphql_endpoint(&self) -> String {
        format!(
            "https://{}/admin/api/{}/graphql.json",
            self.store_domain, self.api_version
        )
    }
}

/// Completion API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct OpenAIConfig {
    /// Bearer credential
    pub api_key: SecretString,
    /// Model name sent with every request
    pub model: String,
    /// Base URL; `/chat/completions` is appended
    pub base_url: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;

        let app = ShopifyAppConfig::from_env()?;
        let shopify = ShopifyAdminConfig::from_env()?;
        let openai = OpenAIConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            app,
            shopify,
            openai,
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

    /// Shop domains allowed to launch and frame the app.
    ///
    /// The configured store domain first, then the custom domain if set.
    #[must_use]
    pub fn shop_domains(&self) -> Vec<&str> {
        std::iter::once(self.shopify.store_domain.as_str())
            .chain(self.app.custom_domain.as_deref())
            .collect()
    }
}

impl ShopifyAppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_secret = get_required_env("SHOPIFY_API_SECRET")?;
        if let Err(e) = validate_secret_strength(&api_secret, "SHOPIFY_API_SECRET") {
            tracing::warn!("SHOPIFY_API_SECRET validation warning: {e}");
        }

        let app_url = get_required_env("SHOPIFY_APP_URL")?;
        let app_url = Url::parse(&app_url).map_err(|e| {
            ConfigError::InvalidEnvVar("SHOPIFY_APP_URL".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_key: get_required_env("SHOPIFY_API_KEY")?,
            api_secret: SecretString::from(api_secret),
            scopes: parse_scopes(&get_env_or_default("SCOPES", "")),
            app_url,
            custom_domain: get_optional_env("SHOP_CUSTOM_DOMAIN").filter(|d| !d.is_empty()),
        })
    }
}

impl ShopifyAdminConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            store_domain: get_required_env("SHOPIFY_STORE_DOMAIN")?,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            access_token: get_required_secret("SHOPIFY_ADMIN_API_ACCESS_TOKEN")?,
        })
    }
}

impl OpenAIConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = get_required_env("OPENAI_API_KEY")?;
        if let Err(e) = validate_secret_strength(&api_key, "OPENAI_API_KEY") {
            tracing::warn!("OPENAI_API_KEY validation warning: {e}");
        }

        let base_url = get_env_or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL);
        Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("OPENAI_BASE_URL".to_string(), e.to_string())
        })?;

        let timeout_secs = get_env_or_default(
            "OPENAI_TIMEOUT_SECS",
            &DEFAULT_OPENAI_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar("OPENAI_TIMEOUT_SECS".to_string(), e.to_string()))?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            model: get_env_or_default("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable. Empty values count as missing.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Split a comma-separated scope list, dropping blanks.
fn parse_scopes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
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
    let len = s.chars().count() as f64;
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

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            app: ShopifyAppConfig {
                api_key: "test_api_key".to_string(),
                api_secret: SecretString::from("super_secret_app_secret"),
                scopes: vec!["read_products".to_string()],
                app_url: Url::parse("https://copilot.example.test").unwrap(),
                custom_domain: None,
            },
            shopify: ShopifyAdminConfig {
                store_domain: "test.myshopify.com".to_string(),
                api_version: DEFAULT_API_VERSION.to_string(),
                access_token: SecretString::from("shpat_super_secret_token"),
            },
            openai: OpenAIConfig {
                api_key: SecretString::from("sk-super-secret-key"),
                model: DEFAULT_OPENAI_MODEL.to_string(),
                base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
                timeout: Duration::from_secs(DEFAULT_OPENAI_TIMEOUT_SECS),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
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
    fn test_missing_env_var() {
        let result = get_required_env("SHOP_COPILOT_TEST_DEFINITELY_UNSET");
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref key)) if key == "SHOP_COPILOT_TEST_DEFINITELY_UNSET")
        );
    }

    #[test]
    fn test_parse_scopes() {
        assert_eq!(
            parse_scopes("read_products, write_products,,"),
            vec!["read_products".to_string(), "write_products".to_string()]
        );
        assert!(parse_scopes("").is_empty());
    }

    #[test]
    fn test_graphql_endpoint() {
        let config = test_config();
        assert_eq!(
            config.shopify.graphql_endpoint(),
            "https://test.myshopify.com/admin/api/2025-01/graphql.json"
        );
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_shop_domains() {
        let mut config = test_config();
        assert_eq!(config.shop_domains(), vec!["test.myshopify.com"]);

        config.app.custom_domain = Some("shop.example.test".to_string());
        assert_eq!(
            config.shop_domains(),
            vec!["test.myshopify.com", "shop.example.test"]
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug_output = format!("{:?}", test_config());

        assert!(debug_output.contains("test.myshopify.com"));
        assert!(debug_output.contains("test_api_key"));
        assert!(debug_output.contains("gpt-4"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_app_secret"));
        assert!(!debug_output.contains("shpat_super_secret_token"));
        assert!(!debug_output.contains("sk-super-secret-key"));
    }
}
