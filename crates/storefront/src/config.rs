//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BREEZE_PROFILE_DIR` - Directory holding the client storage profile (default: `.breeze`)
//! - `BREEZE_LOCALE` - Display language, `ar` or `en` (default: `ar`)
//! - `BREEZE_CURRENCY` - Store currency (default: `SAR`)
//! - `BACKEND_URL` - Hosted backend base URL (e.g., `https://xyz.supabase.co`)
//! - `BACKEND_ANON_KEY` - Public API key for the hosted backend (required with `BACKEND_URL`)
//! - `ORDER_NOTIFY_URL` - Endpoint that e-mails order notifications
//! - `CATALOG_CACHE_TTL_SECS` - Catalog cache lifetime in seconds (default: 300)

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use breeze_core::{CurrencyCode, Locale};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const MIN_API_KEY_LENGTH: usize = 20;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
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

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory of the file-backed client storage profile
    pub profile_dir: PathBuf,
    /// Display language
    pub locale: Locale,
    /// Currency prices are shown in
    pub currency: CurrencyCode,
    /// Hosted backend (catalog reads, order intake), if configured
    pub backend: Option<BackendConfig>,
    /// How long catalog lookups are cached
    pub catalog_cache_ttl: Duration,
}

/// Hosted backend configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct BackendConfig {
    /// Base URL of the backend project
    pub url: Url,
    /// Public (anonymous role) API key
    pub anon_key: SecretString,
    /// Endpoint that sends order notification e-mails
    pub order_notify_url: Option<Url>,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url.as_str())
            .field("anon_key", &"[REDACTED]")
            .field(
                "order_notify_url",
                &self.order_notify_url.as_ref().map(Url::as_str),
            )
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid, if only one of
    /// `BACKEND_URL`/`BACKEND_ANON_KEY` is set, or if the API key fails
    /// validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let profile_dir = PathBuf::from(
            lookup("BREEZE_PROFILE_DIR").unwrap_or_else(|| ".breeze".to_string()),
        );
        let locale = parse_or_default(&lookup, "BREEZE_LOCALE", Locale::default())?;
        let currency = parse_or_default(&lookup, "BREEZE_CURRENCY", CurrencyCode::default())?;
        let ttl_secs: u64 = parse_or_default(&lookup, "CATALOG_CACHE_TTL_SECS", 300)?;
        let backend = BackendConfig::from_lookup(&lookup)?;

        Ok(Self {
            profile_dir,
            locale,
            currency,
            backend,
            catalog_cache_ttl: Duration::from_secs(ttl_secs),
        })
    }

    /// The backend configuration, for operations that cannot run without it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if no backend is configured.
    pub fn require_backend(&self) -> Result<&BackendConfig, ConfigError> {
        self.backend
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("BACKEND_URL".to_string()))
    }
}

impl BackendConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Option<Self>, ConfigError> {
        let url = lookup("BACKEND_URL");
        let key = lookup("BACKEND_ANON_KEY");

        let (url, key) = match (url, key) {
            (None, None) => return Ok(None),
            (Some(_), None) => {
                return Err(ConfigError::MissingEnvVar("BACKEND_ANON_KEY".to_string()));
            }
            (None, Some(_)) => return Err(ConfigError::MissingEnvVar("BACKEND_URL".to_string())),
            (Some(url), Some(key)) => (url, key),
        };

        let url = parse_url("BACKEND_URL", &url)?;
        validate_secret_strength(&key, "BACKEND_ANON_KEY")?;
        let order_notify_url = lookup("ORDER_NOTIFY_URL")
            .map(|raw| parse_url("ORDER_NOTIFY_URL", &raw))
            .transpose()?;

        Ok(Some(Self {
            url,
            anon_key: SecretString::from(key),
            order_notify_url,
        }))
    }

    /// The API key, for building request headers.
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.anon_key.expose_secret()
    }

    /// URL of a REST table endpoint (`{url}/rest/v1/{table}`).
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path.
    pub fn rest_url(&self, table: &str) -> Result<Url, url::ParseError> {
        let mut base = self.url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(&format!("rest/v1/{table}"))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable with `FromStr`, falling back to `default` when unset.
fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse an absolute http(s) URL.
fn parse_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
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

/// Validate that an API key is not a placeholder and has sufficient entropy.
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

    if secret.len() < MIN_API_KEY_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {MIN_API_KEY_LENGTH} characters (got {})",
                secret.len()
            ),
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
