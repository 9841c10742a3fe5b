//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MAMIEJAGO_BACKEND_URL` - Base URL of the hosted backend project
//! - `MAMIEJAGO_BACKEND_ANON_KEY` - Public (anon) API key for the backend
//!
//! ## Optional
//! - `MAMIEJAGO_WHATSAPP_NUMBER` - Seller number orders are sent to
//!   (default: 62881023406838)
//! - `MAMIEJAGO_CART_DIR` - Directory for the persisted cart (default: .mamiejago)
//! - `MAMIEJAGO_CART_KEY` - Storage key of the persisted cart (default: mamiejago-cart)

use std::collections::HashMap;
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use mamiejago_core::Phone;

use crate::cart::{FileStorage, STORAGE_KEY};
use crate::order::OrderChannel;

/// Default seller WhatsApp number.
pub const DEFAULT_WHATSAPP_NUMBER: &str = "62881023406838";

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

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

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Hosted backend connection
    pub backend: BackendConfig,
    /// Seller number orders are sent to
    pub whatsapp_number: Phone,
    /// Directory holding the persisted cart
    pub cart_dir: PathBuf,
    /// Storage key of the persisted cart
    pub cart_key: String,
}

/// Hosted backend configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://abcd.supabase.co`
    pub url: Url,
    /// Public API key sent with every request
    pub anon_key: SecretString,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url.as_str())
            .field("anon_key", &"[REDACTED]")
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
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API key looks like a placeholder.
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
        let backend = BackendConfig::from_lookup(&lookup)?;

        let number = lookup("MAMIEJAGO_WHATSAPP_NUMBER")
            .unwrap_or_else(|| DEFAULT_WHATSAPP_NUMBER.to_string());
        let whatsapp_number = Phone::parse(&number).map_err(|e| {
            ConfigError::InvalidEnvVar("MAMIEJAGO_WHATSAPP_NUMBER".to_string(), e.to_string())
        })?;

        let cart_dir = PathBuf::from(
            lookup("MAMIEJAGO_CART_DIR").unwrap_or_else(|| ".mamiejago".to_string()),
        );
        let cart_key = lookup("MAMIEJAGO_CART_KEY").unwrap_or_else(|| STORAGE_KEY.to_string());
        if cart_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "MAMIEJAGO_CART_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            backend,
            whatsapp_number,
            cart_dir,
            cart_key,
        })
    }

    /// File-backed storage for the cart.
    #[must_use]
    pub fn cart_storage(&self) -> FileStorage {
        FileStorage::new(&self.cart_dir)
    }

    /// Order channel for the configured seller number.
    #[must_use]
    pub fn order_channel(&self) -> OrderChannel {
        OrderChannel::new(self.whatsapp_number.clone())
    }
}

impl BackendConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = get_required(lookup, "MAMIEJAGO_BACKEND_URL")?;
        let url = Url::parse(&raw_url).map_err(|e| {
            ConfigError::InvalidEnvVar("MAMIEJAGO_BACKEND_URL".to_string(), e.to_string())
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "MAMIEJAGO_BACKEND_URL".to_string(),
                format!("unsupported scheme {}", url.scheme()),
            ));
        }

        let anon_key = get_required(lookup, "MAMIEJAGO_BACKEND_ANON_KEY")?;
        validate_secret_strength(&anon_key, "MAMIEJAGO_BACKEND_ANON_KEY")?;

        Ok(Self {
            url,
            anon_key: SecretString::from(anon_key),
        })
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.url.as_str().trim_end_matches('/')
    }

    /// Expose the API key for request headers.
    #[must_use]
    pub fn anon_key(&self) -> &str {
        self.anon_key.expose_secret()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required variable.
fn get_required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<String, ConfigError> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
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
