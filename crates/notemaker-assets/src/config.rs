//! Asset store configuration.
//!
//! Credentials are passed to the store explicitly; nothing is read from
//! process-global state after construction. Configuration can be loaded from
//! environment variables:
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `CLOUDINARY_CLOUD_NAME` | `cloud_name` | (required) |
//! | `CLOUDINARY_API_KEY` | `api_key` | (required) |
//! | `CLOUDINARY_API_SECRET` | `api_secret` | (required) |
//! | `CLOUDINARY_API_BASE` | `api_base` | `https://api.cloudinary.com` |
//! | `ASSET_DELETE_TIMEOUT_SECS` | `timeout_seconds` | `5` |
//! | `CLOUDINARY_SIGNATURE_ALGORITHM` | `signature_algorithm` | `sha1` |
//!
//! # Example
//!
//! ```rust,no_run
//! use notemaker_assets::config::AssetStoreConfig;
//!
//! let config = AssetStoreConfig::from_env().expect("asset store credentials");
//! ```

use notemaker_core::defaults;
use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for notemaker_core::Error {
    fn from(e: ConfigError) -> Self {
        notemaker_core::Error::Config(e.to_string())
    }
}

/// Digest used to sign API requests.
///
/// Accounts verify SHA-1 signatures unless switched to SHA-256 in their
/// security settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl SignatureAlgorithm {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            _ => Err(ConfigError::InvalidValue {
                name: "CLOUDINARY_SIGNATURE_ALGORITHM".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Credentials and endpoint for the remote asset store.
#[derive(Clone)]
pub struct AssetStoreConfig {
    /// Account (cloud) name, part of every API path.
    pub cloud_name: String,
    /// Public API key sent with signed requests.
    pub api_key: String,
    /// Secret used to sign requests. Never logged.
    pub api_secret: String,
    /// API base URL.
    pub api_base: String,
    /// HTTP request timeout in seconds.
    pub timeout_seconds: u64,
    /// Digest the account verifies signatures with.
    pub signature_algorithm: SignatureAlgorithm,
}

impl fmt::Debug for AssetStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetStoreConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("signature_algorithm", &self.signature_algorithm)
            .finish()
    }
}

impl AssetStoreConfig {
    /// Config with the default endpoint and timeout.
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            api_base: defaults::ASSET_API_BASE.to_string(),
            timeout_seconds: defaults::ASSET_DELETE_TIMEOUT_SECS,
            signature_algorithm: SignatureAlgorithm::default(),
        }
    }

    /// Load from environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingVar(name.to_string()))
        };

        let timeout_seconds = match lookup("ASSET_DELETE_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                name: "ASSET_DELETE_TIMEOUT_SECS".to_string(),
                value: raw.clone(),
            })?,
            None => defaults::ASSET_DELETE_TIMEOUT_SECS,
        };

        let signature_algorithm = match lookup("CLOUDINARY_SIGNATURE_ALGORITHM") {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => SignatureAlgorithm::default(),
        };

        let config = Self {
            cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
            api_key: required("CLOUDINARY_API_KEY")?,
            api_secret: required("CLOUDINARY_API_SECRET")?,
            api_base: lookup("CLOUDINARY_API_BASE")
                .unwrap_or_else(|| defaults::ASSET_API_BASE.to_string()),
            timeout_seconds,
            signature_algorithm,
        };
        config.validate()?;

        debug!(
            cloud_name = %config.cloud_name,
            api_base = %config.api_base,
            timeout_seconds = config.timeout_seconds,
            signature_algorithm = %config.signature_algorithm,
            "Loaded asset store configuration"
        );
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.cloud_name.is_empty() {
            return Err(ConfigError::Validation(
                "cloud_name cannot be empty".to_string(),
            ));
        }

        if self.api_key.is_empty() || self.api_secret.is_empty() {
            return Err(ConfigError::Validation(
                "api_key and api_secret are required".to_string(),
            ));
        }

        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "api_base must start with http:// or https://, got: {}",
                self.api_base
            )));
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "timeout_seconds must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
