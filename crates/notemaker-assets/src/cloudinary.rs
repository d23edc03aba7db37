//! Cloudinary-compatible asset store.
//!
//! Deletion uses the signed upload API:
//!
//! ```text
//! POST {api_base}/v1_1/{cloud_name}/{resource_type}/destroy
//!   public_id, timestamp, api_key, signature
//! ```
//!
//! The signature is the hex digest of `public_id=..&timestamp=..` followed
//! by the API secret. SHA-1 unless the config selects SHA-256, matching the
//! account's signing setting.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, info, warn};

use notemaker_core::{defaults, AssetStore, Error, Result};

use crate::config::{AssetStoreConfig, SignatureAlgorithm};

/// Response body of a destroy call.
#[derive(Debug, Deserialize)]
struct DestroyResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Asset store backed by the Cloudinary upload API.
pub struct CloudinaryAssetStore {
    client: Client,
    config: AssetStoreConfig,
}

impl CloudinaryAssetStore {
    /// Create a store with the given configuration.
    pub fn new(config: AssetStoreConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            cloud_name = %config.cloud_name,
            api_base = %config.api_base,
            signature_algorithm = %config.signature_algorithm,
            "Initializing asset store"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(AssetStoreConfig::from_env()?)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &AssetStoreConfig {
        &self.config
    }

    fn destroy_url(&self, resource_type: &str) -> String {
        format!(
            "{}/v1_1/{}/{}/destroy",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name,
            resource_type
        )
    }
}

/// Resource type segment for a destroy call. Destroy has no `auto` type.
pub fn destroy_resource_type(asset_kind: &str) -> &str {
    match asset_kind {
        "" | "auto" => defaults::DESTROY_RESOURCE_TYPE,
        other => other,
    }
}

/// Sign request parameters: sorted `key=value` pairs joined by `&`, then
/// the secret appended, digested with `algorithm`, lowercase hex.
pub fn sign(params: &[(&str, &str)], api_secret: &str, algorithm: SignatureAlgorithm) -> String {
    let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    match algorithm {
        SignatureAlgorithm::Sha1 => hex_digest::<Sha1>(&to_sign, api_secret),
        SignatureAlgorithm::Sha256 => hex_digest::<Sha256>(&to_sign, api_secret),
    }
}

fn hex_digest<D: Digest>(to_sign: &str, api_secret: &str) -> String {
    let mut hasher = D::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl AssetStore for CloudinaryAssetStore {
    async fn delete_asset(&self, asset_id: &str, asset_kind: &str) -> Result<()> {
        if asset_id.is_empty() {
            return Err(Error::InvalidInput("asset id is empty".to_string()));
        }

        let resource_type = destroy_resource_type(asset_kind);
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(
            &[("public_id", asset_id), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
            self.config.signature_algorithm,
        );
        let form = [
            ("public_id", asset_id),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.config.api_key.as_str()),
            ("signature", signature.as_str()),
        ];

        debug!(asset_id, resource_type, "asset_store: destroy");
        let response = self
            .client
            .post(self.destroy_url(resource_type))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body: DestroyResponse = response.json().await.unwrap_or(DestroyResponse {
            result: None,
            error: None,
        });

        if !status.is_success() {
            let message = body
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| status.to_string());
            warn!(asset_id, status = status.as_u16(), error = %message, "asset_store: destroy rejected");
            return Err(Error::AssetStore(format!(
                "destroy {} failed with {}: {}",
                asset_id, status, message
            )));
        }

        match body.result.as_deref() {
            Some("ok") => Ok(()),
            Some("not found") => {
                debug!(asset_id, "asset_store: asset already absent");
                Ok(())
            }
            other => Err(Error::AssetStore(format!(
                "destroy {} returned unexpected result: {}",
                asset_id,
                other.unwrap_or("<none>")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroy_resource_type() {
        assert_eq!(destroy_resource_type("auto"), "image");
        assert_eq!(destroy_resource_type(""), "image");
        assert_eq!(destroy_resource_type("video"), "video");
        assert_eq!(destroy_resource_type("raw"), "raw");
    }

    #[test]
    fn test_sign_sorts_params() {
        let a = sign(&[("timestamp", "1"), ("public_id", "x")], "secret", SignatureAlgorithm::Sha1);
        let b = sign(&[("public_id", "x"), ("timestamp", "1")], "secret", SignatureAlgorithm::Sha1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sign_sha1_documented_vector() {
        let params = [
            ("timestamp", "1315060510"),
            ("public_id", "sample_image"),
            ("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop"),
        ];
        assert_eq!(
            sign(&params, "abcd", SignatureAlgorithm::Sha1),
            "bfd09f95f331f558cbd1320e67aa8d488770583e"
        );
    }

    #[test]
    fn test_sign_sha256_is_64_hex_chars() {
        let params = [("public_id", "sample_image"), ("timestamp", "1315060510")];
        let sha1 = sign(&params, "abcd", SignatureAlgorithm::Sha1);
        let sha256 = sign(&params, "abcd", SignatureAlgorithm::Sha256);
        assert_eq!(sha1.len(), 40);
        assert_eq!(sha256.len(), 64);
        assert!(sha256.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_destroy_url() {
        let mut config = AssetStoreConfig::new("demo", "k", "s");
        config.api_base = "http://localhost:9000/".to_string();
        let store = CloudinaryAssetStore::new(config).unwrap();
        assert_eq!(
            store.destroy_url("video"),
            "http://localhost:9000/v1_1/demo/video/destroy"
        );
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = AssetStoreConfig::new("", "k", "s");
        assert!(matches!(
            CloudinaryAssetStore::new(config),
            Err(Error::Config(_))
        ));
    }
}
