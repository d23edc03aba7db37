//! # notemaker-assets
//!
//! Remote asset store backends for notemaker.
//!
//! - [`cloudinary::CloudinaryAssetStore`]: signed destroy calls against a
//!   Cloudinary-compatible API
//! - [`memory::InMemoryAssetStore`]: recording store for tests and dry runs
//!
//! # Example
//!
//! ```rust,no_run
//! use notemaker_assets::CloudinaryAssetStore;
//! use notemaker_core::AssetStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = CloudinaryAssetStore::from_env().unwrap();
//!     store.delete_asset("notes/abc123", "image").await.unwrap();
//! }
//! ```

pub mod cloudinary;
pub mod config;
pub mod memory;

pub use cloudinary::CloudinaryAssetStore;
pub use config::{AssetStoreConfig, ConfigError, SignatureAlgorithm};
pub use memory::InMemoryAssetStore;
