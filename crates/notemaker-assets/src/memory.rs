//! In-memory asset store for tests and dry runs.
//!
//! Records every delete call and can be told to fail or stall for specific
//! asset ids.
//!
//! ```rust
//! use notemaker_assets::memory::InMemoryAssetStore;
//! use notemaker_core::AssetStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = InMemoryAssetStore::new().with_asset("notes/a");
//!     store.delete_asset("notes/a", "image").await.unwrap();
//!     assert!(!store.contains("notes/a"));
//! }
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

use notemaker_core::{AssetStore, Error, Result};

/// One recorded delete call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCall {
    pub asset_id: String,
    pub asset_kind: String,
}

#[derive(Debug, Clone, Default)]
struct Behavior {
    failures: HashMap<String, String>,
    stalls: HashMap<String, Duration>,
}

/// Asset store that keeps assets in a set.
#[derive(Clone, Default)]
pub struct InMemoryAssetStore {
    behavior: Arc<Behavior>,
    assets: Arc<Mutex<HashSet<String>>>,
    calls: Arc<Mutex<Vec<DeleteCall>>>,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing asset.
    pub fn with_asset(self, asset_id: impl Into<String>) -> Self {
        self.assets.lock().unwrap().insert(asset_id.into());
        self
    }

    /// Make deletes of `asset_id` fail with `message`.
    pub fn fail_on(mut self, asset_id: impl Into<String>, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.behavior)
            .failures
            .insert(asset_id.into(), message.into());
        self
    }

    /// Make deletes of `asset_id` sleep for `delay` before answering.
    pub fn stall_on(mut self, asset_id: impl Into<String>, delay: Duration) -> Self {
        Arc::make_mut(&mut self.behavior)
            .stalls
            .insert(asset_id.into(), delay);
        self
    }

    /// Whether the asset is still stored.
    pub fn contains(&self, asset_id: &str) -> bool {
        self.assets.lock().unwrap().contains(asset_id)
    }

    /// All delete calls so far, in call order.
    pub fn calls(&self) -> Vec<DeleteCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Ids passed to delete, in call order.
    pub fn deleted_ids(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.asset_id.clone())
            .collect()
    }
}

#[async_trait]
impl AssetStore for InMemoryAssetStore {
    async fn delete_asset(&self, asset_id: &str, asset_kind: &str) -> Result<()> {
        self.calls.lock().unwrap().push(DeleteCall {
            asset_id: asset_id.to_string(),
            asset_kind: asset_kind.to_string(),
        });

        if let Some(delay) = self.behavior.stalls.get(asset_id) {
            tokio::time::sleep(*delay).await;
        }

        if let Some(message) = self.behavior.failures.get(asset_id) {
            return Err(Error::AssetStore(message.clone()));
        }

        let existed = self.assets.lock().unwrap().remove(asset_id);
        debug!(asset_id, asset_kind, existed, "asset_store: in-memory delete");
        Ok(())
    }
}
