//! Best-effort deletion of remote assets.
//!
//! Every reference gets exactly one delete call. A failure or timeout is
//! recorded in the [`PurgeReport`] and logged; it never aborts the other
//! deletions and never becomes an error for the caller.

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::defaults;
use crate::error::Error;
use crate::models::MediaReference;
use crate::traits::AssetStore;

/// Fan-out and deadline settings for a purge.
#[derive(Debug, Clone)]
pub struct PurgeOptions {
    /// Maximum delete calls in flight. Zero is treated as one.
    pub concurrency: usize,
    /// Deadline for each delete call.
    pub call_timeout: Duration,
}

impl Default for PurgeOptions {
    fn default() -> Self {
        Self {
            concurrency: defaults::PURGE_CONCURRENCY,
            call_timeout: Duration::from_secs(defaults::ASSET_DELETE_TIMEOUT_SECS),
        }
    }
}

impl PurgeOptions {
    /// Options from `ASSET_PURGE_CONCURRENCY` and `ASSET_DELETE_TIMEOUT_SECS`,
    /// falling back to the defaults for unset, unparsable or zero values.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`PurgeOptions::from_env`] with `lookup` resolving variable names.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let positive = |name: &str| {
            lookup(name)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|n| *n > 0)
        };

        let fallback = Self::default();
        Self {
            concurrency: positive("ASSET_PURGE_CONCURRENCY")
                .map(|n| n as usize)
                .unwrap_or(fallback.concurrency),
            call_timeout: positive("ASSET_DELETE_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(fallback.call_timeout),
        }
    }
}

/// An asset whose deletion failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeFailure {
    pub asset_id: String,
    pub asset_kind: String,
    pub error: String,
}

/// Outcome of a purge, for logging and diagnostics only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeReport {
    /// Asset ids deleted, in input order.
    pub succeeded: Vec<String>,
    /// Failed deletions, in input order.
    pub failed: Vec<PurgeFailure>,
    /// URLs of references that had no asset id and were not sent to the store.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl PurgeReport {
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    /// True when every attempted deletion succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Delete every referenced asset from `store`.
pub async fn purge(
    references: &[MediaReference],
    store: &dyn AssetStore,
    options: &PurgeOptions,
) -> PurgeReport {
    let start = Instant::now();
    let mut report = PurgeReport::default();

    let (registered, unregistered): (Vec<&MediaReference>, Vec<&MediaReference>) =
        references.iter().partition(|r| r.is_registered());
    for reference in unregistered {
        debug!(url = %reference.url, "purge: reference has no asset id, skipped");
        report.skipped.push(reference.url.clone());
    }

    let call_timeout = options.call_timeout;
    let outcomes: Vec<(&MediaReference, Result<(), Error>)> = stream::iter(registered)
        .map(|reference| async move {
            let call = store.delete_asset(reference.asset_id(), reference.asset_kind());
            let outcome = match tokio::time::timeout(call_timeout, call).await {
                Ok(result) => result,
                Err(_) => Err(Error::Timeout(call_timeout.as_millis() as u64)),
            };
            (reference, outcome)
        })
        .buffered(options.concurrency.max(1))
        .collect()
        .await;

    for (reference, outcome) in outcomes {
        match outcome {
            Ok(()) => {
                debug!(
                    asset_id = reference.asset_id(),
                    asset_kind = reference.asset_kind(),
                    "purge: asset deleted"
                );
                report.succeeded.push(reference.asset_id().to_string());
            }
            Err(e) => {
                warn!(
                    asset_id = reference.asset_id(),
                    asset_kind = reference.asset_kind(),
                    error = %e,
                    "purge: failed to delete asset"
                );
                report.failed.push(PurgeFailure {
                    asset_id: reference.asset_id().to_string(),
                    asset_kind: reference.asset_kind().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        reference_count = references.len(),
        success_count = report.success_count(),
        failure_count = report.failure_count(),
        duration_ms = start.elapsed().as_millis() as u64,
        "purge: complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::models::MediaKind;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<(String, String)>>,
        fail: HashSet<String>,
        stall: HashSet<String>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl AssetStore for RecordingStore {
        async fn delete_asset(&self, asset_id: &str, asset_kind: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((asset_id.to_string(), asset_kind.to_string()));
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            if self.stall.contains(asset_id) {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if self.fail.contains(asset_id) {
                return Err(Error::AssetStore(format!("cannot delete {asset_id}")));
            }
            Ok(())
        }
    }

    fn registered(id: &str) -> MediaReference {
        MediaReference::new(MediaKind::Image, format!("https://x/{id}.png")).with_asset(id, "image")
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_others() {
        let store = RecordingStore {
            fail: HashSet::from(["b".to_string()]),
            ..Default::default()
        };
        let refs = vec![registered("a"), registered("b"), registered("c")];

        let report = purge(&refs, &store, &PurgeOptions::default()).await;

        assert_eq!(store.calls.lock().unwrap().len(), 3);
        assert_eq!(report.succeeded, vec!["a", "c"]);
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.failed[0].asset_id, "b");
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn test_passes_effective_asset_kind() {
        let store = RecordingStore::default();
        let refs = vec![MediaReference::new(MediaKind::Audio, "u").with_asset("a", "")];

        purge(&refs, &store, &PurgeOptions::default()).await;

        assert_eq!(
            store.calls.lock().unwrap().clone(),
            vec![("a".to_string(), "auto".to_string())]
        );
    }

    #[tokio::test]
    async fn test_unregistered_references_are_skipped() {
        let store = RecordingStore::default();
        let refs = vec![MediaReference::new(MediaKind::Image, "https://elsewhere/a.png")];

        let report = purge(&refs, &store, &PurgeOptions::default()).await;

        assert!(store.calls.lock().unwrap().is_empty());
        assert_eq!(report.skipped, vec!["https://elsewhere/a.png"]);
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let store = RecordingStore::default();
        let refs: Vec<_> = (0..10).map(|i| registered(&format!("id{i}"))).collect();
        let options = PurgeOptions {
            concurrency: 3,
            ..Default::default()
        };

        let report = purge(&refs, &store, &options).await;

        assert_eq!(report.success_count(), 10);
        assert!(store.max_in_flight.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_zero_concurrency_runs_sequentially() {
        let store = RecordingStore::default();
        let refs = vec![registered("a"), registered("b")];
        let options = PurgeOptions {
            concurrency: 0,
            ..Default::default()
        };

        let report = purge(&refs, &store, &options).await;

        assert_eq!(report.success_count(), 2);
        assert_eq!(store.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_failure() {
        let store = RecordingStore {
            stall: HashSet::from(["slow".to_string()]),
            ..Default::default()
        };
        let refs = vec![registered("slow"), registered("fast")];
        let options = PurgeOptions {
            concurrency: 2,
            call_timeout: Duration::from_secs(5),
        };

        let report = purge(&refs, &store, &options).await;

        assert_eq!(report.succeeded, vec!["fast"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].asset_id, "slow");
        assert!(report.failed[0].error.contains("Timed out"));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let store = RecordingStore::default();
        let report = purge(&[], &store, &PurgeOptions::default()).await;
        assert_eq!(report, PurgeReport::default());
    }

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_options_from_lookup_overrides() {
        let options = PurgeOptions::from_lookup(lookup(&[
            ("ASSET_PURGE_CONCURRENCY", "8"),
            ("ASSET_DELETE_TIMEOUT_SECS", "12"),
        ]));
        assert_eq!(options.concurrency, 8);
        assert_eq!(options.call_timeout, Duration::from_secs(12));
    }

    #[test]
    fn test_options_zero_timeout_falls_back_to_default() {
        let options = PurgeOptions::from_lookup(lookup(&[
            ("ASSET_PURGE_CONCURRENCY", "0"),
            ("ASSET_DELETE_TIMEOUT_SECS", "0"),
        ]));
        let defaults = PurgeOptions::default();
        assert_eq!(options.concurrency, defaults.concurrency);
        assert_eq!(options.call_timeout, defaults.call_timeout);
        assert!(options.call_timeout > Duration::ZERO);
    }

    #[test]
    fn test_options_unparsable_values_fall_back() {
        let options = PurgeOptions::from_lookup(lookup(&[("ASSET_DELETE_TIMEOUT_SECS", "soon")]));
        assert_eq!(options.call_timeout, Duration::from_secs(5));
    }
}
