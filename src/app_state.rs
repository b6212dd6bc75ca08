// =============================================================================
// Central Application State — FX Signal Board
// =============================================================================
//
// Ties the configuration, the cached provider and the latest pass together for
// the HTTP handlers.
//
// Thread safety:
//   - Atomic counter for lock-free version tracking.
//   - parking_lot::RwLock for the latest snapshot.
//   - tokio Mutex serialising passes, so two refresh requests never interleave
//     their fetches.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use crate::market_data::MarketDataProvider;
use crate::pipeline::{run_pass, PassResult};
use crate::report::{IndicatorLine, PairReport};
use crate::runtime_config::RuntimeConfig;

/// Everything the dashboard shows, as of one pass.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub state_version: u64,
    pub pass_id: String,
    pub generated_at: DateTime<Utc>,
    pub reports: Vec<PairReport>,
}

impl DashboardSnapshot {
    fn from_pass(pass: PassResult, state_version: u64) -> Self {
        Self {
            state_version,
            pass_id: pass.pass_id,
            generated_at: pass.generated_at,
            reports: pass.reports,
        }
    }

    /// Secondary listing rows, for pairs that produced indicator values.
    pub fn indicator_lines(&self) -> Vec<IndicatorLine> {
        self.reports.iter().filter_map(PairReport::indicator_line).collect()
    }
}

/// Central application state shared across handlers via `Arc<AppState>`.
pub struct AppState {
    /// Incremented every time a new snapshot is published.
    pub state_version: AtomicU64,

    pub runtime_config: RuntimeConfig,

    pub provider: Arc<dyn MarketDataProvider>,

    latest: RwLock<Option<Arc<DashboardSnapshot>>>,

    pass_lock: Mutex<()>,
}

impl AppState {
    pub fn new(config: RuntimeConfig, provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            state_version: AtomicU64::new(0),
            runtime_config: config,
            provider,
            latest: RwLock::new(None),
            pass_lock: Mutex::new(()),
        }
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    pub fn latest_snapshot(&self) -> Option<Arc<DashboardSnapshot>> {
        self.latest.read().clone()
    }

    /// Run a pass over every configured pair and publish it.
    pub async fn recompute(&self) -> Arc<DashboardSnapshot> {
        let _guard = self.pass_lock.lock().await;
        self.publish_pass().await
    }

    /// Latest snapshot, computing the first one on demand. Concurrent first
    /// requests share a single pass.
    pub async fn snapshot_or_compute(&self) -> Arc<DashboardSnapshot> {
        if let Some(snapshot) = self.latest_snapshot() {
            return snapshot;
        }
        let _guard = self.pass_lock.lock().await;
        if let Some(snapshot) = self.latest_snapshot() {
            return snapshot;
        }
        self.publish_pass().await
    }

    /// Manual refresh: drop cached provider responses, then recompute. Both
    /// steps happen under the pass lock.
    pub async fn refresh(&self) -> Arc<DashboardSnapshot> {
        let _guard = self.pass_lock.lock().await;
        info!("manual refresh requested, clearing fetch cache");
        self.provider.invalidate();
        self.publish_pass().await
    }

    /// Caller must hold `pass_lock`.
    async fn publish_pass(&self) -> Arc<DashboardSnapshot> {
        let pass = run_pass(self.provider.as_ref(), &self.runtime_config.symbols).await;
        let version = self.state_version.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = Arc::new(DashboardSnapshot::from_pass(pass, version));
        *self.latest.write() = Some(snapshot.clone());
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::OhlcvSeries;
    use crate::report::PairStatus;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct EmptyProvider {
        invalidations: AtomicUsize,
    }

    #[async_trait]
    impl MarketDataProvider for EmptyProvider {
        async fn fetch(&self, _symbol: &str) -> Option<Arc<OhlcvSeries>> {
            None
        }

        fn invalidate(&self) {
            self.invalidations.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn state() -> (AppState, Arc<EmptyProvider>) {
        let provider = Arc::new(EmptyProvider::default());
        let config = RuntimeConfig {
            symbols: vec!["EURUSD=X".into(), "GBPUSD=X".into()],
            ..RuntimeConfig::default()
        };
        (AppState::new(config, provider.clone()), provider)
    }

    #[tokio::test]
    async fn first_snapshot_is_computed_on_demand() {
        let (state, _) = state();
        assert!(state.latest_snapshot().is_none());
        let snap = state.snapshot_or_compute().await;
        assert_eq!(snap.state_version, 1);
        assert_eq!(snap.reports.len(), 2);
        assert!(snap.reports.iter().all(|r| r.status == PairStatus::NoData));
        assert!(snap.indicator_lines().is_empty());

        // Second call reuses the published snapshot.
        let again = state.snapshot_or_compute().await;
        assert_eq!(again.pass_id, snap.pass_id);
    }

    #[tokio::test]
    async fn refresh_invalidates_and_bumps_version() {
        let (state, provider) = state();
        state.recompute().await;
        let snap = state.refresh().await;
        assert_eq!(snap.state_version, 2);
        assert_eq!(state.current_state_version(), 2);
        assert_eq!(provider.invalidations.load(Ordering::SeqCst), 1);
    }

    /// Records fetch/invalidate calls in order; each fetch yields to the
    /// runtime so other tasks get a chance to interleave.
    #[derive(Default)]
    struct RecordingProvider {
        events: parking_lot::Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl MarketDataProvider for RecordingProvider {
        async fn fetch(&self, _symbol: &str) -> Option<Arc<OhlcvSeries>> {
            self.events.lock().push("fetch");
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            None
        }

        fn invalidate(&self) {
            self.events.lock().push("invalidate");
        }
    }

    fn recording_state() -> (AppState, Arc<RecordingProvider>) {
        let provider = Arc::new(RecordingProvider::default());
        let config = RuntimeConfig {
            symbols: vec!["EURUSD=X".into(), "GBPUSD=X".into()],
            ..RuntimeConfig::default()
        };
        (AppState::new(config, provider.clone()), provider)
    }

    #[tokio::test]
    async fn concurrent_first_requests_share_one_pass() {
        let (state, provider) = recording_state();
        let (a, b) = tokio::join!(state.snapshot_or_compute(), state.snapshot_or_compute());
        assert_eq!(a.pass_id, b.pass_id);
        assert_eq!(state.current_state_version(), 1);
        assert_eq!(provider.events.lock().len(), 2);
    }

    #[tokio::test]
    async fn refresh_waits_for_in_flight_pass_before_clearing() {
        let (state, provider) = recording_state();
        let (first, refreshed) = tokio::join!(state.recompute(), state.refresh());
        assert_eq!(first.state_version, 1);
        assert_eq!(refreshed.state_version, 2);
        assert_eq!(
            *provider.events.lock(),
            vec!["fetch", "fetch", "invalidate", "fetch", "fetch"]
        );
    }
}
