pub mod cache;
pub mod series;
pub mod yahoo;

use std::sync::Arc;

use async_trait::async_trait;

pub use cache::CachedProvider;
pub use series::{OhlcvSeries, RawBar};
pub use yahoo::YahooClient;

/// Source of OHLCV bars for one symbol.
///
/// Implementations are fail-soft: any transport, status, parse, or timeout
/// problem is logged and reported as `None`, never as an error.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch(&self, symbol: &str) -> Option<Arc<OhlcvSeries>>;

    /// Drop any cached responses. Providers without a cache do nothing.
    fn invalidate(&self) {}
}
