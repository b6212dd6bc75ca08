// =============================================================================
// Analysis Pipeline — fetch → compute → classify, one pair at a time
// =============================================================================
//
// Pairs are processed sequentially in configured order and never share state.
// A pair that has no data or fails to compute gets a report describing that,
// and the pass moves on to the next pair.
// =============================================================================

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::indicators::IndicatorFrame;
use crate::market_data::{MarketDataProvider, OhlcvSeries};
use crate::report::{IndicatorSnapshot, PairReport};
use crate::strategy::{classify, ClassifierInput};

/// Results of one full pass over every configured pair.
#[derive(Debug, Clone, Serialize)]
pub struct PassResult {
    pub pass_id: String,
    pub generated_at: DateTime<Utc>,
    pub reports: Vec<PairReport>,
}

/// Compute indicators for `series` and classify its latest row.
pub fn evaluate_series(series: Arc<OhlcvSeries>) -> Result<PairReport, AnalysisError> {
    let symbol = series.symbol().to_string();
    let frame = IndicatorFrame::compute(series)?;
    let row = frame
        .latest()
        .ok_or_else(|| AnalysisError::computation("series has no rows"))?;

    let classification = classify(&ClassifierInput::from_row(&row));
    let snapshot = IndicatorSnapshot::from_row(&row, frame.len());
    Ok(PairReport::signal(symbol, classification, snapshot))
}

/// Run the full pipeline for one symbol.
pub async fn analyze_pair(provider: &dyn MarketDataProvider, symbol: &str) -> Result<PairReport, AnalysisError> {
    let series = provider
        .fetch(symbol)
        .await
        .ok_or_else(|| AnalysisError::NoData(symbol.to_string()))?;
    debug!(symbol, bars = series.len(), "series ready for analysis");
    evaluate_series(series)
}

/// Analyze every symbol in order. Always returns one report per symbol.
pub async fn run_pass(provider: &dyn MarketDataProvider, symbols: &[String]) -> PassResult {
    let pass_id = Uuid::new_v4().to_string();
    info!(pass_id = %pass_id, pairs = symbols.len(), "analysis pass starting");

    let mut reports = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let report = match analyze_pair(provider, symbol).await {
            Ok(report) => {
                if let Some(signal) = report.signal_value() {
                    if signal.is_actionable() {
                        info!(symbol = %symbol, signal = %signal, "actionable signal");
                    } else {
                        debug!(symbol = %symbol, signal = %signal, "no entry");
                    }
                }
                report
            }
            Err(AnalysisError::NoData(_)) => {
                info!(symbol = %symbol, "no data available");
                PairReport::no_data(symbol.as_str())
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "analysis failed");
                PairReport::from_error(symbol.as_str(), &e)
            }
        };
        reports.push(report);
    }

    info!(pass_id = %pass_id, "analysis pass complete");
    PassResult {
        pass_id,
        generated_at: Utc::now(),
        reports,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::series::Candle;
    use crate::report::PairStatus;
    use crate::types::Signal;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::HashMap;

    /// Provider serving canned series; unknown symbols have no data.
    struct StubProvider {
        series: HashMap<String, Arc<OhlcvSeries>>,
    }

    #[async_trait]
    impl MarketDataProvider for StubProvider {
        async fn fetch(&self, symbol: &str) -> Option<Arc<OhlcvSeries>> {
            self.series.get(symbol).cloned()
        }
    }

    fn trending_series(symbol: &str, n: usize, step: f64) -> Arc<OhlcvSeries> {
        let candles = (0..n)
            .map(|i| {
                // Accelerating drift keeps the MACD line away from its signal.
                let close = 1.10 + step * (i * i) as f64 * 0.01;
                Candle {
                    timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64 * 900, 0).unwrap(),
                    open: close,
                    high: close + 0.0004,
                    low: close - 0.0004,
                    close,
                    volume: 1_000.0,
                }
            })
            .collect();
        Arc::new(OhlcvSeries::from_candles(symbol, candles))
    }

    fn stub(entries: Vec<Arc<OhlcvSeries>>) -> StubProvider {
        StubProvider {
            series: entries
                .into_iter()
                .map(|s| (s.symbol().to_string(), s))
                .collect(),
        }
    }

    #[test]
    fn rising_market_with_volume_buys() {
        let report = evaluate_series(trending_series("EURUSD=X", 200, 0.0001)).unwrap();
        assert_eq!(report.signal_value(), Some(Signal::BuyFast));
        let snap = report.indicators.unwrap();
        assert_eq!(snap.bars, 200);
        assert!(snap.rsi > 40.0);
    }

    #[test]
    fn falling_market_with_volume_sells() {
        let report = evaluate_series(trending_series("GBPUSD=X", 200, -0.0001)).unwrap();
        assert_eq!(report.signal_value(), Some(Signal::SellFast));
    }

    #[test]
    fn short_history_is_insufficient_data() {
        let report = evaluate_series(trending_series("USDJPY=X", 20, 0.0001)).unwrap();
        assert_eq!(report.signal_value(), Some(Signal::InsufficientData));
    }

    #[test]
    fn empty_series_is_a_computation_error() {
        let empty = Arc::new(OhlcvSeries::from_candles("AUDUSD=X", Vec::new()));
        let err = evaluate_series(empty).unwrap_err();
        assert!(matches!(err, AnalysisError::Computation(_)));
    }

    #[tokio::test]
    async fn missing_symbol_is_no_data() {
        let provider = stub(vec![]);
        let err = analyze_pair(&provider, "USDCAD=X").await.unwrap_err();
        assert_eq!(err, AnalysisError::NoData("USDCAD=X".into()));
    }

    #[tokio::test]
    async fn pass_continues_past_failing_pairs() {
        let provider = stub(vec![
            trending_series("EURUSD=X", 200, 0.0001),
            Arc::new(OhlcvSeries::from_candles("AUDUSD=X", Vec::new())),
            trending_series("USDCHF=X", 200, -0.0001),
        ]);
        let symbols: Vec<String> = ["EURUSD=X", "NZDUSD=X", "AUDUSD=X", "USDCHF=X"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let pass = run_pass(&provider, &symbols).await;
        assert_eq!(pass.reports.len(), 4);

        let order: Vec<&str> = pass.reports.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, vec!["EURUSD=X", "NZDUSD=X", "AUDUSD=X", "USDCHF=X"]);

        assert_eq!(pass.reports[0].signal_value(), Some(Signal::BuyFast));
        assert_eq!(pass.reports[1].status, PairStatus::NoData);
        assert!(matches!(pass.reports[2].status, PairStatus::Error { .. }));
        assert_eq!(pass.reports[3].signal_value(), Some(Signal::SellFast));
        assert!(!pass.pass_id.is_empty());
    }
}
