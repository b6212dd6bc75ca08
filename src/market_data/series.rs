use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// A provider row before cleaning. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBar {
    pub timestamp: Option<DateTime<Utc>>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl RawBar {
    /// Promote to a [`Candle`] if every field is present and finite.
    fn complete(&self) -> Option<Candle> {
        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
        Some(Candle {
            timestamp: self.timestamp?,
            open: finite(self.open)?,
            high: finite(self.high)?,
            low: finite(self.low)?,
            close: finite(self.close)?,
            volume: finite(self.volume)?,
        })
    }
}

// ---------------------------------------------------------------------------
// OhlcvSeries -- cleaned, strictly time-ordered bars for one symbol
// ---------------------------------------------------------------------------

/// Cleaned bar series for one symbol.
///
/// Invariants: every field of every bar is finite and timestamps are strictly
/// increasing. [`OhlcvSeries::from_raw`] is the only constructor and it
/// enforces both.
#[derive(Debug, Clone, Serialize)]
pub struct OhlcvSeries {
    symbol: String,
    candles: Vec<Candle>,
}

impl OhlcvSeries {
    /// Clean provider rows: drop rows with any missing field, then drop rows
    /// whose timestamp does not strictly exceed the last kept row.
    pub fn from_raw(symbol: impl Into<String>, rows: impl IntoIterator<Item = RawBar>) -> Self {
        let symbol = symbol.into();
        let mut total = 0usize;
        let complete = rows.into_iter().filter_map(|row| {
            total += 1;
            row.complete()
        });
        let candles = Self::strictly_increasing(complete);
        debug!(
            symbol = %symbol,
            received = total,
            kept = candles.len(),
            "cleaned provider rows"
        );
        Self { symbol, candles }
    }

    /// Build from already-complete candles, enforcing the ordering and
    /// finiteness invariants.
    #[cfg(test)]
    pub fn from_candles(symbol: impl Into<String>, candles: Vec<Candle>) -> Self {
        let rows = candles.into_iter().map(|c| RawBar {
            timestamp: Some(c.timestamp),
            open: Some(c.open),
            high: Some(c.high),
            low: Some(c.low),
            close: Some(c.close),
            volume: Some(c.volume),
        });
        Self::from_raw(symbol, rows)
    }

    fn strictly_increasing(candles: impl Iterator<Item = Candle>) -> Vec<Candle> {
        let mut kept: Vec<Candle> = Vec::new();
        for candle in candles {
            match kept.last() {
                Some(last) if candle.timestamp <= last.timestamp => continue,
                _ => kept.push(candle),
            }
        }
        kept
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn raw(secs: i64, close: Option<f64>) -> RawBar {
        RawBar {
            timestamp: Some(ts(secs)),
            open: Some(1.0),
            high: Some(1.2),
            low: Some(0.9),
            close,
            volume: Some(10.0),
        }
    }

    #[test]
    fn drops_rows_with_missing_fields() {
        let series = OhlcvSeries::from_raw(
            "EURUSD=X",
            vec![raw(0, Some(1.1)), raw(900, None), raw(1800, Some(1.2))],
        );
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![1.1, 1.2]);
    }

    #[test]
    fn drops_rows_with_non_finite_fields() {
        let series = OhlcvSeries::from_raw(
            "EURUSD=X",
            vec![raw(0, Some(f64::NAN)), raw(900, Some(1.2))],
        );
        assert_eq!(series.closes(), vec![1.2]);
    }

    #[test]
    fn drops_rows_without_timestamp() {
        let mut row = raw(0, Some(1.1));
        row.timestamp = None;
        let series = OhlcvSeries::from_raw("EURUSD=X", vec![row]);
        assert!(series.is_empty());
    }

    #[test]
    fn enforces_strictly_increasing_timestamps() {
        let series = OhlcvSeries::from_raw(
            "GBPUSD=X",
            vec![
                raw(0, Some(1.0)),
                raw(900, Some(1.1)),
                raw(900, Some(1.15)), // duplicate
                raw(600, Some(1.05)), // out of order
                raw(1800, Some(1.2)),
            ],
        );
        assert_eq!(series.closes(), vec![1.0, 1.1, 1.2]);
        let stamps: Vec<_> = series.candles().iter().map(|c| c.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn column_accessors_align() {
        let series = OhlcvSeries::from_raw("USDJPY=X", vec![raw(0, Some(1.1)), raw(900, Some(1.2))]);
        assert_eq!(series.symbol(), "USDJPY=X");
        assert_eq!(series.highs(), vec![1.2, 1.2]);
        assert_eq!(series.lows(), vec![0.9, 0.9]);
        assert_eq!(series.volumes(), vec![10.0, 10.0]);
        assert_eq!(series.candles()[1].close, 1.2);
    }
}
