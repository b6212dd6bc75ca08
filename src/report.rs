// =============================================================================
// Pair Report — displayable outcome of one pair in one analysis pass
// =============================================================================
//
// Every pair ends a pass with exactly one report, whatever happened: a signal,
// no data, or a computation error. The dashboard renders reports as cards and
// never has to deal with a missing pair.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AnalysisError;
use crate::indicators::FrameRow;
use crate::strategy::Classification;
use crate::types::{Signal, Trend};

const NO_DATA_LABEL: &str = "⚠ No data available";
const NO_DATA_COLOR: &str = "#808080";
const ERROR_COLOR: &str = "#FF0000";

/// What happened to a pair during the pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PairStatus {
    Signal {
        signal: Signal,
        #[serde(skip_serializing_if = "Option::is_none")]
        trend: Option<Trend>,
    },
    NoData,
    Error {
        message: String,
    },
}

/// Latest-row values shown next to the card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub as_of: DateTime<Utc>,
    pub bars: usize,
    pub close: f64,
    pub ema_20: f64,
    pub adx: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub rsi: f64,
    pub bb_upper: f64,
    pub bb_middle: f64,
    pub bb_lower: f64,
    pub atr: f64,
    pub volume: f64,
    pub mean_volume: f64,
}

impl IndicatorSnapshot {
    pub fn from_row(row: &FrameRow, bars: usize) -> Self {
        Self {
            as_of: row.timestamp,
            bars,
            close: row.close,
            ema_20: row.ema_20,
            adx: row.adx,
            macd: row.macd,
            macd_signal: row.macd_signal,
            rsi: row.rsi,
            bb_upper: row.bb_upper,
            bb_middle: row.bb_middle,
            bb_lower: row.bb_lower,
            atr: row.atr,
            volume: row.volume,
            mean_volume: row.mean_volume,
        }
    }
}

/// One line of the secondary listing: RSI, MACD and volume to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorLine {
    pub symbol: String,
    pub rsi: String,
    pub macd: String,
    pub volume: String,
}

impl std::fmt::Display for IndicatorLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - RSI: {}, MACD: {}, Volume: {}",
            self.symbol, self.rsi, self.macd, self.volume
        )
    }
}

/// Per-pair result of a pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairReport {
    pub symbol: String,
    pub status: PairStatus,
    pub label: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicators: Option<IndicatorSnapshot>,
    pub evaluated_at: DateTime<Utc>,
}

impl PairReport {
    pub fn signal(
        symbol: impl Into<String>,
        classification: Classification,
        indicators: IndicatorSnapshot,
    ) -> Self {
        let signal = classification.signal;
        Self {
            symbol: symbol.into(),
            status: PairStatus::Signal {
                signal,
                trend: classification.trend,
            },
            label: signal.label().to_string(),
            color: signal.color().to_string(),
            indicators: Some(indicators),
            evaluated_at: Utc::now(),
        }
    }

    pub fn no_data(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            status: PairStatus::NoData,
            label: NO_DATA_LABEL.to_string(),
            color: NO_DATA_COLOR.to_string(),
            indicators: None,
            evaluated_at: Utc::now(),
        }
    }

    pub fn error(symbol: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            symbol: symbol.into(),
            label: format!("❌ Error: {message}"),
            status: PairStatus::Error { message },
            color: ERROR_COLOR.to_string(),
            indicators: None,
            evaluated_at: Utc::now(),
        }
    }

    /// Map a failed analysis onto its display state.
    pub fn from_error(symbol: impl Into<String>, err: &AnalysisError) -> Self {
        match err {
            AnalysisError::NoData(_) => Self::no_data(symbol),
            AnalysisError::Computation(msg) => Self::error(symbol, msg.clone()),
        }
    }

    pub fn signal_value(&self) -> Option<Signal> {
        match self.status {
            PairStatus::Signal { signal, .. } => Some(signal),
            _ => None,
        }
    }

    /// Listing line, only for pairs that produced indicator values.
    pub fn indicator_line(&self) -> Option<IndicatorLine> {
        let snap = self.indicators.as_ref()?;
        Some(IndicatorLine {
            symbol: self.symbol.clone(),
            rsi: format!("{:.2}", snap.rsi),
            macd: format!("{:.2}", snap.macd),
            volume: format!("{:.2}", snap.volume),
        })
    }
}
