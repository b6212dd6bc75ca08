// =============================================================================
// Indicator Frame — OHLCV series augmented with every derived column
// =============================================================================
//
// Each column is produced by an independent pure function from the sibling
// modules; this file only assembles them and exposes the latest row.
// =============================================================================

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::adx::adx_series;
use super::atr::atr_series;
use super::bollinger::bollinger_series;
use super::ema::ema_series;
use super::macd::macd_series;
use super::rsi::rsi_series;
use crate::error::AnalysisError;
use crate::market_data::OhlcvSeries;

pub const EMA_PERIOD: usize = 20;
pub const ADX_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const RSI_PERIOD: usize = 14;
pub const BB_PERIOD: usize = 20;
pub const BB_NUM_STD: f64 = 2.0;
pub const ATR_PERIOD: usize = 14;

/// An OHLCV series with its derived indicator columns, all of length
/// `series.len()`.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    pub series: Arc<OhlcvSeries>,
    pub ema_20: Vec<f64>,
    pub adx: Vec<f64>,
    pub macd: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub rsi: Vec<f64>,
    pub bb_upper: Vec<f64>,
    pub bb_middle: Vec<f64>,
    pub bb_lower: Vec<f64>,
    pub atr: Vec<f64>,
}

/// Values of every column at a single index.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRow {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub volume: f64,
    pub ema_20: f64,
    pub adx: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub rsi: f64,
    pub bb_upper: f64,
    pub bb_middle: f64,
    pub bb_lower: f64,
    pub atr: f64,
    /// Mean volume of all bars up to and including this one.
    pub mean_volume: f64,
}

impl IndicatorFrame {
    /// Compute every indicator column for `series`.
    ///
    /// Short series are not an error: columns simply stay `NaN` where their
    /// lookback is not yet satisfied.
    pub fn compute(series: Arc<OhlcvSeries>) -> Result<Self, AnalysisError> {
        let close = series.closes();
        let high = series.highs();
        let low = series.lows();

        let macd = macd_series(&close, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
        let bands = bollinger_series(&close, BB_PERIOD, BB_NUM_STD);

        let frame = Self {
            ema_20: ema_series(&close, EMA_PERIOD),
            adx: adx_series(&high, &low, &close, ADX_PERIOD),
            macd: macd.line,
            macd_signal: macd.signal,
            rsi: rsi_series(&close, RSI_PERIOD),
            bb_upper: bands.upper,
            bb_middle: bands.middle,
            bb_lower: bands.lower,
            atr: atr_series(&high, &low, &close, ATR_PERIOD),
            series,
        };
        frame.check_alignment()?;
        Ok(frame)
    }

    fn check_alignment(&self) -> Result<(), AnalysisError> {
        let n = self.series.len();
        let columns: [(&str, usize); 9] = [
            ("EMA_20", self.ema_20.len()),
            ("ADX", self.adx.len()),
            ("MACD", self.macd.len()),
            ("MACD_signal", self.macd_signal.len()),
            ("RSI", self.rsi.len()),
            ("BB_upper", self.bb_upper.len()),
            ("BB_middle", self.bb_middle.len()),
            ("BB_lower", self.bb_lower.len()),
            ("ATR", self.atr.len()),
        ];
        match columns.iter().find(|(_, len)| *len != n) {
            Some((name, len)) => Err(AnalysisError::computation(format!(
                "{name} column has {len} rows, series has {n}"
            ))),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Row at `idx`, or `None` when out of range.
    pub fn row(&self, idx: usize) -> Option<FrameRow> {
        let candle = self.series.candles().get(idx)?;
        let volumes = self.series.volumes();
        let window = &volumes[..=idx];
        let mean_volume = window.iter().sum::<f64>() / window.len() as f64;

        Some(FrameRow {
            timestamp: candle.timestamp,
            close: candle.close,
            volume: candle.volume,
            ema_20: self.ema_20[idx],
            adx: self.adx[idx],
            macd: self.macd[idx],
            macd_signal: self.macd_signal[idx],
            rsi: self.rsi[idx],
            bb_upper: self.bb_upper[idx],
            bb_middle: self.bb_middle[idx],
            bb_lower: self.bb_lower[idx],
            atr: self.atr[idx],
            mean_volume,
        })
    }

    /// The most recent row, or `None` for an empty series.
    pub fn latest(&self) -> Option<FrameRow> {
        self.len().checked_sub(1).and_then(|idx| self.row(idx))
    }
}
