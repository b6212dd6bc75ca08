// =============================================================================
// Signal Classifier
// =============================================================================
//
// Turns the latest indicator row of one pair into a discrete signal.
//
// Decision table (first match wins):
//   1. trend = Bullish if close > EMA_20, else Bearish
//   2. Bullish, RSI > 40, MACD > signal, volume > 0.2 * mean  => BuyFast
//   3. Bullish, RSI > 45, MACD > signal, volume > 0.3 * mean  => BuySlow
//   4. Bearish, RSI < 60, MACD < signal, volume > 0.2 * mean  => SellFast
//   5. Bearish, RSI < 55, MACD < signal, volume > 0.3 * mean  => SellSlow
//   6. otherwise                                              => Wait
//
// Rule 2 shadows rule 3 and rule 4 shadows rule 5 for most inputs. The table
// is kept exactly as written since reordering it changes the emitted signals.
// Any undefined input short-circuits to InsufficientData.
// =============================================================================

use serde::Serialize;

use crate::indicators::FrameRow;
use crate::types::{Signal, Trend};

const FAST_BUY_RSI_MIN: f64 = 40.0;
const SLOW_BUY_RSI_MIN: f64 = 45.0;
const FAST_SELL_RSI_MAX: f64 = 60.0;
const SLOW_SELL_RSI_MAX: f64 = 55.0;
const FAST_VOLUME_RATIO: f64 = 0.2;
const SLOW_VOLUME_RATIO: f64 = 0.3;

/// The numbers the decision table looks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifierInput {
    pub close: f64,
    pub ema_20: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub rsi: f64,
    pub volume: f64,
    pub mean_volume: f64,
}

impl ClassifierInput {
    pub fn from_row(row: &FrameRow) -> Self {
        Self {
            close: row.close,
            ema_20: row.ema_20,
            macd: row.macd,
            macd_signal: row.macd_signal,
            rsi: row.rsi,
            volume: row.volume,
            mean_volume: row.mean_volume,
        }
    }

    fn is_defined(&self) -> bool {
        [
            self.close,
            self.ema_20,
            self.macd,
            self.macd_signal,
            self.rsi,
            self.volume,
            self.mean_volume,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Classifier output. `trend` is `None` only for `InsufficientData`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub signal: Signal,
    pub trend: Option<Trend>,
}

/// Bullish iff the close is strictly above the EMA; a tie is Bearish.
pub fn trend_of(close: f64, ema_20: f64) -> Trend {
    if close > ema_20 {
        Trend::Bullish
    } else {
        Trend::Bearish
    }
}

/// Evaluate the decision table. Pure: no state is read or kept.
pub fn classify(input: &ClassifierInput) -> Classification {
    if !input.is_defined() {
        return Classification {
            signal: Signal::InsufficientData,
            trend: None,
        };
    }

    let trend = trend_of(input.close, input.ema_20);
    let fast_volume = input.volume > FAST_VOLUME_RATIO * input.mean_volume;
    let slow_volume = input.volume > SLOW_VOLUME_RATIO * input.mean_volume;
    let macd_above = input.macd > input.macd_signal;
    let macd_below = input.macd < input.macd_signal;

    let signal = match trend {
        Trend::Bullish if input.rsi > FAST_BUY_RSI_MIN && macd_above && fast_volume => {
            Signal::BuyFast
        }
        Trend::Bullish if input.rsi > SLOW_BUY_RSI_MIN && macd_above && slow_volume => {
            Signal::BuySlow
        }
        Trend::Bearish if input.rsi < FAST_SELL_RSI_MAX && macd_below && fast_volume => {
            Signal::SellFast
        }
        Trend::Bearish if input.rsi < SLOW_SELL_RSI_MAX && macd_below && slow_volume => {
            Signal::SellSlow
        }
        _ => Signal::Wait,
    };

    Classification {
        signal,
        trend: Some(trend),
    }
}
