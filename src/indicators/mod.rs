// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators the signal board
// uses. Every function takes flat slices and returns a `Vec<f64>` aligned
// index-for-index with its input, with `NaN` wherever the lookback window is
// not yet satisfied.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod frame;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use frame::{FrameRow, IndicatorFrame};
