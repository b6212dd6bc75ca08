// =============================================================================
// Average True Range (ATR) — Wilder's Smoothing Method
// =============================================================================
//
// ATR measures market volatility by decomposing the entire range of a bar.
//
// True Range (TR) for each bar:
//   TR = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR is then the smoothed average of TR using Wilder's method:
//   ATR_0   = SMA of first `period` TR values
//   ATR_t   = (ATR_{t-1} * (period - 1) + TR_t) / period
//
// Default period: 14
// =============================================================================

/// True Range of each bar against the previous close.
///
/// Index 0 has no predecessor and is `NaN`; the output is aligned with the
/// inputs. Inputs are assumed to have equal length (shortest wins otherwise).
pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    let n = high.len().min(low.len()).min(close.len());
    let mut tr = vec![f64::NAN; n];
    for i in 1..n {
        let prev_close = close[i - 1];
        // f64::max swallows NaN, so undefined inputs are checked up front.
        if !(high[i].is_finite() && low[i].is_finite() && prev_close.is_finite()) {
            continue;
        }
        tr[i] =(high[i] - low[i])
            .max((high[i] - prev_close).abs())
            .max((low[i] - prev_close).abs());
    }
    tr
}

/// Compute the ATR series, aligned index-for-index with the inputs.
///
/// The first defined value sits at index `period` (it needs `period` TR
/// values, each of which needs a previous bar). Everything before is `NaN`.
///
/// # Edge cases
/// - `period == 0` or fewer than `period + 1` bars => all `NaN`
/// - a non-finite intermediate value ends the series
pub fn atr_series(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<f64> {
    let tr = true_range(high, low, close);
    let mut result = vec![f64::NAN; tr.len()];
    if period == 0 || tr.len() < period + 1 {
        return result;
    }

    // --- Seed ATR with SMA of first `period` TR values -----------------------
    let seed: f64 = tr[1..=period].iter().sum::<f64>() / period as f64;
    if !seed.is_finite() {
        return result;
    }
    result[period] = seed;

    // --- Wilder's smoothing for remaining TR values --------------------------
    let period_f = period as f64;
    let mut atr = seed;
    for i in (period + 1)..tr.len() {
        atr = (atr * (period_f - 1.0) + tr[i]) / period_f;
        if !atr.is_finite() {
            break;
        }
        result[i] = atr;
    }

    result
}
