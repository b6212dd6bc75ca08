// =============================================================================
// RSI (Wilder)
// =============================================================================
//
// Gains and losses over the first `period` deltas are averaged to seed the
// series. Each later bar folds its gain/loss into the running averages with
// weight 1/period, and the value is 100 - 100 / (1 + gain/loss).
// =============================================================================

/// Compute the RSI of `closes`, aligned index-for-index with the input.
///
/// The first `period` entries are `NaN` (they are consumed to produce the
/// first `period` deltas); the first defined RSI sits at index `period`.
///
/// # Edge cases
/// - `period == 0` or `closes.len() < period + 1` => all `NaN`
/// - average loss of zero (no down moves) => 100.0
/// - no movement at all => 0.0 (matches TA-Lib's RSI)
/// - a non-finite result ends the series; later entries are `NaN`
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return result;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    // Seed window.
    let (sum_gain, sum_loss) = deltas[..period].iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
        if d > 0.0 {
            (g + d, l)
        } else {
            (g, l + d.abs())
        }
    });

    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    match rsi_from_averages(avg_gain, avg_loss) {
        Some(rsi) => result[period] = rsi,
        None => return result,
    }

    // deltas[i - 1] is the change into closes[i].
    for i in (period + 1)..closes.len() {
        let delta = deltas[i - 1];
        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { delta.abs() } else { 0.0 };

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;

        match rsi_from_averages(avg_gain, avg_loss) {
            Some(rsi) => result[i] = rsi,
            None => break,
        }
    }

    result
}

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 && avg_gain == 0.0 {
        0.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    if rsi.is_finite() {
        Some(rsi)
    } else {
        None
    }
}
