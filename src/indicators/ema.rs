// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = value_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The very first EMA value is seeded with the SMA of the first `period`
// defined values. Leading NaN inputs are skipped, which lets the same function
// smooth a series that is itself still warming up (e.g. the MACD line).
// =============================================================================

/// Compute the EMA of `values`, aligned index-for-index with the input.
///
/// Entries before the seed index are `NaN`. The seed sits at
/// `first_defined + period - 1`, where `first_defined` is the index of the
/// first finite input.
///
/// # Edge cases
/// - `period == 0` => all `NaN`
/// - fewer than `period` defined values => all `NaN`
/// - a non-finite value after the seed ends the series; later entries are `NaN`
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    if period == 0 {
        return result;
    }

    let start = match values.iter().position(|v| v.is_finite()) {
        Some(idx) => idx,
        None => return result,
    };
    let seed_idx = start + period - 1;
    if seed_idx >= values.len() {
        return result;
    }

    let window = &values[start..=seed_idx];
    if window.iter().any(|v| !v.is_finite()) {
        return result;
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut prev_ema = window.iter().sum::<f64>() / period as f64;
    result[seed_idx] = prev_ema;

    for (i, &value) in values.iter().enumerate().skip(seed_idx + 1) {
        let ema = value * multiplier + prev_ema * (1.0 - multiplier);
        if !ema.is_finite() {
            // Downstream consumers should not trust a broken series.
            break;
        }
        result[i] = ema;
        prev_ema = ema;
    }

    result
}
