// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================

/// Rolling arithmetic mean of `values` over `period`, aligned with the input.
///
/// The first `period - 1` entries are `NaN`. Any window containing a
/// non-finite value yields `NaN` for that position.
pub fn sma_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    if period == 0 || values.len() < period {
        return result;
    }

    let period_f = period as f64;
    for (end, window) in values.windows(period).enumerate() {
        let mean = window.iter().sum::<f64>() / period_f;
        result[end + period - 1] = if mean.is_finite() { mean } else { f64::NAN };
    }
    result
}
