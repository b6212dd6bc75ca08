// =============================================================================
// Average Directional Index (ADX)
// =============================================================================
//
// ADX quantifies trend **strength** regardless of direction.
//
// Calculation pipeline:
//   1. Compute +DM (positive directional movement) and -DM per bar.
//   2. Compute True Range (TR) per bar.
//   3. Apply Wilder's smoothing (period) to +DM, -DM, and TR.
//   4. Derive +DI = smoothed(+DM) / smoothed(TR) * 100
//            -DI = smoothed(-DM) / smoothed(TR) * 100
//   5. DX  = |+DI - -DI| / (+DI + -DI) * 100
//   6. ADX = Wilder's smoothed average of DX over `period` bars.
//
// Interpretation:
//   ADX > 25  => trending market
//   ADX < 20  => ranging / choppy market
// =============================================================================

use super::atr::true_range;

/// Compute the ADX series, aligned index-for-index with the inputs.
///
/// The first DX value is available at bar `period` (after `period`
/// transitions have been summed) and the ADX seed is the mean of the first
/// `period` DX values, so the first defined ADX sits at index
/// `2 * period - 1`. Everything before is `NaN`.
///
/// # Edge cases
/// - `period == 0` or fewer than `2 * period` bars => all `NaN`
/// - a zero smoothed TR (no range at all) gives DX = 0 for that bar
/// - a non-finite value ends the series
pub fn adx_series(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<f64> {
    let n = high.len().min(low.len()).min(close.len());
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < 2 * period {
        return result;
    }

    let period_f = period as f64;

    // ------------------------------------------------------------------
    // Step 1 & 2: Raw +DM, -DM, and True Range, indexed by bar (0 unused)
    // ------------------------------------------------------------------
    let tr = true_range(high, low, close);
    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];

    for i in 1..n {
        let up_move = high[i] - high[i - 1];
        let down_move = low[i - 1] - low[i];

        if up_move > down_move && up_move > 0.0 {
            plus_dm[i] = up_move;
        }
        if down_move > up_move && down_move > 0.0 {
            minus_dm[i] = down_move;
        }
    }

    // ------------------------------------------------------------------
    // Step 3-5: Wilder's smoothing, one DX per bar from `period` onward
    // ------------------------------------------------------------------
    let mut smooth_plus_dm: f64 = plus_dm[1..=period].iter().sum();
    let mut smooth_minus_dm: f64 = minus_dm[1..=period].iter().sum();
    let mut smooth_tr: f64 = tr[1..=period].iter().sum();

    let mut dx = vec![f64::NAN; n];
    for i in period..n {
        if i > period {
            smooth_plus_dm = smooth_plus_dm - smooth_plus_dm / period_f + plus_dm[i];
            smooth_minus_dm = smooth_minus_dm - smooth_minus_dm / period_f + minus_dm[i];
            smooth_tr = smooth_tr - smooth_tr / period_f + tr[i];
        }
        match compute_dx(smooth_plus_dm, smooth_minus_dm, smooth_tr) {
            Some(value) => dx[i] = value,
            None => break,
        }
    }

    // ------------------------------------------------------------------
    // Step 6: ADX = Wilder's smoothed average of DX
    // ------------------------------------------------------------------
    let seed_idx = 2 * period - 1;
    let seed_window = &dx[period..=seed_idx];
    if seed_window.iter().any(|v| !v.is_finite()) {
        return result;
    }

    let mut adx = seed_window.iter().sum::<f64>() / period_f;
    result[seed_idx] = adx;

    for i in (seed_idx + 1)..n {
        adx = (adx * (period_f - 1.0) + dx[i]) / period_f;
        if !adx.is_finite() {
            break;
        }
        result[i] = adx;
    }

    result
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Compute DX from smoothed +DM, -DM, and TR values.
///
/// Returns `None` only for a non-finite result. A zero smoothed TR means no
/// range at all, which carries no direction either.
fn compute_dx(smooth_plus_dm: f64, smooth_minus_dm: f64, smooth_tr: f64) -> Option<f64> {
    if smooth_tr == 0.0 {
        return Some(0.0);
    }

    let plus_di = (smooth_plus_dm / smooth_tr) * 100.0;
    let minus_di = (smooth_minus_dm / smooth_tr) * 100.0;

    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        // No directional movement either way.
        return Some(0.0);
    }

    let dx = ((plus_di - minus_di).abs() / di_sum) * 100.0;
    dx.is_finite().then_some(dx)
}
