// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ). σ is the population standard deviation over
// the same window as the SMA.

use super::sma::sma_series;

/// The three bands, each aligned with the input closes.
#[derive(Debug, Clone)]
pub struct BollingerSeries {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Calculate Bollinger Bands for the given closing prices.
///
/// - `middle` = SMA(`period`)
/// - `upper`  = middle + `num_std` * σ
/// - `lower`  = middle - `num_std` * σ
///
/// The first `period - 1` entries of every band are `NaN`.
pub fn bollinger_series(closes: &[f64], period: usize, num_std: f64) -> BollingerSeries {
    let middle = sma_series(closes, period);
    let mut upper = vec![f64::NAN; closes.len()];
    let mut lower = vec![f64::NAN; closes.len()];

    if period > 0 {
        for (i, &mean) in middle.iter().enumerate() {
            if !mean.is_finite() {
                continue;
            }
            let window = &closes[i + 1 - period..=i];
            let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period as f64;
            let std_dev = variance.sqrt();
            upper[i] = mean + num_std * std_dev;
            lower[i] = mean - num_std * std_dev;
        }
    }

    BollingerSeries {
        upper,
        middle,
        lower,
    }
}
