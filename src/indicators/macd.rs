// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   line   = EMA(fast) - EMA(slow)
//   signal = EMA(signal_period) of line
//
// The histogram (line - signal) is not retained by the signal board.
// =============================================================================

use super::ema::ema_series;

/// MACD line and signal line, aligned with the input closes.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
}

/// Compute MACD(`fast`, `slow`, `signal_period`).
///
/// The line is defined from index `slow - 1` (the slow EMA's seed) and the
/// signal from `slow + signal_period - 2`.
pub fn macd_series(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdSeries {
    let fast_ema = ema_series(closes, fast);
    let slow_ema = ema_series(closes, slow);

    let line: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();
    let signal = ema_series(&line, signal_period);

    MacdSeries { line, signal }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 1.10 + (i as f64 * 0.35).sin() * 0.004 + i as f64 * 0.0001)
            .collect()
    }

    #[test]
    fn macd_warmup_boundaries() {
        let m = macd_series(&wave(60), 12, 26, 9);
        assert!(m.line[..25].iter().all(|v| v.is_nan()));
        assert!(m.line[25..].iter().all(|v| v.is_finite()));
        assert!(m.signal[..33].iter().all(|v| v.is_nan()));
        assert!(m.signal[33..].iter().all(|v| v.is_finite()));
    }

    #[test]
    fn macd_short_series_is_undefined() {
        let m = macd_series(&wave(20), 12, 26, 9);
        assert_eq!(m.line.len(), 20);
        assert!(m.line.iter().all(|v| v.is_nan()));
        assert!(m.signal.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn macd_matches_reference() {
        let closes = wave(80);

        // Reference: independent SMA-seeded EMAs computed inline.
        fn ema(values: &[f64], start: usize, period: usize) -> Vec<Option<f64>> {
            let mut out = vec![None; values.len()];
            let k = 2.0 / (period as f64 + 1.0);
            let seed = start + period - 1;
            let mut prev = values[start..=seed].iter().sum::<f64>() / period as f64;
            out[seed] = Some(prev);
            for i in seed + 1..values.len() {
                prev = values[i] * k + prev * (1.0 - k);
                out[i] = Some(prev);
            }
            out
        }
        let fast = ema(&closes, 0, 12);
        let slow = ema(&closes, 0, 26);
        let line: Vec<f64> = (0..closes.len())
            .map(|i| match (fast[i], slow[i]) {
                (Some(f), Some(s)) => f - s,
                _ => 0.0,
            })
            .collect();
        let signal = ema(&line, 25, 9);

        let m = macd_series(&closes, 12, 26, 9);
        for i in 33..closes.len() {
            assert!((m.line[i] - line[i]).abs() < 1e-6, "line mismatch at {i}");
            assert!((m.signal[i] - signal[i].unwrap()).abs() < 1e-6, "signal mismatch at {i}");
        }
    }

    #[test]
    fn macd_rising_market_line_positive() {
        let closes: Vec<f64> = (0..60).map(|i| 1.0 + i as f64 * 0.001).collect();
        let m = macd_series(&closes, 12, 26, 9);
        assert!(*m.line.last().unwrap() > 0.0);
    }
}
