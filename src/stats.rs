//! Summary statistics over APY histories.
//!
//! Used to populate a strategy's `historical` block (average APY, volatility,
//! Sharpe-style ratio) from a series of observed APY samples.

// ---------------------------------------------------------------------------
// Moments
// ---------------------------------------------------------------------------

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation. Returns 0.0 for an empty slice.
pub fn volatility(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

// ---------------------------------------------------------------------------
// Ratios
// ---------------------------------------------------------------------------

/// Mean over volatility, with no risk-free adjustment.
///
/// Returns 0.0 when the series is empty or flat.
pub fn sharpe(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let vol = volatility(values);
    if vol > 0.0 { mean(values) / vol } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(volatility(&[]), 0.0);
        assert_eq!(sharpe(&[]), 0.0);
    }

    #[test]
    fn flat_series_has_zero_sharpe() {
        let apys = [5.0, 5.0, 5.0];
        assert_eq!(mean(&apys), 5.0);
        assert_eq!(volatility(&apys), 0.0);
        assert_eq!(sharpe(&apys), 0.0);
    }

    #[test]
    fn population_std() {
        // mean 5, deviations ±2 -> variance 4
        let apys = [3.0, 7.0, 3.0, 7.0];
        assert_eq!(mean(&apys), 5.0);
        assert!((volatility(&apys) - 2.0).abs() < 1e-12);
        assert!((sharpe(&apys) - 2.5).abs() < 1e-12);
    }
}
