//! Rounding and exact-sum reconciliation.
//!
//! Independent rounding of values that sum to a total rarely sums to that
//! total. These helpers round and then hand the whole residual to a single
//! anchor element, so the displayed total is exact while every other element
//! keeps its independently rounded value.

// ---------------------------------------------------------------------------
// Decimal rounding
// ---------------------------------------------------------------------------

/// Round to 2 decimal places (half away from zero).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Index of the largest value. Ties resolve to the earliest index.
///
/// Returns `None` for an empty slice. NaN never wins a comparison.
pub fn argmax_first(values: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            None => best = Some(i),
            Some(b) if v > values[b] => best = Some(i),
            Some(_) => {}
        }
    }
    best
}

/// Hand the residual `total - Σ rounded` to `anchor`.
///
/// Returns the adjusted values and the residual that was absorbed. Only the
/// anchor changes; its new value is re-rounded to 2 decimals so it prints
/// cleanly. An out-of-range anchor returns the input unchanged.
pub fn absorb_drift(rounded: &[f64], anchor: usize, total: f64) -> (Vec<f64>, f64) {
    let sum: f64 = rounded.iter().sum();
    let drift = round2(total - sum);

    let adjusted = rounded
        .iter()
        .enumerate()
        .map(|(i, &v)| if i == anchor { round2(v + drift) } else { v })
        .collect();

    if anchor >= rounded.len() {
        return (adjusted, 0.0);
    }
    (adjusted, drift)
}

// ---------------------------------------------------------------------------
// Whole-percent settlement
// ---------------------------------------------------------------------------

/// Round percentages to integers that sum to exactly 100.
///
/// Each value is rounded independently and the residual goes to the largest
/// rounded value (earliest on ties). When that would push it below zero, which
/// takes more than 100 small entries, the residual is instead taken one point
/// at a time from the largest entries, so no entry ends up negative.
pub fn whole_percentages(allocations: &[f64]) -> Vec<i64> {
    if allocations.is_empty() {
        return Vec::new();
    }

    let mut rounded: Vec<i64> = allocations.iter().map(|a| a.round() as i64).collect();
    let sum: i64 = rounded.iter().sum();
    if sum == 100 {
        return rounded;
    }

    let diff = 100 - sum;
    let mut max_idx = 0;
    for i in 1..rounded.len() {
        if rounded[i] > rounded[max_idx] {
            max_idx = i;
        }
    }

    if rounded[max_idx] + diff >= 0 {
        rounded[max_idx] += diff;
        log::debug!("adjusted whole percentages from sum {sum} to 100: {diff:+} applied to index {max_idx}");
    } else {
        spread_deficit(&mut rounded, -diff);
        log::debug!("adjusted whole percentages from sum {sum} to 100: {diff:+} spread over largest entries");
    }

    rounded
}

/// Remove `deficit` points, one at a time, from the largest positive entries.
fn spread_deficit(values: &mut [i64], mut deficit: i64) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].cmp(&values[a]));

    while deficit > 0 {
        let mut progressed = false;
        for &i in &order {
            if deficit == 0 {
                break;
            }
            if values[i] > 0 {
                values[i] -= 1;
                deficit -= 1;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
}

/// Whole percentages expressed in basis points.
pub fn to_bps(whole: &[i64]) -> Vec<i64> {
    whole.iter().map(|p| p * 100).collect()
}
