// src/analysis/stats.rs

/// Median of a sequence. Even-length input averages the two middle values.
/// Returns `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Percentile rank (0..=100) of `value` within `values`.
///
/// Values equal to `value` count as half below, so a value sitting in the
/// middle of a run of ties lands in the middle of that run.
pub fn percentile_rank(values: &[f64], value: f64) -> Option<f64> {
    if values.is_empty() || !value.is_finite() {
        return None;
    }

    let below = values.iter().filter(|v| **v < value).count() as f64;
    let equal = values.iter().filter(|v| **v == value).count() as f64;

    Some(100.0 * (below + 0.5 * equal) / values.len() as f64)
}

/// Arithmetic mean, `None` when empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Keeps only finite, strictly positive numbers.
pub fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}
