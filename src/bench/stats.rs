//! Summary statistics over duration samples
//!
//! Samples are wall-clock durations in seconds. The result table never holds
//! an empty sample list, so calling these on an empty slice is a bug.

/// Round a duration in seconds to millisecond precision
pub fn round_millis(secs: f64) -> f64 {
    (secs * 1000.0).round() / 1000.0
}

/// Arithmetic mean
pub fn average(samples: &[f64]) -> f64 {
    assert!(!samples.is_empty(), "average of an empty sample list");
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Median: middle element for odd lengths, mean of the middle pair for even
pub fn median(samples: &[f64]) -> f64 {
    assert!(!samples.is_empty(), "median of an empty sample list");
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let len = sorted.len();
    let upper = sorted[len / 2];
    let lower = sorted[(len - 1) / 2];
    (lower + upper) / 2.0
}
