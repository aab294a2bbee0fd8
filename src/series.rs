//! Leibniz series arithmetic
//!
//! `pi = sum_{i >= 0} 4 * (1 - 2 * (i mod 2)) / (2i + 1)`
//!
//! Workers evaluate [`partial_sum`] over their range; [`sequential_sum`] is the
//! single-threaded reference the concurrent result is checked against.

/// The `i`-th term of the series
#[inline]
pub fn term(i: u64) -> f64 {
    let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
    4.0 * sign / (2.0 * i as f64 + 1.0)
}

/// Sum of terms over `[first, end)`
///
/// An empty range sums to `0.0`.
pub fn partial_sum(first: u64, end: u64) -> f64 {
    let mut acc = 0.0;
    for i in first..end {
        acc += term(i);
    }
    acc
}

/// Sequential sum of the first `total_units * unit_size` terms
pub fn sequential_sum(total_units: u64, unit_size: u64) -> f64 {
    partial_sum(0, total_units.saturating_mul(unit_size))
}
