//! Time and rate formatting
//!
//! Helpers used by the reports to render elapsed time and term throughput.

use std::time::Duration;

/// Render an elapsed time as seconds, milliseconds or microseconds
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use pisum::util::time::format_duration;
///
/// assert_eq!(format_duration(Duration::from_micros(40)), "40.00us");
/// assert_eq!(format_duration(Duration::from_micros(2500)), "2.50ms");
/// assert_eq!(format_duration(Duration::from_secs(5)), "5.00s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs >= 1.0 {
        format!("{:.2}s", secs)
    } else if duration >= Duration::from_millis(1) {
        format!("{:.2}ms", secs * 1e3)
    } else {
        format!("{:.2}us", secs * 1e6)
    }
}

/// Render a terms-per-second rate with a K or M suffix
///
/// ```
/// use pisum::util::time::format_rate;
///
/// assert_eq!(format_rate(1500.0), "1.50K");
/// assert_eq!(format_rate(2_500_000_000.0), "2500.00M");
/// ```
pub fn format_rate(rate: f64) -> String {
    match rate {
        r if r >= 1e6 => format!("{:.2}M", r / 1e6),
        r if r >= 1e3 => format!("{:.2}K", r / 1e3),
        r => format!("{:.0}", r),
    }
}

/// Series terms summed per second
///
/// Returns `0.0` for a zero duration.
pub fn terms_per_second(terms: u64, duration: Duration) -> f64 {
    let seconds = duration.as_secs_f64();
    if seconds > 0.0 {
        terms as f64 / seconds
    } else {
        0.0
    }
}
