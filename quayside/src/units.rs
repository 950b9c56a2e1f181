//! Conversions between simulated hours and [`Duration`].
//!
//! The scheduler tracks simulated time as a [`Duration`]; everything the
//! port domain exposes (processing times, waiting times, horizons) is in
//! hours. These helpers are the single place the conversion happens.

use std::time::Duration;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Convert a number of simulated hours into a [`Duration`].
///
/// Negative or non-finite inputs clamp to zero.
pub fn hours(h: f64) -> Duration {
    if h.is_finite() && h > 0.0 {
        Duration::from_secs_f64(h * SECONDS_PER_HOUR)
    } else {
        Duration::ZERO
    }
}

/// Convert a [`Duration`] into simulated hours.
pub fn in_hours(d: Duration) -> f64 {
    d.as_secs_f64() / SECONDS_PER_HOUR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_hours() {
        let d = hours(2.5);
        assert_eq!(d, Duration::from_secs(9000));
        assert!((in_hours(d) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn clamps_invalid_input() {
        assert_eq!(hours(-1.0), Duration::ZERO);
        assert_eq!(hours(f64::NAN), Duration::ZERO);
        assert_eq!(hours(f64::INFINITY), Duration::ZERO);
    }
}
