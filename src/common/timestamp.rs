//! Timestamp helpers.
//!
//! Event timestamps are `i64` microseconds. Elapsed-time predicates take a
//! [`Duration`] and compare in microseconds so no floating point rounding is
//! involved.

use std::time::Duration;

/// Microseconds per second.
pub const MICROS_PER_SECOND: i64 = 1_000_000;

/// Converts a [`Duration`] to microseconds, saturating at `i64::MAX`.
#[must_use]
#[inline]
pub fn duration_to_micros(duration: Duration) -> i64 {
    i64::try_from(duration.as_micros()).unwrap_or(i64::MAX)
}

/// Microseconds elapsed from `from_us` to `to_us`, saturating on overflow.
///
/// Negative when `to_us` precedes `from_us`.
#[must_use]
#[inline]
pub const fn elapsed_micros(from_us: i64, to_us: i64) -> i64 {
    to_us.saturating_sub(from_us)
}
