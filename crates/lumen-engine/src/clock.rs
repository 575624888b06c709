//! Absolute-deadline scheduling primitives.
//!
//! Each worker carries its own next-wake deadline and advances it by a
//! fixed period every cycle. Sleeping to an absolute instant, instead of
//! for a relative duration after variable work, keeps the long-run
//! average period exact even when individual cycles run late.

use std::thread;
use std::time::{Duration, Instant};

/// Current monotonic instant.
pub fn now() -> Instant {
    Instant::now()
}

/// The next deadline on a fixed-increment schedule. Pure; drift observed
/// in the current cycle never shifts the schedule.
pub fn advance(deadline: Instant, period: Duration) -> Instant {
    deadline + period
}

/// Block the calling thread until `deadline`. A deadline that has
/// already passed returns immediately.
pub fn sleep_until(deadline: Instant) {
    let remaining = deadline.saturating_duration_since(Instant::now());
    if !remaining.is_zero() {
        thread::sleep(remaining);
    }
}

/// Signed microseconds from `from` to `to`; negative when `to` precedes
/// `from`.
pub fn signed_micros(from: Instant, to: Instant) -> i64 {
    if to >= from {
        to.duration_since(from).as_micros() as i64
    } else {
        -(from.duration_since(to).as_micros() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates_exact_periods() {
        let start = now();
        let period = Duration::from_millis(30);
        let mut deadline = start;
        for _ in 0..100 {
            deadline = advance(deadline, period);
        }
        assert_eq!(deadline, start + Duration::from_millis(3000));
    }

    #[test]
    fn sleep_until_past_deadline_returns_immediately() {
        let deadline = now() - Duration::from_millis(50);
        let before = now();
        sleep_until(deadline);
        assert!(now() - before < Duration::from_millis(20));
    }

    #[test]
    fn sleep_until_reaches_deadline() {
        let deadline = now() + Duration::from_millis(10);
        sleep_until(deadline);
        assert!(now() >= deadline);
    }

    #[test]
    fn signed_micros_sign_convention() {
        let a = now();
        let b = a + Duration::from_micros(250);
        assert_eq!(signed_micros(a, b), 250);
        assert_eq!(signed_micros(b, a), -250);
        assert_eq!(signed_micros(a, a), 0);
    }
}
