//! Resend cooldown arithmetic.
//!
//! Pure functions of elapsed time; no I/O. Callers must consult these under
//! the per-identity lock so the check and the subsequent issuance are atomic.

use chrono::{DateTime, Duration, Utc};

/// Whether a new issuance is allowed, given when the last one happened.
/// An identity that never issued is always allowed.
pub fn can_issue(
    last_issued_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    window: Duration,
) -> bool {
    remaining(last_issued_at, now, window).is_none()
}

/// Time left on the cooldown, or None once issuance is allowed again.
/// The window boundary itself counts as allowed.
pub fn remaining(
    last_issued_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    window: Duration,
) -> Option<Duration> {
    let last = last_issued_at?;
    let elapsed = now - last;
    if elapsed >= window {
        None
    } else {
        Some(window - elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const WINDOW: Duration = Duration::seconds(300);

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn never_issued_is_always_allowed() {
        assert!(can_issue(None, t0(), WINDOW));
        assert_eq!(remaining(None, t0(), WINDOW), None);
    }

    #[test]
    fn remaining_counts_down_from_the_last_issuance() {
        let now = t0() + Duration::seconds(100);
        assert!(!can_issue(Some(t0()), now, WINDOW));
        assert_eq!(
            remaining(Some(t0()), now, WINDOW),
            Some(Duration::seconds(200))
        );
    }

    #[test]
    fn window_boundary_is_allowed() {
        let now = t0() + Duration::seconds(300);
        assert!(can_issue(Some(t0()), now, WINDOW));

        let just_before = t0() + Duration::seconds(299);
        assert_eq!(
            remaining(Some(t0()), just_before, WINDOW),
            Some(Duration::seconds(1))
        );
    }
}
