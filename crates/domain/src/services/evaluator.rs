//! Attendance evaluation: classifies a scan timestamp against a session
//! window.
//!
//! This is a pure function with no side effects. All boundary comparisons
//! are inclusive: a scan at exactly the session end is still within the
//! window, and a scan at exactly `start + late_threshold` counts as present.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// The time window of an attendance session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// Outcome of evaluating one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanOutcome {
    /// On time, including early arrivals and scans within the late threshold.
    Present,
    /// Inside the window but past the late threshold.
    Late,
    /// Past the session end; no attendance record may be written.
    Rejected,
}

/// Classifies a scan at `now` against the session window.
///
/// - `now < start`: early arrivals are not penalized, returns `Present`.
/// - `start <= now <= start + late_threshold`: `Present`.
/// - `start + late_threshold < now <= end`: `Late`.
/// - `now > end`: `Rejected`.
pub fn evaluate(window: &SessionWindow, late_threshold: Duration, now: DateTime<Utc>) -> ScanOutcome {
    if now < window.starts_at {
        return ScanOutcome::Present;
    }
    if now <= window.ends_at {
        if now <= window.starts_at + late_threshold {
            ScanOutcome::Present
        } else {
            ScanOutcome::Late
        }
    } else {
        ScanOutcome::Rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window() -> SessionWindow {
        // 2025-04-05 14:00 - 15:00 UTC
        SessionWindow {
            starts_at: Utc.with_ymd_and_hms(2025, 4, 5, 14, 0, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2025, 4, 5, 15, 0, 0).unwrap(),
        }
    }

    fn threshold() -> Duration {
        Duration::minutes(30)
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 5, h, m, s).unwrap()
    }

    #[test]
    fn test_early_arrival_is_present() {
        assert_eq!(
            evaluate(&window(), threshold(), at(13, 30, 0)),
            ScanOutcome::Present
        );
    }

    #[test]
    fn test_scan_at_start_is_present() {
        assert_eq!(
            evaluate(&window(), threshold(), at(14, 0, 0)),
            ScanOutcome::Present
        );
    }

    #[test]
    fn test_just_before_threshold_is_present() {
        assert_eq!(
            evaluate(&window(), threshold(), at(14, 29, 59)),
            ScanOutcome::Present
        );
    }

    #[test]
    fn test_exactly_at_threshold_is_present() {
        // Boundary: now == start + threshold is present, not late.
        assert_eq!(
            evaluate(&window(), threshold(), at(14, 30, 0)),
            ScanOutcome::Present
        );
    }

    #[test]
    fn test_just_past_threshold_is_late() {
        assert_eq!(
            evaluate(&window(), threshold(), at(14, 30, 1)),
            ScanOutcome::Late
        );
    }

    #[test]
    fn test_scan_at_end_is_late() {
        // Boundary: now == end is still within the window.
        assert_eq!(
            evaluate(&window(), threshold(), at(15, 0, 0)),
            ScanOutcome::Late
        );
    }

    #[test]
    fn test_just_past_end_is_rejected() {
        assert_eq!(
            evaluate(&window(), threshold(), at(15, 0, 1)),
            ScanOutcome::Rejected
        );
    }

    #[test]
    fn test_threshold_longer_than_window() {
        // A generous threshold makes the whole window present.
        let outcome = evaluate(&window(), Duration::hours(2), at(14, 59, 59));
        assert_eq!(outcome, ScanOutcome::Present);
    }

    #[test]
    fn test_zero_threshold() {
        assert_eq!(
            evaluate(&window(), Duration::zero(), at(14, 0, 0)),
            ScanOutcome::Present
        );
        assert_eq!(
            evaluate(&window(), Duration::zero(), at(14, 0, 1)),
            ScanOutcome::Late
        );
    }
}
