//! Common validation utilities.

use chrono::{DateTime, Utc};
use validator::ValidationError;

/// Maximum future skew tolerated for a scan timestamp (5 minutes).
const MAX_FUTURE_TOLERANCE_SECS: i64 = 300;

/// Maximum age of a scan timestamp (1 day).
const MAX_SCAN_AGE_HOURS: i64 = 24;

/// Validates password strength: at least 8 characters with one uppercase,
/// one lowercase and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.len() >= 8;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if long_enough && has_upper && has_lower && has_digit {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_strength");
        err.message =
            Some("Password must be at least 8 characters with upper, lower and digit".into());
        Err(err)
    }
}

/// Validates that a session window is well-formed (end strictly after start).
pub fn validate_session_window(
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if ends_at > starts_at {
        Ok(())
    } else {
        let mut err = ValidationError::new("session_window");
        err.message = Some("Session end time must be after start time".into());
        Err(err)
    }
}

/// Validates that a scan timestamp is plausible: not more than 5 minutes in
/// the future (clock skew) and not older than a day.
pub fn validate_scan_timestamp(ts: DateTime<Utc>) -> Result<(), ValidationError> {
    let now = Utc::now();

    if ts > now + chrono::Duration::seconds(MAX_FUTURE_TOLERANCE_SECS) {
        let mut err = ValidationError::new("timestamp_future");
        err.message = Some("Scan timestamp cannot be in the future".into());
        return Err(err);
    }

    if ts < now - chrono::Duration::hours(MAX_SCAN_AGE_HOURS) {
        let mut err = ValidationError::new("timestamp_old");
        err.message = Some("Scan timestamp is too old".into());
        return Err(err);
    }

    Ok(())
}
