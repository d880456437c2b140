//! Check-in payload issuance and parsing.
//!
//! A session's QR code encodes a plain URL with query parameters `session`,
//! `token` and `ts`. The token is a short random string that rotates on a
//! fixed interval; rotation invalidates the displayed QR code, not the
//! server-side validity of a scan. Whether a scan is accepted is governed by
//! the session window and the per-user uniqueness constraint.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use uuid::Uuid;

use crate::models::attendance::CheckInRequest;
use shared::crypto::generate_check_in_token;

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"^[A-Za-z0-9]{12}$").expect("valid token regex");
}

/// Error type for payload parsing. Always precedes any database lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("Malformed session identifier")]
    BadSessionId,

    #[error("Malformed check-in token")]
    BadToken,

    #[error("Malformed scan timestamp")]
    BadTimestamp,
}

/// A freshly issued check-in token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
}

/// Generates a new token for a session's QR display.
pub fn issue(now: DateTime<Utc>) -> IssuedToken {
    IssuedToken {
        token: generate_check_in_token(),
        issued_at: now,
    }
}

/// Builds the URL embedded in the QR code.
pub fn check_in_url(
    base_url: &str,
    session_id: Uuid,
    token: &str,
    issued_at: DateTime<Utc>,
) -> String {
    format!(
        "{}/check-in?session={}&token={}&ts={}",
        base_url.trim_end_matches('/'),
        session_id,
        token,
        issued_at.timestamp()
    )
}

/// The decoded scan payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInPayload {
    pub session_id: Uuid,
    pub token: String,
    pub issued_at: DateTime<Utc>,
}

/// Parses and validates the scanned payload fields.
///
/// `ts` accepts either Unix seconds (as emitted by [`check_in_url`]) or an
/// RFC 3339 timestamp.
pub fn parse_payload(request: &CheckInRequest) -> Result<CheckInPayload, PayloadError> {
    let session_id =
        Uuid::parse_str(request.session.trim()).map_err(|_| PayloadError::BadSessionId)?;

    let token = request.token.trim();
    if !TOKEN_RE.is_match(token) {
        return Err(PayloadError::BadToken);
    }

    let issued_at = parse_timestamp(request.ts.trim()).ok_or(PayloadError::BadTimestamp)?;

    Ok(CheckInPayload {
        session_id,
        token: token.to_string(),
        issued_at,
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(secs) = raw.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
