//! Random token and code generation.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of a check-in token embedded in a QR payload.
pub const CHECK_IN_TOKEN_LEN: usize = 12;

/// Generates a random alphanumeric check-in token.
///
/// The token is only unguessable enough to resist casual replay within the
/// rotation window; session validity is governed elsewhere.
pub fn generate_check_in_token() -> String {
    random_alphanumeric(CHECK_IN_TOKEN_LEN)
}

/// Generates an invite code of the form `XXXX-XXXX` (uppercase alphanumeric).
pub fn generate_invite_code() -> String {
    let raw = random_alphanumeric(8).to_uppercase();
    format!("{}-{}", &raw[..4], &raw[4..])
}

fn random_alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
