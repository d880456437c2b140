//! Business logic services.

pub mod auth;
pub mod check_in;

pub use auth::{AuthError, AuthService};
pub use check_in::{CheckInError, CheckInService};
