//! HTTP route handlers.

pub mod attendance;
pub mod auth;
pub mod clubs;
pub mod health;
pub mod invites;
pub mod me;
pub mod sessions;
