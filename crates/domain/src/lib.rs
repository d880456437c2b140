//! Domain layer for the Rollcall backend.
//!
//! This crate contains:
//! - Domain models (Club, AttendanceSession, Attendance)
//! - Pure business logic (attendance evaluation, check-in payloads)

pub mod models;
pub mod services;
