//! Shared utilities for the Rollcall backend.
//!
//! Leaf crate with no domain knowledge: password hashing, JWT handling,
//! random code generation and pagination types.

pub mod crypto;
pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
