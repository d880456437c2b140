//! Pure business logic services.

pub mod evaluator;
pub mod token;
