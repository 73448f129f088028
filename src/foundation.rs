//! Shared primitives: core value types, error taxonomy, deterministic RNG.

pub mod core;
pub mod error;
pub mod math;
