//! Shared utilities for retarget.
//!
//! Cross-cutting concerns used by the other retarget crates: the unified
//! error type, filesystem helpers and Cargo-style status output.

pub mod errors;
pub mod fs;
pub mod progress;
