//! Core data types for retarget.
//!
//! This crate defines the model the reconciler works on: JVM toolchain
//! versions, build phases, modules with their compiler-configuration
//! surfaces, `Retarget.toml` manifests, workspaces, global configuration
//! and `.retarget.env` interpolation.
//!
//! This crate is intentionally free of any reconciliation policy.

pub mod config;
pub mod manifest;
pub mod module;
pub mod phase;
pub mod properties;
pub mod surface;
pub mod version;
pub mod workspace;
