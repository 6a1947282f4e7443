//! Version reconciliation for multi-module JVM builds.
//!
//! Brings every module of a workspace to one JVM toolchain target:
//!
//! - [`reconcile`] applies the target to a set of modules for one build
//!   phase, deferring platform extensions that are not yet safe to touch and
//!   falling back to the Java compile tasks when an extension is unusable.
//! - [`lifecycle::Lifecycle`] drives the phase hooks of one build invocation.
//! - [`plan::ReconcilePlan`] computes the end state up front and applies it
//!   in a single pass.
//! - [`order`] sorts modules into evaluation order.
//! - [`resolution`] applies dependency force rules.

pub mod lifecycle;
pub mod order;
pub mod plan;
pub mod reconcile;
pub mod resolution;

pub use reconcile::{reconcile, reconcile_module, ModuleReport, Outcome, ReconcileReport};
