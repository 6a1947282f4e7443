//! The version reconciler.
//!
//! Reconciliation is best-effort and never fails: a platform extension that
//! cannot take the version is reported as [`Outcome::Fallback`] and the
//! version goes onto the Java compile tasks instead.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use retarget_core::module::Module;
use retarget_core::phase::Phase;
use retarget_core::surface::{Change, CompilerVersionConfigurable};
use retarget_core::version::JvmVersion;

/// How the Java side of a module was handled in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Outcome {
    /// No platform extension; Java compile tasks were set directly.
    Direct,
    /// Set through the platform extension's compile options.
    Surface,
    /// The platform extension is not safe to mutate yet.
    Deferred,
    /// The platform extension is unusable; Java compile tasks were set instead.
    Fallback { reason: String },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::Surface => f.write_str("surface"),
            Self::Deferred => f.write_str("deferred"),
            Self::Fallback { reason } => write!(f, "fallback ({reason})"),
        }
    }
}

/// What happened to one module in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleReport {
    pub module: String,
    pub phase: Phase,
    pub outcome: Outcome,
    pub changes: Vec<Change>,
}

/// Per-module results of one or more reconcile passes, in the order they ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub entries: Vec<ModuleReport>,
}

impl ReconcileReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ModuleReport) {
        self.entries.push(entry);
    }

    pub fn merge(&mut self, other: ReconcileReport) {
        self.entries.extend(other.entries);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Total number of fields changed across all passes.
    pub fn change_count(&self) -> usize {
        self.entries.iter().map(|e| e.changes.len()).sum()
    }

    /// The latest pass recorded for `module`.
    pub fn last_for(&self, module: &str) -> Option<&ModuleReport> {
        self.entries.iter().rev().find(|e| e.module == module)
    }

    /// Modules whose latest pass fell back to the Java compile tasks.
    pub fn fallbacks(&self) -> Vec<&ModuleReport> {
        self.latest()
            .filter(|e| matches!(e.outcome, Outcome::Fallback { .. }))
            .collect()
    }

    /// Modules whose latest pass is still deferred.
    pub fn deferred(&self) -> Vec<&str> {
        self.latest()
            .filter(|e| e.outcome == Outcome::Deferred)
            .map(|e| e.module.as_str())
            .collect()
    }

    fn latest(&self) -> impl Iterator<Item = &ModuleReport> {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(i, e)| !self.entries[i + 1..].iter().any(|later| later.module == e.module))
            .map(|(_, e)| e)
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "Nothing to reconcile.");
        }
        for entry in &self.entries {
            writeln!(f, "[{}] {}: {}", entry.phase, entry.module, entry.outcome)?;
            for change in &entry.changes {
                writeln!(f, "    {change}")?;
            }
        }
        Ok(())
    }
}

/// Bring every module in `modules` to `target` as far as `phase` allows.
///
/// Repeating the call with the same target records no further changes.
pub fn reconcile(modules: &mut [Module], target: JvmVersion, phase: Phase) -> ReconcileReport {
    let mut report = ReconcileReport::new();
    for module in modules.iter_mut() {
        report.push(reconcile_module(module, target, phase));
    }
    report
}

/// Reconcile a single module for `phase`.
pub fn reconcile_module(module: &mut Module, target: JvmVersion, phase: Phase) -> ModuleReport {
    let mut changes = Vec::new();

    // Kotlin compile tasks exist as soon as the task graph does.
    if phase >= Phase::GraphReady {
        if let Some(kotlin) = module.kotlin.as_mut() {
            changes.extend(kotlin.apply_jvm_target(target));
        }
    }

    let outcome = if !java_ready(module, phase) {
        Outcome::Deferred
    } else if !module.has_platform_extension() {
        changes.extend(apply_java_tasks(module, target));
        Outcome::Direct
    } else {
        match module
            .platform_surface_mut()
            .and_then(|surface| surface.apply_compatibility(target))
        {
            Ok(surface_changes) => {
                changes.extend(surface_changes);
                // An explicit task override would shadow the compile options.
                if module.java.is_overridden() {
                    changes.extend(apply_java_tasks(module, target));
                }
                Outcome::Surface
            }
            Err(e) => {
                warn!(
                    module = %module.name,
                    error = %e,
                    "platform extension unusable, setting Java compile tasks directly"
                );
                changes.extend(apply_java_tasks(module, target));
                Outcome::Fallback {
                    reason: e.to_string(),
                }
            }
        }
    };

    debug!(
        module = %module.name,
        %phase,
        %outcome,
        changes = changes.len(),
        "reconciled module"
    );

    ModuleReport {
        module: module.name.clone(),
        phase,
        outcome,
        changes,
    }
}

fn java_ready(module: &Module, phase: Phase) -> bool {
    if !module.has_platform_extension() {
        return module.java.ready_in(phase);
    }
    match &module.android {
        Some(ext) => ext.ready_in(phase),
        // A missing extension is only known to be missing once the module has been evaluated.
        None => phase == Phase::Evaluated,
    }
}

/// Java compile tasks always accept a version, so this is unconditional.
fn apply_java_tasks(module: &mut Module, target: JvmVersion) -> Vec<Change> {
    module.java.write_compatibility(target)
}
