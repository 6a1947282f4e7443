//! Two-stage reconciliation.
//!
//! [`ReconcilePlan::collect`] works out, without touching the workspace,
//! what the final evaluated pass would change in every module.
//! [`ReconcilePlan::apply`] then writes those changes in one deterministic
//! pass. The resulting state matches what the phase hooks converge to.

use serde::Serialize;

use retarget_core::manifest::ForceRule;
use retarget_core::module::{Module, ResolvedVersions};
use retarget_core::phase::Phase;
use retarget_core::surface::{Change, Field, Site};
use retarget_core::version::JvmVersion;
use retarget_core::workspace::Workspace;
use retarget_util::errors::RetargetError;

use crate::order::EvaluationOrder;
use crate::reconcile::{reconcile_module, Outcome};
use crate::resolution::{apply_forced, forced_dependencies, ForcedDependency};

/// Pending work for one module.
#[derive(Debug, Clone, Serialize)]
pub struct ModulePlan {
    pub module: String,
    pub outcome: Outcome,
    /// Versions the module resolves to before the plan is applied.
    pub resolved: ResolvedVersions,
    pub changes: Vec<Change>,
    pub forced: Vec<ForcedDependency>,
}

impl ModulePlan {
    pub fn is_in_sync(&self) -> bool {
        self.changes.is_empty() && self.forced.is_empty()
    }
}

/// The full set of changes needed to bring a workspace to one target.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcilePlan {
    pub target: JvmVersion,
    /// Module names in evaluation order.
    pub order: Vec<String>,
    /// One entry per module, in evaluation order.
    pub modules: Vec<ModulePlan>,
}

impl ReconcilePlan {
    /// Collect the plan for a loaded workspace.
    pub fn collect(workspace: &Workspace, target: JvmVersion) -> miette::Result<Self> {
        Self::collect_modules(
            &workspace.members,
            workspace.evaluation_root(),
            workspace.force_rules(),
            target,
        )
    }

    pub fn collect_modules(
        modules: &[Module],
        evaluation_root: Option<&str>,
        rules: &[ForceRule],
        target: JvmVersion,
    ) -> miette::Result<Self> {
        let order = EvaluationOrder::compute(modules, evaluation_root)?;

        let mut planned = Vec::with_capacity(order.len());
        for &index in order.indices() {
            let module = &modules[index];
            // The evaluated pass is computed on a scratch copy.
            let mut scratch = module.clone();
            let pass = reconcile_module(&mut scratch, target, Phase::Evaluated);
            planned.push(ModulePlan {
                module: module.name.clone(),
                outcome: pass.outcome,
                resolved: module.resolved(),
                changes: pass.changes,
                forced: forced_dependencies(module, rules),
            });
        }

        tracing::debug!(
            jvm_target = %target,
            modules = planned.len(),
            "collected reconcile plan"
        );

        Ok(Self {
            target,
            order: order.names().to_vec(),
            modules: planned,
        })
    }

    /// Modules that need at least one change.
    pub fn drift(&self) -> impl Iterator<Item = &ModulePlan> {
        self.modules.iter().filter(|m| !m.is_in_sync())
    }

    pub fn is_in_sync(&self) -> bool {
        self.drift().next().is_none()
    }

    pub fn change_count(&self) -> usize {
        self.modules
            .iter()
            .map(|m| m.changes.len() + m.forced.len())
            .sum()
    }

    pub fn module(&self, name: &str) -> Option<&ModulePlan> {
        self.modules.iter().find(|m| m.module == name)
    }

    /// Apply every planned change to `modules` in evaluation order.
    ///
    /// Returns the number of fields written.
    pub fn apply(&self, modules: &mut [Module]) -> miette::Result<usize> {
        let mut written = 0;
        for plan in &self.modules {
            let module = modules
                .iter_mut()
                .find(|m| m.name == plan.module)
                .ok_or_else(|| RetargetError::Generic {
                    message: format!("module '{}' is not part of this workspace", plan.module),
                })?;
            for change in &plan.changes {
                write_change(module, change);
                written += 1;
            }
            apply_forced(module, &plan.forced);
            written += plan.forced.len();
        }
        Ok(written)
    }
}

/// Set the field named by `change` on `module`.
pub fn write_change(module: &mut Module, change: &Change) {
    let version = Some(change.to);
    match (change.site, change.field) {
        (Site::KotlinCompile, _) => {
            module.kotlin.get_or_insert_with(Default::default).jvm_target = version;
        }
        (Site::JavaCompile, Field::SourceCompatibility) => {
            module.java.source_compatibility = version;
        }
        (Site::JavaCompile, _) => module.java.target_compatibility = version,
        (Site::AndroidCompileOptions, Field::SourceCompatibility) => {
            module
                .android
                .get_or_insert_with(Default::default)
                .compile_options
                .source_compatibility = version;
        }
        (Site::AndroidCompileOptions, _) => {
            module
                .android
                .get_or_insert_with(Default::default)
                .compile_options
                .target_compatibility = version;
        }
    }
}
