//! Phase hooks of one build invocation.
//!
//! The host build raises "graph ready" once and "module evaluated" once per
//! module. Each hook reconciles what that phase allows; the evaluated pass
//! runs last and therefore wins.

use retarget_core::module::Module;
use retarget_core::phase::{Phase, PhaseTracker};
use retarget_core::version::JvmVersion;
use retarget_util::errors::RetargetError;

use crate::order::EvaluationOrder;
use crate::reconcile::{reconcile, reconcile_module, ReconcileReport};

/// Reconciler state for one build invocation.
#[derive(Debug)]
pub struct Lifecycle {
    target: JvmVersion,
    phases: PhaseTracker,
    report: ReconcileReport,
}

impl Lifecycle {
    pub fn new(target: JvmVersion) -> Self {
        Self {
            target,
            phases: PhaseTracker::new(),
            report: ReconcileReport::new(),
        }
    }

    pub fn target(&self) -> JvmVersion {
        self.target
    }

    pub fn phase(&self) -> Phase {
        self.phases.current()
    }

    /// Coarse pass over every module once the task graph is complete.
    pub fn on_graph_ready(&mut self, modules: &mut [Module]) -> miette::Result<()> {
        self.phases.advance(Phase::GraphReady)?;
        let pass = reconcile(modules, self.target, Phase::GraphReady);
        self.report.merge(pass);
        Ok(())
    }

    /// Per-module pass after `module`'s own configuration has run.
    pub fn on_module_evaluated(&mut self, module: &mut Module) -> miette::Result<()> {
        self.phases.advance(Phase::Evaluated)?;
        let entry = reconcile_module(module, self.target, Phase::Evaluated);
        self.report.push(entry);
        Ok(())
    }

    /// Drive a whole invocation: graph-ready, then each module in `order`.
    pub fn run(
        mut self,
        modules: &mut [Module],
        order: &EvaluationOrder,
    ) -> miette::Result<ReconcileReport> {
        self.on_graph_ready(modules)?;
        let count = modules.len();
        for &index in order.indices() {
            let module = modules.get_mut(index).ok_or_else(|| RetargetError::Generic {
                message: format!(
                    "evaluation order refers to module #{index}, but only {count} module(s) were given"
                ),
            })?;
            self.on_module_evaluated(module)?;
        }
        Ok(self.finish())
    }

    pub fn report(&self) -> &ReconcileReport {
        &self.report
    }

    pub fn finish(self) -> ReconcileReport {
        self.report
    }
}
