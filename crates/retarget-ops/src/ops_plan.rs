//! Operation: show how a build invocation would reconcile the workspace.
//!
//! Runs the phase hooks on a scratch copy of the modules and prints the
//! evaluation order and every pass, either for humans or as JSON.

use std::path::Path;

use serde::Serialize;

use retarget_core::version::JvmVersion;
use retarget_reconciler::lifecycle::Lifecycle;
use retarget_reconciler::order::EvaluationOrder;
use retarget_reconciler::resolution::{forced_dependencies, ForcedDependency};
use retarget_reconciler::ReconcileReport;
use retarget_util::errors::RetargetError;

use crate::ReconcileContext;

/// Options for `retarget plan`.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    pub target: Option<JvmVersion>,
    pub json: bool,
}

/// The simulated invocation.
#[derive(Debug, Clone, Serialize)]
pub struct PlanOutput {
    pub target: JvmVersion,
    pub order: Vec<String>,
    pub passes: ReconcileReport,
    pub forced: Vec<ForcedDependency>,
}

/// Plan the workspace enclosing `project_dir` and print the result.
pub fn plan(project_dir: &Path, opts: &PlanOptions) -> miette::Result<PlanOutput> {
    let ctx = ReconcileContext::load(project_dir, opts.target)?;
    let output = plan_context(&ctx)?;
    if opts.json {
        let json = serde_json::to_string_pretty(&output).map_err(|e| RetargetError::Generic {
            message: format!("Failed to serialize plan: {e}"),
        })?;
        println!("{json}");
    } else {
        print_human(&output);
    }
    Ok(output)
}

/// Simulate the phase hooks for an already-loaded context.
pub fn plan_context(ctx: &ReconcileContext) -> miette::Result<PlanOutput> {
    let mut modules = ctx.workspace.members.clone();
    let order = EvaluationOrder::compute(&modules, ctx.workspace.evaluation_root())?;
    let passes = Lifecycle::new(ctx.target).run(&mut modules, &order)?;

    let forced = ctx
        .workspace
        .members
        .iter()
        .flat_map(|m| forced_dependencies(m, ctx.workspace.force_rules()))
        .collect();

    Ok(PlanOutput {
        target: ctx.target,
        order: order.names().to_vec(),
        passes,
        forced,
    })
}

fn print_human(output: &PlanOutput) {
    println!("JVM target: {}", output.target);
    println!("Evaluation order: {}", output.order.join(" -> "));
    println!();
    print!("{}", output.passes);
    if !output.forced.is_empty() {
        println!();
        println!("Forced dependencies:");
        for dep in &output.forced {
            println!("  {} [{}] {}", dep.module, dep.key, dep);
        }
    }
}
