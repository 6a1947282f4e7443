//! Operation: report modules whose compiler versions drift from the target.
//!
//! Reconciles a scratch copy of the workspace and prints, per module, the
//! fields and dependencies that would change. Nothing is written.

use std::path::Path;

use retarget_core::version::JvmVersion;
use retarget_reconciler::plan::ReconcilePlan;
use retarget_reconciler::Outcome;
use retarget_util::errors::RetargetError;
use retarget_util::progress::{status, status_info, status_warn};

use crate::ReconcileContext;

/// Check the workspace enclosing `project_dir`.
pub fn check(
    project_dir: &Path,
    target: Option<JvmVersion>,
    verbose: bool,
) -> miette::Result<ReconcilePlan> {
    let ctx = ReconcileContext::load(project_dir, target)?;
    check_context(&ctx, verbose)
}

/// Check an already-loaded context.
///
/// Fails when anything is out of sync and `[check] fail-on-drift` is on.
pub fn check_context(ctx: &ReconcileContext, verbose: bool) -> miette::Result<ReconcilePlan> {
    let plan = ReconcilePlan::collect(&ctx.workspace, ctx.target)?;
    status(
        "Checking",
        &format!("{} module(s) against JVM {}", plan.modules.len(), ctx.target),
    );

    for module in &plan.modules {
        if let Outcome::Fallback { reason } = &module.outcome {
            status_warn(
                "Fallback",
                &format!("{}: {reason}; Java compile tasks are set directly", module.module),
            );
        }

        if module.is_in_sync() {
            if verbose {
                status_info("Ok", &module.module);
            }
            continue;
        }

        status_warn("Drift", &format!("{} ({})", module.module, module.outcome));
        for change in &module.changes {
            eprintln!("      {change}");
        }
        for dep in &module.forced {
            eprintln!("      dependencies.{}: {dep}", dep.key);
        }
    }

    let drifting = plan.drift().count();
    if drifting == 0 {
        status(
            "Finished",
            &format!("all {} module(s) target JVM {}", plan.modules.len(), ctx.target),
        );
        return Ok(plan);
    }

    let summary = format!(
        "{drifting} module(s) out of sync with JVM {}; run `retarget apply` to fix",
        ctx.target
    );
    if ctx.config.check.fail_on_drift {
        Err(RetargetError::Generic { message: summary }.into())
    } else {
        status_warn("Finished", &summary);
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retarget_core::config::GlobalConfig;

    fn write_workspace(root: &Path, kotlin_target: &str) {
        std::fs::write(
            root.join("Retarget.toml"),
            "[workspace]\nmembers = [\"core\"]\n\n[toolchain]\njvm-target = \"17\"\n",
        )
        .unwrap();
        std::fs::create_dir_all(root.join("core")).unwrap();
        std::fs::write(
            root.join("core/Retarget.toml"),
            format!(
                "[module]\nname = \"core\"\n\n[kotlin]\njvm-target = \"{kotlin_target}\"\n\n\
                 [java]\nsource-compatibility = \"17\"\ntarget-compatibility = \"17\"\n"
            ),
        )
        .unwrap();
    }

    #[test]
    fn check_in_sync_workspace_passes() {
        let tmp = tempfile::tempdir().unwrap();
        write_workspace(tmp.path(), "17");
        let ctx =
            ReconcileContext::load_with_config(tmp.path(), None, GlobalConfig::default()).unwrap();
        let plan = check_context(&ctx, true).unwrap();
        assert!(plan.is_in_sync());
    }

    #[test]
    fn check_drift_fails_by_default() {
        let tmp = tempfile::tempdir().unwrap();
        write_workspace(tmp.path(), "1.8");
        let ctx =
            ReconcileContext::load_with_config(tmp.path(), None, GlobalConfig::default()).unwrap();
        let err = check_context(&ctx, false).unwrap_err();
        assert!(err.to_string().contains("1 module(s) out of sync"), "got: {err}");
    }

    #[test]
    fn check_drift_tolerated_when_configured() {
        let tmp = tempfile::tempdir().unwrap();
        write_workspace(tmp.path(), "1.8");
        let mut config = GlobalConfig::default();
        config.check.fail_on_drift = false;
        let ctx = ReconcileContext::load_with_config(tmp.path(), None, config).unwrap();
        let plan = check_context(&ctx, false).unwrap();
        assert_eq!(plan.drift().count(), 1);
    }
}
