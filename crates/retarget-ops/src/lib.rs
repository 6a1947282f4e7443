pub mod ops_apply;
pub mod ops_check;
pub mod ops_plan;

use std::path::Path;

use retarget_core::config::GlobalConfig;
use retarget_core::version::JvmVersion;
use retarget_core::workspace::Workspace;
use retarget_util::errors::RetargetError;

/// Everything an operation needs: the loaded workspace, the effective
/// toolchain target and the global configuration.
#[derive(Debug, Clone)]
pub struct ReconcileContext {
    pub workspace: Workspace,
    pub target: JvmVersion,
    pub config: GlobalConfig,
}

impl ReconcileContext {
    /// Discover the workspace enclosing `start` and resolve the target.
    pub fn load(start: &Path, cli_target: Option<JvmVersion>) -> miette::Result<Self> {
        Self::load_with_config(start, cli_target, GlobalConfig::load()?)
    }

    pub fn load_with_config(
        start: &Path,
        cli_target: Option<JvmVersion>,
        config: GlobalConfig,
    ) -> miette::Result<Self> {
        let workspace = Workspace::discover(start)?;
        let target = resolve_target(cli_target, &workspace, &config)?;
        tracing::debug!(
            root = %workspace.root_dir.display(),
            jvm_target = %target,
            "resolved reconcile context"
        );
        Ok(Self {
            workspace,
            target,
            config,
        })
    }
}

/// Pick the toolchain target: CLI (or `RETARGET_JVM_TARGET`), then the
/// workspace `[toolchain]`, then the global `[defaults]`.
pub fn resolve_target(
    cli_target: Option<JvmVersion>,
    workspace: &Workspace,
    config: &GlobalConfig,
) -> miette::Result<JvmVersion> {
    cli_target
        .or_else(|| workspace.jvm_target())
        .or(config.defaults.jvm_target)
        .ok_or_else(|| {
            RetargetError::Config {
                message: "No JVM target configured. Pass --jvm-target, set [toolchain] jvm-target \
                          in the workspace Retarget.toml, or [defaults] jvm-target in \
                          ~/.retarget/config.toml"
                    .to_string(),
            }
            .into()
        })
}
