use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::module::{AndroidExtension, JavaOptions, KotlinOptions, ModuleKind};
use crate::version::JvmVersion;

/// The parsed representation of a `Retarget.toml` file.
///
/// The workspace root carries `[workspace]` (plus `[toolchain]` and
/// `[resolution]`); each member carries `[module]` and its compiler tables.
/// A single-module build may put both in one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub workspace: Option<WorkspaceConfig>,

    #[serde(default)]
    pub toolchain: Option<ToolchainConfig>,

    #[serde(default)]
    pub resolution: Option<ResolutionConfig>,

    #[serde(default)]
    pub module: Option<ModuleMetadata>,

    #[serde(default)]
    pub kotlin: Option<KotlinOptions>,

    #[serde(default)]
    pub java: Option<JavaOptions>,

    #[serde(default)]
    pub android: Option<AndroidExtension>,

    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

/// Workspace configuration from the `[workspace]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub members: Vec<String>,
    /// Module every other member is evaluated after.
    #[serde(default, rename = "evaluation-root")]
    pub evaluation_root: Option<String>,
}

/// Toolchain settings from `[toolchain]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolchainConfig {
    #[serde(default, rename = "jvm-target")]
    pub jvm_target: Option<JvmVersion>,
}

/// Dependency resolution rules from `[resolution]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolutionConfig {
    #[serde(default)]
    pub force: Vec<ForceRule>,
}

/// A `[[resolution.force]]` entry pinning every matching dependency to `version`.
///
/// Without `artifact` the rule covers the whole group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForceRule {
    pub group: String,
    #[serde(default)]
    pub artifact: Option<String>,
    pub version: String,
}

/// Module identity from the `[module]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleMetadata {
    pub name: String,
    #[serde(default)]
    pub kind: ModuleKind,
    #[serde(default, rename = "evaluation-depends-on")]
    pub evaluation_depends_on: Vec<String>,
}

impl Manifest {
    /// Load and parse a `Retarget.toml`, resolving `${env:VAR}` references
    /// with `.retarget.env` next to it and the process environment.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let dir = path.parent().unwrap_or(Path::new("."));
        let env_vars = crate::properties::load_env_file(&dir.join(crate::workspace::ENV_FILE_NAME))
            .unwrap_or_default();
        Self::from_path_with_env(path, &env_vars)
    }

    /// Like [`Manifest::from_path`] but with an already-loaded env map.
    pub fn from_path_with_env(
        path: &Path,
        env_vars: &BTreeMap<String, String>,
    ) -> miette::Result<Self> {
        let content = retarget_util::fs::read_manifest(path)?;
        let resolved = crate::properties::interpolate(&content, env_vars);
        Self::parse_toml(&resolved).map_err(|e| {
            retarget_util::errors::RetargetError::Manifest {
                message: format!("{}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Parse a `Retarget.toml` from a string (no interpolation).
    pub fn parse_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn is_workspace(&self) -> bool {
        self.workspace.is_some()
    }
}
