use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use retarget_util::errors::RetargetError;

use crate::manifest::{ForceRule, Manifest};
use crate::module::Module;
use crate::properties::load_env_file;
use crate::version::JvmVersion;

/// File name of every manifest, root and member alike.
pub const MANIFEST_NAME: &str = "Retarget.toml";

/// Env file consulted for `${env:VAR}` interpolation.
pub const ENV_FILE_NAME: &str = ".retarget.env";

/// A multi-module build: the root manifest plus its member modules.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root_dir: PathBuf,
    pub manifest: Manifest,
    /// Members in declaration order; a root `[module]` comes first.
    pub members: Vec<Module>,
}

impl Workspace {
    /// Walk up from `start` to the first `Retarget.toml` declaring `[workspace]`.
    pub fn find_root(start: &Path) -> Option<PathBuf> {
        retarget_util::fs::find_ancestor_matching(start, MANIFEST_NAME, |path| {
            std::fs::read_to_string(path)
                .ok()
                .and_then(|content| Manifest::parse_toml(&content).ok())
                .map(|m| m.is_workspace())
                .unwrap_or(false)
        })
    }

    /// Find the workspace enclosing `start` and load it.
    pub fn discover(start: &Path) -> miette::Result<Self> {
        let root = Self::find_root(start).ok_or_else(|| RetargetError::Manifest {
            message: format!(
                "Could not find a {MANIFEST_NAME} with a [workspace] table in {} or any parent",
                start.display()
            ),
        })?;
        Self::load(&root)
    }

    /// Load the workspace rooted at `root_dir` and every member it lists.
    pub fn load(root_dir: &Path) -> miette::Result<Self> {
        let env_vars = load_env_file(&root_dir.join(ENV_FILE_NAME))?;
        let root_manifest_path = root_dir.join(MANIFEST_NAME);
        let manifest = Manifest::from_path_with_env(&root_manifest_path, &env_vars)?;

        let config = manifest.workspace.clone().ok_or_else(|| RetargetError::Manifest {
            message: format!(
                "{} has no [workspace] table",
                root_manifest_path.display()
            ),
        })?;

        let mut members = Vec::new();
        if manifest.module.is_some() {
            members.push(Module::from_manifest(manifest.clone(), &root_manifest_path)?);
        }

        for member in &config.members {
            let member_dir = root_dir.join(member);
            let member_manifest_path = member_dir.join(MANIFEST_NAME);
            if member_manifest_path == root_manifest_path {
                continue;
            }
            let member_manifest = Manifest::from_path_with_env(&member_manifest_path, &env_vars)?;
            members.push(Module::from_manifest(member_manifest, &member_manifest_path)?);
        }

        let mut seen = HashSet::new();
        for module in &members {
            if !seen.insert(module.name.as_str()) {
                return Err(RetargetError::Workspace {
                    message: format!("module name '{}' is declared more than once", module.name),
                }
                .into());
            }
        }

        tracing::debug!(
            root = %root_dir.display(),
            members = members.len(),
            "loaded workspace"
        );

        Ok(Self {
            root_dir: root_dir.to_path_buf(),
            manifest,
            members,
        })
    }

    /// The toolchain target pinned in the root `[toolchain]` table.
    pub fn jvm_target(&self) -> Option<JvmVersion> {
        self.manifest.toolchain.as_ref().and_then(|t| t.jvm_target)
    }

    pub fn evaluation_root(&self) -> Option<&str> {
        self.manifest
            .workspace
            .as_ref()
            .and_then(|w| w.evaluation_root.as_deref())
    }

    pub fn force_rules(&self) -> &[ForceRule] {
        self.manifest
            .resolution
            .as_ref()
            .map(|r| r.force.as_slice())
            .unwrap_or(&[])
    }

    pub fn member(&self, name: &str) -> Option<&Module> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Member manifest paths keyed by module name.
    pub fn manifest_paths(&self) -> BTreeMap<&str, &Path> {
        self.members
            .iter()
            .map(|m| (m.name.as_str(), m.manifest_path.as_path()))
            .collect()
    }
}
