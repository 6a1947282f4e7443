use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::version::JvmVersion;

/// Global user configuration loaded from `~/.retarget/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub check: CheckConfig,
}

/// Fallback values from `[defaults]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Used when neither the CLI nor the workspace names a target.
    #[serde(default, rename = "jvm-target")]
    pub jvm_target: Option<JvmVersion>,
}

/// `retarget check` behaviour from `[check]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    #[serde(default = "default_fail_on_drift", rename = "fail-on-drift")]
    pub fail_on_drift: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            fail_on_drift: default_fail_on_drift(),
        }
    }
}

fn default_fail_on_drift() -> bool {
    true
}

impl GlobalConfig {
    /// Load the global configuration, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            retarget_util::errors::RetargetError::Config {
                message: format!("Failed to read global config: {e}"),
            }
        })?;
        toml::from_str(&content).map_err(|e| {
            retarget_util::errors::RetargetError::Config {
                message: format!("Failed to parse global config: {e}"),
            }
            .into()
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }
}

/// Returns the path to the retarget data directory (`~/.retarget/`).
pub fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".retarget")
}
