//! Compiler-version configuration surfaces.
//!
//! A surface is any place a module lets you set the JVM source/target level
//! of its compiler invocation. Surfaces are a static capability: a module
//! either exposes one through [`CompilerVersionConfigurable`] or it doesn't.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::phase::Phase;
use crate::version::JvmVersion;

/// Where a compiler version lives in a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Site {
    /// Kotlin compile tasks (`[kotlin]`).
    KotlinCompile,
    /// Java compile tasks (`[java]`).
    JavaCompile,
    /// The Android extension's compile options (`[android.compile-options]`).
    AndroidCompileOptions,
}

impl Site {
    /// Table path of this site inside a member `Retarget.toml`.
    pub fn table_path(&self) -> &'static [&'static str] {
        match self {
            Self::KotlinCompile => &["kotlin"],
            Self::JavaCompile => &["java"],
            Self::AndroidCompileOptions => &["android", "compile-options"],
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.table_path().join("."))
    }
}

/// A version-carrying field of a [`Site`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Field {
    JvmTarget,
    SourceCompatibility,
    TargetCompatibility,
}

impl Field {
    /// The manifest key for this field.
    pub fn key(&self) -> &'static str {
        match self {
            Self::JvmTarget => "jvm-target",
            Self::SourceCompatibility => "source-compatibility",
            Self::TargetCompatibility => "target-compatibility",
        }
    }
}

/// One field that moved (or would move) from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub site: Site,
    pub field: Field,
    pub from: Option<JvmVersion>,
    pub to: JvmVersion,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let from = self
            .from
            .map(|v| v.to_string())
            .unwrap_or_else(|| "unset".to_string());
        write!(f, "{}.{}: {} -> {}", self.site, self.field.key(), from, self.to)
    }
}

/// A configuration surface that cannot take a version right now.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The module declares a platform extension kind but provides no extension.
    #[error("platform extension is missing")]
    Missing,

    /// The extension exists but lacks what it needs to configure the compiler.
    #[error("platform extension is incomplete: {reason}")]
    Incomplete { reason: String },
}

/// The capability to have JVM source/target compatibility set.
pub trait CompilerVersionConfigurable {
    fn site(&self) -> Site;

    fn source_compatibility(&self) -> Option<JvmVersion>;

    fn target_compatibility(&self) -> Option<JvmVersion>;

    fn set_source_compatibility(&mut self, version: JvmVersion);

    fn set_target_compatibility(&mut self, version: JvmVersion);

    /// Checks that the surface is well-formed enough to accept a version.
    fn validate(&self) -> Result<(), SurfaceError> {
        Ok(())
    }

    /// Whether the surface may be mutated during `phase`.
    fn ready_in(&self, phase: Phase) -> bool {
        phase >= Phase::GraphReady
    }

    /// Validate the surface, then set source and target compatibility to
    /// `version`.
    ///
    /// Returns only the fields that actually changed, so applying the same
    /// version twice yields an empty list the second time.
    fn apply_compatibility(&mut self, version: JvmVersion) -> Result<Vec<Change>, SurfaceError> {
        self.validate()?;
        Ok(self.write_compatibility(version))
    }

    /// Set source and target compatibility to `version` without validating.
    fn write_compatibility(&mut self, version: JvmVersion) -> Vec<Change> {
        let site = self.site();
        let mut changes = Vec::new();

        let source = self.source_compatibility();
        if source != Some(version) {
            self.set_source_compatibility(version);
            changes.push(Change {
                site,
                field: Field::SourceCompatibility,
                from: source,
                to: version,
            });
        }

        let target = self.target_compatibility();
        if target != Some(version) {
            self.set_target_compatibility(version);
            changes.push(Change {
                site,
                field: Field::TargetCompatibility,
                from: target,
                to: version,
            });
        }

        changes
    }
}
