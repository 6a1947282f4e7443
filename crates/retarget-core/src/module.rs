use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::manifest::Manifest;
use crate::phase::Phase;
use crate::surface::{Change, CompilerVersionConfigurable, Field, Site, SurfaceError};
use crate::version::JvmVersion;

/// What kind of build module a member is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleKind {
    /// Plain Kotlin/JVM or Java module.
    #[default]
    Jvm,
    AndroidApplication,
    AndroidLibrary,
}

impl ModuleKind {
    /// Android modules carry a platform extension whose compile options
    /// override the plain Java compile task settings.
    pub fn has_platform_extension(self) -> bool {
        matches!(self, Self::AndroidApplication | Self::AndroidLibrary)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jvm => "jvm",
            Self::AndroidApplication => "android-application",
            Self::AndroidLibrary => "android-library",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kotlin compile task options from `[kotlin]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KotlinOptions {
    #[serde(default, rename = "jvm-target")]
    pub jvm_target: Option<JvmVersion>,
}

impl KotlinOptions {
    /// Set `jvm-target`, returning the change if the value moved.
    pub fn apply_jvm_target(&mut self, version: JvmVersion) -> Option<Change> {
        if self.jvm_target == Some(version) {
            return None;
        }
        let from = self.jvm_target.replace(version);
        Some(Change {
            site: Site::KotlinCompile,
            field: Field::JvmTarget,
            from,
            to: version,
        })
    }
}

/// Java compile task options from `[java]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaOptions {
    #[serde(default, rename = "source-compatibility")]
    pub source_compatibility: Option<JvmVersion>,
    #[serde(default, rename = "target-compatibility")]
    pub target_compatibility: Option<JvmVersion>,
}

impl JavaOptions {
    pub fn is_overridden(&self) -> bool {
        self.source_compatibility.is_some() || self.target_compatibility.is_some()
    }
}

impl CompilerVersionConfigurable for JavaOptions {
    fn site(&self) -> Site {
        Site::JavaCompile
    }

    fn source_compatibility(&self) -> Option<JvmVersion> {
        self.source_compatibility
    }

    fn target_compatibility(&self) -> Option<JvmVersion> {
        self.target_compatibility
    }

    fn set_source_compatibility(&mut self, version: JvmVersion) {
        self.source_compatibility = Some(version);
    }

    fn set_target_compatibility(&mut self, version: JvmVersion) {
        self.target_compatibility = Some(version);
    }
}

/// `[android.compile-options]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    #[serde(default, rename = "source-compatibility")]
    pub source_compatibility: Option<JvmVersion>,
    #[serde(default, rename = "target-compatibility")]
    pub target_compatibility: Option<JvmVersion>,
}

/// The Android platform extension from `[android]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AndroidExtension {
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default, rename = "compile-sdk")]
    pub compile_sdk: Option<u32>,
    #[serde(default, rename = "compile-options")]
    pub compile_options: CompileOptions,
}

impl CompilerVersionConfigurable for AndroidExtension {
    fn site(&self) -> Site {
        Site::AndroidCompileOptions
    }

    fn source_compatibility(&self) -> Option<JvmVersion> {
        self.compile_options.source_compatibility
    }

    fn target_compatibility(&self) -> Option<JvmVersion> {
        self.compile_options.target_compatibility
    }

    fn set_source_compatibility(&mut self, version: JvmVersion) {
        self.compile_options.source_compatibility = Some(version);
    }

    fn set_target_compatibility(&mut self, version: JvmVersion) {
        self.compile_options.target_compatibility = Some(version);
    }

    fn validate(&self) -> Result<(), SurfaceError> {
        // Without a compile SDK there is no bootclasspath to configure against.
        if self.compile_sdk.is_none() {
            return Err(SurfaceError::Incomplete {
                reason: "compile-sdk is not set".to_string(),
            });
        }
        Ok(())
    }

    fn ready_in(&self, phase: Phase) -> bool {
        phase == Phase::Evaluated
    }
}

/// State of a module's Kotlin `jvm-target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "version", rename_all = "kebab-case")]
pub enum KotlinTarget {
    /// The Kotlin plugin is not applied to the module.
    NotApplied,
    /// `[kotlin]` is present but `jvm-target` is not set.
    Unset,
    Set(JvmVersion),
}

/// The compiler versions a module's compiler invocations will actually use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedVersions {
    pub kotlin_jvm_target: KotlinTarget,
    pub java_source: Option<JvmVersion>,
    pub java_target: Option<JvmVersion>,
}

impl ResolvedVersions {
    /// Every compiler invocation of the module targets `version`.
    pub fn matches(&self, version: JvmVersion) -> bool {
        let kotlin_ok = match self.kotlin_jvm_target {
            KotlinTarget::NotApplied => true,
            KotlinTarget::Unset => false,
            KotlinTarget::Set(jvm_target) => jvm_target == version,
        };
        kotlin_ok && self.java_source == Some(version) && self.java_target == Some(version)
    }
}

/// A unit of the build graph with its own compiler configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub kind: ModuleKind,
    pub root_dir: PathBuf,
    pub manifest_path: PathBuf,
    /// Present iff the Kotlin plugin is applied.
    pub kotlin: Option<KotlinOptions>,
    pub java: JavaOptions,
    /// Only consulted for kinds with a platform extension.
    pub android: Option<AndroidExtension>,
    pub evaluation_depends_on: Vec<String>,
    /// `name -> "group:artifact:version"`.
    pub dependencies: BTreeMap<String, String>,
}

impl Module {
    /// An in-memory module with no manifest on disk.
    pub fn new(name: impl Into<String>, kind: ModuleKind) -> Self {
        Self {
            name: name.into(),
            kind,
            root_dir: PathBuf::new(),
            manifest_path: PathBuf::new(),
            kotlin: None,
            java: JavaOptions::default(),
            android: None,
            evaluation_depends_on: Vec::new(),
            dependencies: BTreeMap::new(),
        }
    }

    pub fn with_kotlin(mut self, jvm_target: Option<JvmVersion>) -> Self {
        self.kotlin = Some(KotlinOptions { jvm_target });
        self
    }

    pub fn with_java(mut self, source: Option<JvmVersion>, target: Option<JvmVersion>) -> Self {
        self.java = JavaOptions {
            source_compatibility: source,
            target_compatibility: target,
        };
        self
    }

    pub fn with_android(mut self, android: AndroidExtension) -> Self {
        self.android = Some(android);
        self
    }

    pub fn depends_on(mut self, module: impl Into<String>) -> Self {
        self.evaluation_depends_on.push(module.into());
        self
    }

    /// Build a module from a member manifest that has a `[module]` table.
    pub fn from_manifest(manifest: Manifest, manifest_path: &Path) -> miette::Result<Self> {
        let meta = manifest.module.ok_or_else(|| {
            retarget_util::errors::RetargetError::Manifest {
                message: format!("{} has no [module] table", manifest_path.display()),
            }
        })?;
        let root_dir = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(Self {
            name: meta.name,
            kind: meta.kind,
            root_dir,
            manifest_path: manifest_path.to_path_buf(),
            kotlin: manifest.kotlin,
            java: manifest.java.unwrap_or_default(),
            android: manifest.android,
            evaluation_depends_on: meta.evaluation_depends_on,
            dependencies: manifest.dependencies,
        })
    }

    pub fn has_platform_extension(&self) -> bool {
        self.kind.has_platform_extension()
    }

    /// The platform extension, if this module exposes a usable one.
    pub fn platform_surface(&self) -> Result<&AndroidExtension, SurfaceError> {
        let ext = self.android.as_ref().ok_or(SurfaceError::Missing)?;
        ext.validate()?;
        Ok(ext)
    }

    pub fn platform_surface_mut(&mut self) -> Result<&mut AndroidExtension, SurfaceError> {
        let ext = self.android.as_mut().ok_or(SurfaceError::Missing)?;
        ext.validate()?;
        Ok(ext)
    }

    /// Compiler versions after applying override precedence: an explicit
    /// Java task setting wins over the platform extension's compile options.
    pub fn resolved(&self) -> ResolvedVersions {
        let platform = if self.has_platform_extension() {
            self.android.as_ref().map(|a| &a.compile_options)
        } else {
            None
        };

        ResolvedVersions {
            kotlin_jvm_target: match &self.kotlin {
                None => KotlinTarget::NotApplied,
                Some(KotlinOptions { jvm_target: None }) => KotlinTarget::Unset,
                Some(KotlinOptions {
                    jvm_target: Some(version),
                }) => KotlinTarget::Set(*version),
            },
            java_source: self
                .java
                .source_compatibility
                .or_else(|| platform.and_then(|p| p.source_compatibility)),
            java_target: self
                .java
                .target_compatibility
                .or_else(|| platform.and_then(|p| p.target_compatibility)),
        }
    }

    pub fn is_converged(&self, version: JvmVersion) -> bool {
        self.resolved().matches(version)
    }
}
