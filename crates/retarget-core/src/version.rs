//! JVM toolchain version parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use retarget_util::errors::RetargetError;

/// Lowest JVM release accepted as a toolchain target.
pub const MIN_SUPPORTED: u32 = 8;

/// Highest JVM release accepted as a toolchain target.
pub const MAX_SUPPORTED: u32 = 25;

/// Why a string could not be turned into a [`JvmVersion`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("'{0}' is not a JVM version")]
    Invalid(String),

    #[error(
        "JVM {0} is not supported (expected {min} through {max})",
        min = MIN_SUPPORTED,
        max = MAX_SUPPORTED
    )]
    Unsupported(u32),
}

impl From<VersionError> for RetargetError {
    fn from(e: VersionError) -> Self {
        RetargetError::Version {
            message: e.to_string(),
        }
    }
}

/// A JVM language/bytecode level, stored as its major release number.
///
/// Accepts the spellings used across Gradle, Kotlin and Android tooling:
/// `17`, `"17"`, `"1.8"`, `"VERSION_17"`, `"JavaVersion.VERSION_1_8"`,
/// `"JvmTarget.JVM_17"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "VersionRepr", into = "String")]
pub struct JvmVersion(u32);

impl JvmVersion {
    pub fn new(major: u32) -> Result<Self, VersionError> {
        if (MIN_SUPPORTED..=MAX_SUPPORTED).contains(&major) {
            Ok(Self(major))
        } else {
            Err(VersionError::Unsupported(major))
        }
    }

    pub fn major(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for JvmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Releases up to 8 are conventionally written with the legacy `1.` prefix.
        if self.0 <= 8 {
            write!(f, "1.{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for JvmVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VersionError::Invalid(s.to_string());
        let trimmed = s.trim();

        // Qualified constants must name their own enum: `JavaVersion.VERSION_*`
        // or `JvmTarget.JVM_*`.
        let constant = if let Some(rest) = trimmed.strip_prefix("JavaVersion.") {
            Some(rest.strip_prefix("VERSION_").ok_or_else(invalid)?)
        } else if let Some(rest) = trimmed.strip_prefix("JvmTarget.") {
            Some(rest.strip_prefix("JVM_").ok_or_else(invalid)?)
        } else {
            trimmed
                .strip_prefix("VERSION_")
                .or_else(|| trimmed.strip_prefix("JVM_"))
        };

        let dotted = match constant {
            Some(rest) => rest.replace('_', "."),
            None => trimmed.to_string(),
        };

        let major_text = dotted.strip_prefix("1.").unwrap_or(dotted.as_str());
        if major_text.is_empty() || !major_text.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let major: u32 = major_text.parse().map_err(|_| invalid())?;
        Self::new(major)
    }
}

impl From<JvmVersion> for String {
    fn from(v: JvmVersion) -> Self {
        v.to_string()
    }
}

/// Manifest representation: either a bare integer or a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum VersionRepr {
    Major(u32),
    Text(String),
}

impl TryFrom<VersionRepr> for JvmVersion {
    type Error = VersionError;

    fn try_from(repr: VersionRepr) -> Result<Self, Self::Error> {
        match repr {
            VersionRepr::Major(major) => Self::new(major),
            VersionRepr::Text(text) => text.parse(),
        }
    }
}
