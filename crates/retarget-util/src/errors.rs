use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all retarget operations.
#[derive(Debug, Error, Diagnostic)]
pub enum RetargetError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed manifest (a `Retarget.toml`).
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check your Retarget.toml for syntax errors"))]
    Manifest { message: String },

    /// Workspace layout is inconsistent (unknown members, evaluation cycles).
    #[error("Workspace error: {message}")]
    Workspace { message: String },

    /// A JVM version string could not be used as a toolchain target.
    #[error("Invalid JVM version: {message}")]
    #[diagnostic(help("Use a major version between 8 and 25, e.g. \"17\" or \"1.8\""))]
    Version { message: String },

    /// Build phase hooks were invoked out of order.
    #[error("Phase error: {message}")]
    Phase { message: String },

    /// Global or workspace configuration is missing something required.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type RetargetResult<T> = miette::Result<T>;
