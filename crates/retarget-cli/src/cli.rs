//! CLI argument definitions for retarget.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use clap::{Args, Parser, Subcommand};

use retarget_core::version::JvmVersion;
use retarget_util::errors::RetargetError;

#[derive(Parser, Debug)]
#[command(
    name = "retarget",
    version,
    about = "Keep every module of a multi-module JVM build on one toolchain target",
    long_about = "retarget reconciles Kotlin jvmTarget, Java source/target compatibility and \
                  Android compileOptions across every module of a workspace, deferring \
                  platform extensions until they are safe to change."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Target selection shared by every command.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// JVM target to reconcile to (e.g. 17, 1.8, VERSION_21)
    #[arg(long = "jvm-target", env = "RETARGET_JVM_TARGET")]
    pub jvm_target: Option<String>,
}

impl TargetArgs {
    /// The requested target, if one was given on the command line or in the environment.
    pub fn version(&self) -> miette::Result<Option<JvmVersion>> {
        self.jvm_target
            .as_deref()
            .map(|raw| raw.parse::<JvmVersion>().map_err(RetargetError::from))
            .transpose()
            .map_err(Into::into)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report modules whose compiler versions drift from the target
    Check {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Reconcile every module and write the result to its Retarget.toml
    Apply {
        #[command(flatten)]
        target: TargetArgs,
        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Show evaluation order and every reconcile pass of a build invocation
    Plan {
        #[command(flatten)]
        target: TargetArgs,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Parse CLI arguments from `std::env::args`.
pub fn parse() -> Cli {
    Cli::parse()
}
