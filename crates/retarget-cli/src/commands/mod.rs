//! Command dispatch and handler modules.

mod apply;
mod check;
mod plan;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    tracing::debug!(command = ?cli.command, "dispatching");
    match cli.command {
        Command::Check { target } => check::exec(target.version()?, cli.verbose),
        Command::Apply { target, dry_run } => apply::exec(target.version()?, dry_run, cli.verbose),
        Command::Plan { target, json } => plan::exec(target.version()?, json),
    }
}

fn current_dir() -> Result<std::path::PathBuf> {
    std::env::current_dir().map_err(|e| retarget_util::errors::RetargetError::Io(e).into())
}
