//! Check command implementation.

use miette::Result;

use retarget_core::version::JvmVersion;

pub fn exec(target: Option<JvmVersion>, verbose: bool) -> Result<()> {
    let cwd = super::current_dir()?;
    retarget_ops::ops_check::check(&cwd, target, verbose).map(|_| ())
}
