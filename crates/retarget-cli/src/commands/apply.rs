use miette::Result;

use retarget_core::version::JvmVersion;
use retarget_ops::ops_apply::{self, ApplyOptions};

pub fn exec(target: Option<JvmVersion>, dry_run: bool, verbose: bool) -> Result<()> {
    let cwd = super::current_dir()?;
    let opts = ApplyOptions {
        target,
        dry_run,
        verbose,
    };
    ops_apply::apply(&cwd, &opts).map(|_| ())
}
