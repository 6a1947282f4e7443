use miette::Result;

use retarget_core::version::JvmVersion;
use retarget_ops::ops_plan::{self, PlanOptions};

pub fn exec(target: Option<JvmVersion>, json: bool) -> Result<()> {
    let cwd = super::current_dir()?;
    ops_plan::plan(&cwd, &PlanOptions { target, json }).map(|_| ())
}
