//! Operation: reconcile the workspace and write the result back.
//!
//! Only fields that change are touched, using format-preserving edits so
//! comments and layout of each `Retarget.toml` survive.

use std::path::Path;

use toml_edit::{DocumentMut, Item, Table, TableLike, Value};

use retarget_core::surface::Change;
use retarget_core::version::JvmVersion;
use retarget_core::workspace::Workspace;
use retarget_reconciler::plan::{ModulePlan, ReconcilePlan};
use retarget_util::errors::RetargetError;
use retarget_util::progress::{status, status_info, status_warn};

use crate::ReconcileContext;

/// Options for `retarget apply`.
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    pub target: Option<JvmVersion>,
    /// Print what would change without writing anything.
    pub dry_run: bool,
    pub verbose: bool,
}

/// What an apply run wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub manifests_written: usize,
    pub fields_written: usize,
    /// `${env:VAR}` references overwritten with a literal value.
    pub env_references_replaced: usize,
}

/// Apply the reconcile plan to the workspace enclosing `project_dir`.
pub fn apply(project_dir: &Path, opts: &ApplyOptions) -> miette::Result<ApplySummary> {
    let ctx = ReconcileContext::load(project_dir, opts.target)?;
    apply_context(&ctx, opts)
}

pub fn apply_context(ctx: &ReconcileContext, opts: &ApplyOptions) -> miette::Result<ApplySummary> {
    let plan = ReconcilePlan::collect(&ctx.workspace, ctx.target)?;
    let mut summary = ApplySummary::default();

    for module_plan in plan.drift() {
        let Some(module) = ctx.workspace.member(&module_plan.module) else {
            continue;
        };
        let label = if opts.dry_run { "Would update" } else { "Updating" };
        status(
            label,
            &format!("{} ({})", module_plan.module, module.manifest_path.display()),
        );
        if opts.verbose || opts.dry_run {
            for change in &module_plan.changes {
                eprintln!("      {change}");
            }
            for dep in &module_plan.forced {
                eprintln!("      dependencies.{}: {dep}", dep.key);
            }
        }

        summary.fields_written += module_plan.changes.len() + module_plan.forced.len();
        if opts.dry_run {
            continue;
        }
        let replaced = write_module_manifest(&module.manifest_path, module_plan)?;
        for field in &replaced {
            tracing::warn!(module = %module_plan.module, %field, "env reference replaced");
            status_warn(
                "Replacing",
                &format!("{field} in {} with a literal value", module.manifest_path.display()),
            );
        }
        summary.env_references_replaced += replaced.len();
        summary.manifests_written += 1;
    }

    if summary.fields_written == 0 {
        status(
            "Finished",
            &format!("all {} module(s) already target JVM {}", plan.modules.len(), ctx.target),
        );
        return Ok(summary);
    }

    if opts.dry_run {
        status_info(
            "Dry run",
            &format!("{} field(s) would change; nothing written", summary.fields_written),
        );
        return Ok(summary);
    }

    verify(&ctx.workspace.root_dir, ctx.target)?;
    status(
        "Finished",
        &format!(
            "{} field(s) in {} manifest(s) now target JVM {}",
            summary.fields_written, summary.manifests_written, ctx.target
        ),
    );
    Ok(summary)
}

/// Reload the workspace and confirm nothing is left to change.
fn verify(root_dir: &Path, target: JvmVersion) -> miette::Result<()> {
    let reloaded = Workspace::load(root_dir)?;
    let plan = ReconcilePlan::collect(&reloaded, target)?;
    for module in plan.drift() {
        tracing::warn!(module = %module.module, "module still out of sync after apply");
        status_warn("Unsettled", &module.module);
    }
    Ok(())
}

/// Write one module's planned changes into its `Retarget.toml`.
///
/// Returns the fields whose `${env:VAR}` reference was replaced, as
/// `path.key (was "${env:VAR}")`.
pub fn write_module_manifest(
    manifest_path: &Path,
    plan: &ModulePlan,
) -> miette::Result<Vec<String>> {
    let content = retarget_util::fs::read_manifest(manifest_path)?;
    let mut doc: DocumentMut = content.parse().map_err(|e| RetargetError::Manifest {
        message: format!("Failed to parse {}: {e}", manifest_path.display()),
    })?;

    let mut replaced = Vec::new();
    for change in &plan.changes {
        if let Some(raw) = write_change(&mut doc, change)? {
            replaced.push(format!("{}.{} (was \"{raw}\")", change.site, change.field.key()));
        }
    }
    for dep in &plan.forced {
        if let Some(raw) = set_value(&mut doc, &["dependencies"], &dep.key, &dep.coordinate())? {
            replaced.push(format!("dependencies.{} (was \"{raw}\")", dep.key));
        }
    }

    std::fs::write(manifest_path, doc.to_string()).map_err(RetargetError::Io)?;
    Ok(replaced)
}

fn write_change(doc: &mut DocumentMut, change: &Change) -> miette::Result<Option<String>> {
    set_value(
        doc,
        change.site.table_path(),
        change.field.key(),
        &change.to.to_string(),
    )
}

/// Set `path.key = value`, creating tables along `path` as needed and
/// keeping the decoration of an existing value.
///
/// Returns the previous raw string when it held an `${env:VAR}` reference.
fn set_value(
    doc: &mut DocumentMut,
    path: &[&str],
    key: &str,
    value: &str,
) -> miette::Result<Option<String>> {
    let mut current: &mut dyn TableLike = doc.as_table_mut();
    for &segment in path {
        if current.get(segment).is_none() {
            current.insert(segment, Item::Table(Table::new()));
        }
        current = current
            .get_mut(segment)
            .and_then(Item::as_table_like_mut)
            .ok_or_else(|| RetargetError::Manifest {
                message: format!("`{segment}` is not a table"),
            })?;
    }

    let mut new_value = Value::from(value);
    let mut env_reference = None;
    if let Some(existing) = current.get(key).and_then(Item::as_value) {
        *new_value.decor_mut() = existing.decor().clone();
        env_reference = existing
            .as_str()
            .filter(|raw| raw.contains("${env:"))
            .map(str::to_string);
    }
    current.insert(key, Item::Value(new_value));
    Ok(env_reference)
}
