use retarget_core::module::{AndroidExtension, Module, ModuleKind};
use retarget_core::phase::Phase;
use retarget_core::version::JvmVersion;
use retarget_reconciler::lifecycle::Lifecycle;
use retarget_reconciler::order::EvaluationOrder;
use retarget_reconciler::plan::ReconcilePlan;
use retarget_reconciler::Outcome;

fn v(major: u32) -> JvmVersion {
    JvmVersion::new(major).unwrap()
}

fn workspace_modules() -> Vec<Module> {
    vec![
        Module::new("app", ModuleKind::AndroidApplication)
            .with_kotlin(Some(v(8)))
            .with_android(AndroidExtension {
                compile_sdk: Some(36),
                ..Default::default()
            }),
        Module::new("camera", ModuleKind::AndroidLibrary)
            .with_kotlin(Some(v(11)))
            .with_java(Some(v(11)), None),
        Module::new("shared", ModuleKind::Jvm).with_java(Some(v(8)), Some(v(8))),
    ]
}

#[test]
fn lifecycle_starts_declared() {
    let lifecycle = Lifecycle::new(v(17));
    assert_eq!(lifecycle.phase(), Phase::Declared);
    assert!(lifecycle.report().is_empty());
}

#[test]
fn run_converges_every_module() {
    let mut modules = workspace_modules();
    let order = EvaluationOrder::compute(&modules, Some("app")).unwrap();
    let report = Lifecycle::new(v(17)).run(&mut modules, &order).unwrap();

    for module in &modules {
        assert!(module.is_converged(v(17)), "{} not converged", module.name);
    }
    // One graph-ready pass per module plus one evaluated pass per module.
    assert_eq!(report.len(), 6);
    assert!(report.deferred().is_empty());
    assert_eq!(report.last_for("app").unwrap().outcome, Outcome::Surface);
    assert!(matches!(
        report.last_for("camera").unwrap().outcome,
        Outcome::Fallback { .. }
    ));
}

#[test]
fn evaluated_pass_takes_precedence() {
    let mut modules = workspace_modules();
    let mut lifecycle = Lifecycle::new(v(17));
    lifecycle.on_graph_ready(&mut modules).unwrap();

    assert_eq!(
        lifecycle.report().last_for("app").unwrap().outcome,
        Outcome::Deferred
    );

    lifecycle.on_module_evaluated(&mut modules[0]).unwrap();
    assert_eq!(lifecycle.phase(), Phase::Evaluated);
    assert_eq!(
        lifecycle.report().last_for("app").unwrap().outcome,
        Outcome::Surface
    );
}

#[test]
fn graph_ready_after_evaluated_is_rejected() {
    let mut modules = workspace_modules();
    let mut lifecycle = Lifecycle::new(v(17));
    lifecycle.on_module_evaluated(&mut modules[2]).unwrap();
    let err = lifecycle.on_graph_ready(&mut modules).unwrap_err();
    assert!(err.to_string().contains("Phase error"), "got: {err}");
}

#[test]
fn graph_ready_twice_is_harmless() {
    let mut modules = workspace_modules();
    let mut lifecycle = Lifecycle::new(v(17));
    lifecycle.on_graph_ready(&mut modules).unwrap();
    let before = modules.clone();
    lifecycle.on_graph_ready(&mut modules).unwrap();
    assert_eq!(before, modules);
}

#[test]
fn graph_ready_with_no_modules_is_a_no_op() {
    let mut modules: Vec<Module> = Vec::new();
    let mut lifecycle = Lifecycle::new(v(17));
    lifecycle.on_graph_ready(&mut modules).unwrap();
    assert!(lifecycle.finish().is_empty());
}

#[test]
fn plan_apply_matches_lifecycle_end_state() {
    let mut via_lifecycle = workspace_modules();
    let order = EvaluationOrder::compute(&via_lifecycle, Some("app")).unwrap();
    Lifecycle::new(v(17)).run(&mut via_lifecycle, &order).unwrap();

    let mut via_plan = workspace_modules();
    let plan = ReconcilePlan::collect_modules(&via_plan, Some("app"), &[], v(17)).unwrap();
    plan.apply(&mut via_plan).unwrap();

    assert_eq!(via_lifecycle, via_plan);
}

#[test]
fn run_rejects_order_from_a_different_module_set() {
    let order = EvaluationOrder::compute(&workspace_modules(), None).unwrap();
    let mut fewer = workspace_modules();
    fewer.truncate(1);

    let err = Lifecycle::new(v(17)).run(&mut fewer, &order).unwrap_err();
    assert!(
        err.to_string().contains("evaluation order refers to module #1"),
        "got: {err}"
    );
}
