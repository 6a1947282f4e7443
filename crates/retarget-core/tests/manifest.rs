use retarget_core::manifest::{ForceRule, Manifest};
use retarget_core::module::{Module, ModuleKind};

#[test]
fn parse_workspace_manifest() {
    let manifest = Manifest::parse_toml(
        r#"
[workspace]
members = ["app", "plugins/camera"]
evaluation-root = "app"

[toolchain]
jvm-target = "17"

[[resolution.force]]
group = "com.google.android.play"
artifact = "core"
version = "1.10.3"

[[resolution.force]]
group = "joda-time"
version = "2.12.7"
"#,
    )
    .unwrap();

    assert!(manifest.is_workspace());
    let ws = manifest.workspace.unwrap();
    assert_eq!(ws.members, vec!["app", "plugins/camera"]);
    assert_eq!(ws.evaluation_root.as_deref(), Some("app"));
    assert_eq!(manifest.toolchain.unwrap().jvm_target.unwrap().major(), 17);

    let rules = manifest.resolution.unwrap().force;
    assert_eq!(rules.len(), 2);
    assert_eq!(
        rules[1],
        ForceRule {
            group: "joda-time".to_string(),
            artifact: None,
            version: "2.12.7".to_string(),
        }
    );
}

#[test]
fn parse_android_member_manifest() {
    let manifest = Manifest::parse_toml(
        r#"
[module]
name = "camera"
kind = "android-library"
evaluation-depends-on = ["core"]

[kotlin]
jvm-target = "1.8"

[android]
namespace = "dev.example.camera"
compile-sdk = 36

[android.compile-options]
source-compatibility = "VERSION_1_8"
target-compatibility = 8

[dependencies]
play-core = "com.google.android.play:core:1.10.0"
"#,
    )
    .unwrap();

    assert!(!manifest.is_workspace());
    let module = Module::from_manifest(manifest, std::path::Path::new("/ws/camera/Retarget.toml"))
        .unwrap();
    assert_eq!(module.name, "camera");
    assert_eq!(module.kind, ModuleKind::AndroidLibrary);
    assert_eq!(module.evaluation_depends_on, vec!["core"]);
    assert_eq!(module.root_dir, std::path::PathBuf::from("/ws/camera"));
    assert_eq!(module.kotlin.unwrap().jvm_target.unwrap().major(), 8);
    let android = module.android.unwrap();
    assert_eq!(android.compile_sdk, Some(36));
    assert_eq!(
        android.compile_options.target_compatibility.unwrap().major(),
        8
    );
    assert!(module.dependencies.contains_key("play-core"));
}

#[test]
fn module_kind_defaults_to_jvm() {
    let manifest = Manifest::parse_toml("[module]\nname = \"core\"\n").unwrap();
    let module = Module::from_manifest(manifest, std::path::Path::new("Retarget.toml")).unwrap();
    assert_eq!(module.kind, ModuleKind::Jvm);
    assert!(module.kotlin.is_none());
}

#[test]
fn module_from_manifest_without_module_table_fails() {
    let manifest = Manifest::parse_toml("[workspace]\nmembers = []\n").unwrap();
    let err = Module::from_manifest(manifest, std::path::Path::new("Retarget.toml")).unwrap_err();
    assert!(err.to_string().contains("has no [module] table"), "got: {err}");
}

#[test]
fn unknown_module_kind_is_rejected() {
    assert!(Manifest::parse_toml("[module]\nname = \"x\"\nkind = \"ios\"\n").is_err());
}

#[test]
fn unsupported_jvm_target_is_rejected() {
    assert!(Manifest::parse_toml("[kotlin]\njvm-target = \"1.6\"\n").is_err());
}

#[test]
fn from_path_interpolates_env_file() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join(".retarget.env"), "RT_TEST_TARGET=21\n").unwrap();
    let path = tmp.path().join("Retarget.toml");
    std::fs::write(
        &path,
        "[workspace]\nmembers = []\n\n[toolchain]\njvm-target = \"${env:RT_TEST_TARGET}\"\n",
    )
    .unwrap();

    let manifest = Manifest::from_path(&path).unwrap();
    assert_eq!(manifest.toolchain.unwrap().jvm_target.unwrap().major(), 21);
}

#[test]
fn from_path_reports_parse_errors_with_path() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("Retarget.toml");
    std::fs::write(&path, "[workspace\n").unwrap();
    let err = Manifest::from_path(&path).unwrap_err();
    assert!(err.to_string().contains("Manifest error"), "got: {err}");
}
