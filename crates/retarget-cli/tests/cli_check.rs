use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn retarget_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("retarget").unwrap();
    cmd.env("HOME", home).env_remove("RETARGET_JVM_TARGET");
    cmd
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn workspace(kotlin_target: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(
        &tmp.path().join("Retarget.toml"),
        "[workspace]\nmembers = [\"core\"]\n\n[toolchain]\njvm-target = \"17\"\n",
    );
    write(
        &tmp.path().join("core/Retarget.toml"),
        &format!(
            "[module]\nname = \"core\"\n\n[kotlin]\njvm-target = \"{kotlin_target}\"\n\n\
             [java]\nsource-compatibility = \"17\"\ntarget-compatibility = \"17\"\n"
        ),
    );
    tmp
}

#[test]
fn test_check_without_workspace_fails() {
    let tmp = TempDir::new().unwrap();
    retarget_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not find a Retarget.toml"));
}

#[test]
fn test_check_in_sync_succeeds() {
    let tmp = workspace("17");
    retarget_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["check"])
        .assert()
        .success()
        .stderr(predicate::str::contains("all 1 module(s) target JVM 17"));
}

#[test]
fn test_check_drift_fails() {
    let tmp = workspace("1.8");
    retarget_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("kotlin.jvm-target: 1.8 -> 17"))
        .stderr(predicate::str::contains("1 module(s) out of sync"));
}

#[test]
fn test_check_runs_from_member_directory() {
    let tmp = workspace("17");
    retarget_cmd(tmp.path())
        .current_dir(tmp.path().join("core"))
        .args(["check"])
        .assert()
        .success();
}

#[test]
fn test_check_jvm_target_flag_overrides_workspace() {
    let tmp = workspace("17");
    retarget_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["check", "--jvm-target", "21"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of sync with JVM 21"));
}

#[test]
fn test_check_env_var_sets_target() {
    let tmp = workspace("17");
    retarget_cmd(tmp.path())
        .current_dir(tmp.path())
        .env("RETARGET_JVM_TARGET", "11")
        .args(["check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of sync with JVM 11"));
}

#[test]
fn test_check_rejects_unsupported_target() {
    let tmp = workspace("17");
    retarget_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["check", "--jvm-target", "6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JVM version"))
        .stderr(predicate::str::contains("JVM 6 is not supported"));
}

#[test]
fn test_check_rejects_malformed_env_target() {
    let tmp = workspace("17");
    retarget_cmd(tmp.path())
        .current_dir(tmp.path())
        .env("RETARGET_JVM_TARGET", "bogus.17")
        .args(["check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JVM version"))
        .stderr(predicate::str::contains("'bogus.17' is not a JVM version"));
}

#[test]
fn test_check_respects_global_fail_on_drift() {
    let tmp = workspace("1.8");
    write(
        &tmp.path().join(".retarget/config.toml"),
        "[check]\nfail-on-drift = false\n",
    );
    retarget_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["check"])
        .assert()
        .success()
        .stderr(predicate::str::contains("out of sync"));
}
