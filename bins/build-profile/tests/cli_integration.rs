use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const VALID: &str = r#"
plugins = ["com.android.application", "kotlin-android", "dev.flutter.flutter-gradle-plugin"]
application_id = "com.acme.varx"

[properties]
"flutter.compileSdkVersion" = 35

[sdk]
min = 23
target = 35
compile = "flutter.compileSdkVersion"

[variants.release]
signing_config = "debug"
minify = false

[[dependencies]]
name = "androidx.multidex:multidex"
version = "2.0.1"
"#;

fn workspace(profile: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("profile.toml"), profile).unwrap();
    dir
}

fn cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("build-profile").unwrap();
    cmd.current_dir(dir).arg("--no-color").env_remove("RUST_LOG");
    cmd
}

#[test]
fn check_valid_profile() {
    let dir = workspace(VALID);
    cmd(dir.path())
        .args(["check", "profile.toml"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Build profile is valid"))
        .stderr(predicate::str::contains("RELEASE_NOT_MINIFIED"));
}

#[test]
fn check_missing_application_id_is_config_error() {
    let dir = workspace("[sdk]\nmin = 21\ntarget = 34\ncompile = 34\n");
    cmd(dir.path())
        .args(["check", "profile.toml"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("application_id"))
        .stderr(predicate::str::contains("E3005"));
}

#[test]
fn check_inverted_sdk_is_config_error() {
    let dir = workspace("application_id = \"com.acme.app\"\n[sdk]\nmin = 30\ntarget = 20\ncompile = 34\n");
    cmd(dir.path())
        .args(["check", "profile.toml"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("sdk.min"))
        .stderr(predicate::str::contains("E3006"));
}

#[test]
fn check_duplicate_dependency_is_violation() {
    let profile = format!(
        "{}\n[[dependencies]]\nname = \"androidx.multidex:multidex\"\nversion = \"1.0.3\"\n",
        VALID
    );
    let dir = workspace(&profile);
    cmd(dir.path())
        .args(["check", "profile.toml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("DUPLICATE_DEPENDENCY"));
}

#[test]
fn check_json_output() {
    let dir = workspace(VALID);
    let output = cmd(dir.path())
        .args(["check", "profile.toml", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], true);
    assert!(report["warnings"].as_array().unwrap().iter().any(|w| w["code"] == "RELEASE_NOT_MINIFIED"));
}

#[test]
fn check_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .args(["check", "absent.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("absent.toml"));
}

#[test]
fn policy_from_config_file() {
    let dir = workspace(VALID);
    fs::write(
        dir.path().join(".build-profile.toml"),
        "[profile]\npath = \"profile.toml\"\n\n[policy]\nrequire_release_minify = true\n",
    )
    .unwrap();

    cmd(dir.path())
        .arg("check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("RELEASE_NOT_MINIFIED"));
}

#[test]
fn show_resolves_references() {
    let dir = workspace(VALID);
    let output = cmd(dir.path())
        .args(["show", "profile.toml", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let profile: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(profile["application_id"], "com.acme.varx");
    assert_eq!(profile["sdk"]["compile"], 35);
}

#[test]
fn show_output_reloads() {
    let dir = workspace(VALID);
    let output = cmd(dir.path()).args(["show", "profile.toml"]).output().unwrap();
    assert!(output.status.success());
    fs::write(dir.path().join("normalized.toml"), &output.stdout).unwrap();

    let again = cmd(dir.path()).args(["show", "normalized.toml"]).output().unwrap();
    assert!(again.status.success());
    assert_eq!(output.stdout, again.stdout);
}

#[test]
fn render_to_file() {
    let dir = workspace(VALID);
    cmd(dir.path())
        .args(["render", "profile.toml", "--output", "build.gradle.kts"])
        .assert()
        .success();

    let script = fs::read_to_string(dir.path().join("build.gradle.kts")).unwrap();
    assert!(script.contains(r#"id("dev.flutter.flutter-gradle-plugin")"#));
    assert!(script.contains("compileSdk = 35"));
}

#[test]
fn render_escapes_quoted_version_name() {
    let profile = format!("{}\n[version]\ncode = 1\nname = '1.0\") ; println(\"x'\n", VALID);
    let dir = workspace(&profile);
    cmd(dir.path())
        .args(["render", "profile.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"versionName = "1.0\") ; println(\"x""#));
}

#[test]
fn render_refuses_invalid_profile() {
    let invalid = VALID.replace(
        r#"["com.android.application", "kotlin-android", "dev.flutter.flutter-gradle-plugin"]"#,
        r#"["dev.flutter.flutter-gradle-plugin", "com.android.application"]"#,
    );
    let dir = workspace(&invalid);
    cmd(dir.path())
        .args(["render", "profile.toml"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("PLUGIN_ORDER"));
}

#[test]
fn init_writes_loadable_profile() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .args(["init", "android/app/build-profile.toml", "--application-id", "com.acme.varx"])
        .assert()
        .success();

    cmd(dir.path()).arg("check").assert().success();

    cmd(dir.path())
        .args(["init", "android/app/build-profile.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn build_without_gradle_wrapper_fails() {
    let dir = workspace(VALID);
    cmd(dir.path())
        .args(["build", "profile.toml", "--project-dir", "."])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Gradle wrapper not found"));
}

#[test]
fn build_unknown_variant() {
    let dir = workspace(VALID);
    cmd(dir.path())
        .args(["build", "profile.toml", "--variant", "staging", "--project-dir", "."])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("staging"));
}
