//! CLI smoke tests for xcodeninja.
//!
//! These run the binary against the fixture project and check exit codes,
//! messages and the files it writes.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the xcodeninja binary with no ambient config.
fn xcodeninja_cmd() -> Command {
  let mut cmd = cargo_bin_cmd!("xcodeninja");
  cmd.env_remove("XCODENINJA_CONFIG").env_remove("RUST_LOG");
  cmd
}

fn fixture_project() -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/Demo.xcodeproj")
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  xcodeninja_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"))
    .stdout(predicate::str::contains("--configuration"));
}

#[test]
fn version_flag_works() {
  xcodeninja_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("xcodeninja"));
}

// =============================================================================
// Generation
// =============================================================================

#[test]
fn writes_one_file_per_configuration() {
  let out = TempDir::new().unwrap();

  xcodeninja_cmd()
    .arg(fixture_project())
    .arg(out.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("wrote"))
    .stdout(predicate::str::contains("Demo-Debug.ninja"))
    .stdout(predicate::str::contains("Demo-Release.ninja"));

  let debug = fs::read_to_string(out.path().join("Demo-Debug.ninja")).unwrap();
  assert!(debug.starts_with("# Generated by xcodeninja"));
  assert!(debug.contains("ninja_required_version = 1.3"));
  assert!(debug.contains("rule ibtool_compile"));
  assert!(debug.contains("build build/Demo/Debug/Demo.app/Demo: link "));
  assert!(debug.contains("-fno-objc-arc\n"));

  let release = fs::read_to_string(out.path().join("Demo-Release.ninja")).unwrap();
  assert!(release.contains("build/Demo/Release/Demo.data"));
  assert!(!release.contains("build/Demo/Debug/"));
}

#[test]
fn accepts_the_project_json_directly() {
  let out = TempDir::new().unwrap();

  xcodeninja_cmd()
    .arg(fixture_project().join("project.json"))
    .arg(out.path())
    .args(["--configuration", "Debug"])
    .assert()
    .success();

  assert!(out.path().join("Demo-Debug.ninja").exists());
  assert!(!out.path().join("Demo-Release.ninja").exists());
}

#[test]
fn config_file_overrides_rule_commands() {
  let temp = TempDir::new().unwrap();
  let config = temp.path().join("xcodeninja.toml");
  fs::write(&config, "[rules]\ncc = \"emcc ${cflags} -c ${source} -o ${out}\"\n").unwrap();
  let out = temp.path().join("out");

  xcodeninja_cmd()
    .arg(fixture_project())
    .arg(&out)
    .arg("--config")
    .arg(&config)
    .args(["-C", "Release"])
    .assert()
    .success();

  let release = fs::read_to_string(out.join("Demo-Release.ninja")).unwrap();
  assert!(release.contains("  command = emcc ${cflags} -c ${source} -o ${out}\n"));
}

#[test]
fn config_is_found_through_the_environment() {
  let temp = TempDir::new().unwrap();
  let config = temp.path().join("custom.toml");
  fs::write(&config, "final_extension = \"js\"\n[final_link]\nenabled = true\nframeworks = []\n").unwrap();
  let out = temp.path().join("out");

  xcodeninja_cmd()
    .env("XCODENINJA_CONFIG", &config)
    .arg(fixture_project())
    .arg(&out)
    .args(["-C", "Debug"])
    .assert()
    .success();

  let debug = fs::read_to_string(out.join("Demo-Debug.ninja")).unwrap();
  assert!(debug.contains("build build/Demo/Debug/Demo.js: final_link "));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn missing_project_argument_fails() {
  xcodeninja_cmd()
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("[!] Please specify Xcode project."));
}

#[test]
fn unknown_target_fails_without_writing() {
  let out = TempDir::new().unwrap();

  xcodeninja_cmd()
    .arg(fixture_project())
    .arg(out.path())
    .args(["--target", "Nope"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("[!] target not found: Nope"));

  assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn invalid_config_is_reported() {
  let temp = TempDir::new().unwrap();
  let config = temp.path().join("bad.toml");
  fs::write(&config, "[rules]\nfortran = \"gfortran ${in}\"\n").unwrap();

  xcodeninja_cmd()
    .arg(fixture_project())
    .arg(temp.path().join("out"))
    .arg("--config")
    .arg(&config)
    .assert()
    .failure()
    .stderr(predicate::str::contains("[!] invalid configuration"))
    .stderr(predicate::str::contains("fortran"));
}

#[test]
fn nonexistent_project_path_is_an_error() {
  let temp = TempDir::new().unwrap();

  xcodeninja_cmd()
    .arg(temp.path().join("Missing.xcodeproj"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to resolve project path"));
}
