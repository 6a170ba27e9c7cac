//! CLI integration tests for binlink.
//!
//! These tests lay out a `node_modules` tree on disk and run the binary
//! against it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the binlink binary command, isolated from the user's global config.
fn binlink(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("binlink").unwrap();
    cmd.env("HOME", home).env_remove("BINLINK_BIN_DIR");
    cmd
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Install a package with the given manifest and bin scripts.
fn install(modules: &Path, dir: &str, manifest: &str, scripts: &[&str]) -> PathBuf {
    let pkg = modules.join(dir);
    fs::create_dir_all(&pkg).unwrap();
    fs::write(pkg.join("package.json"), manifest).unwrap();
    for script in scripts {
        let path = pkg.join(script);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "#!/usr/bin/env node\nconsole.log('hi')\n").unwrap();
    }
    pkg
}

// ============================================================================
// binlink link
// ============================================================================

#[test]
fn test_link_creates_shims() {
    let tmp = temp_dir();
    let modules = tmp.path().join("node_modules");
    install(
        &modules,
        "tool",
        r#"{ "name": "tool", "version": "1.0.0", "bin": { "tool": "cli.js", "tool-extra": "bin/extra.js" } }"#,
        &["cli.js", "bin/extra.js"],
    );

    binlink(tmp.path())
        .args(["link", "node_modules"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let shim = fs::read_to_string(modules.join(".bin/tool")).unwrap();
    assert!(shim.starts_with("#!/bin/sh\n"));
    assert!(shim.contains("\"$basedir/../tool/cli.js\""));
    assert!(shim.contains("NODE_PATH"));
    assert!(modules.join(".bin/tool-extra").exists());
}

#[test]
fn test_link_warns_about_collision() {
    let tmp = temp_dir();
    let modules = tmp.path().join("node_modules");
    install(&modules, "a", r#"{ "name": "a", "bin": "a.js" }"#, &["a.js"]);
    install(&modules, "b", r#"{ "name": "b", "bin": { "a": "b.js" } }"#, &["b.js"]);

    binlink(tmp.path())
        .args(["link", "node_modules", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Cannot link bin \"a\" of \"b\"",
        ))
        .stderr(predicate::str::contains("A package called \"a\" already has its bin linked."));

    let shim = fs::read_to_string(modules.join(".bin/a")).unwrap();
    assert!(shim.contains("../a/a.js"));
}

#[test]
fn test_link_custom_bin_dir() {
    let tmp = temp_dir();
    let modules = tmp.path().join("node_modules");
    install(&modules, "tool", r#"{ "name": "tool", "bin": "cli.js" }"#, &["cli.js"]);

    binlink(tmp.path())
        .args(["link", "node_modules", "--bin-dir", "tools"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(tmp.path().join("tools/tool").exists());
    assert!(!modules.join(".bin").exists());
}

#[test]
fn test_link_bin_dir_from_project_config() {
    let tmp = temp_dir();
    let modules = tmp.path().join("node_modules");
    install(&modules, "tool", r#"{ "name": "tool", "bin": "cli.js" }"#, &["cli.js"]);
    fs::create_dir_all(tmp.path().join(".binlink")).unwrap();
    fs::write(
        tmp.path().join(".binlink/config.toml"),
        "[link]\nbin-dir = \"configured\"\n",
    )
    .unwrap();

    binlink(tmp.path())
        .args(["link", "node_modules"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(tmp.path().join("configured/tool").exists());
}

#[test]
fn test_link_warns_about_invalid_config() {
    let tmp = temp_dir();
    let modules = tmp.path().join("node_modules");
    install(&modules, "tool", r#"{ "name": "tool", "bin": "cli.js" }"#, &["cli.js"]);
    fs::create_dir_all(tmp.path().join(".binlink")).unwrap();
    fs::write(tmp.path().join(".binlink/config.toml"), "[link\n").unwrap();

    binlink(tmp.path())
        .args(["link", "node_modules", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: ignoring invalid config file"))
        .stderr(predicate::str::contains(".binlink/config.toml"));

    assert!(modules.join(".bin/tool").exists());
}

#[cfg(unix)]
#[test]
fn test_link_replaces_existing_symlink() {
    let tmp = temp_dir();
    let modules = tmp.path().join("node_modules");
    let pkg = install(&modules, "tool", r#"{ "name": "tool", "bin": "cli.js" }"#, &["cli.js"]);
    let script = fs::read_to_string(pkg.join("cli.js")).unwrap();
    fs::create_dir_all(modules.join(".bin")).unwrap();
    std::os::unix::fs::symlink("../tool/cli.js", modules.join(".bin/tool")).unwrap();

    binlink(tmp.path())
        .args(["link", "node_modules"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert_eq!(fs::read_to_string(pkg.join("cli.js")).unwrap(), script);
    let shim = fs::read_to_string(modules.join(".bin/tool")).unwrap();
    assert!(shim.starts_with("#!/bin/sh\n"));
}

#[test]
fn test_link_missing_modules_dir_succeeds() {
    let tmp = temp_dir();

    binlink(tmp.path())
        .args(["link", "node_modules"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(!tmp.path().join("node_modules/.bin").exists());
}

#[test]
fn test_link_skips_package_without_manifest() {
    let tmp = temp_dir();
    let modules = tmp.path().join("node_modules");
    fs::create_dir_all(modules.join("stray")).unwrap();
    install(&modules, "tool", r#"{ "name": "tool", "bin": "cli.js" }"#, &["cli.js"]);

    binlink(tmp.path())
        .args(["link", "node_modules"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("WARN").not());

    assert!(modules.join(".bin/tool").exists());
}

#[test]
fn test_link_fails_on_malformed_manifest() {
    let tmp = temp_dir();
    let modules = tmp.path().join("node_modules");
    install(&modules, "broken", "{ not json", &[]);

    binlink(tmp.path())
        .args(["link", "node_modules", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: failed to read manifest"));
}

#[test]
fn test_link_nameless_manifest_requires_flag() {
    let tmp = temp_dir();
    let modules = tmp.path().join("node_modules");
    install(&modules, "app", r#"{ "bin": { "app-cli": "cli.js" } }"#, &["cli.js"]);

    binlink(tmp.path())
        .args(["link", "node_modules", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--allow-exotic-manifests"));

    binlink(tmp.path())
        .args(["link", "node_modules", "--allow-exotic-manifests"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(modules.join(".bin/app-cli").exists());
}

#[test]
fn test_link_twice_is_byte_identical() {
    let tmp = temp_dir();
    let modules = tmp.path().join("node_modules");
    install(&modules, "tool", r#"{ "name": "tool", "bin": "cli.js" }"#, &["cli.js"]);

    binlink(tmp.path())
        .args(["link", "node_modules"])
        .current_dir(tmp.path())
        .assert()
        .success();
    let first = fs::read(modules.join(".bin/tool")).unwrap();

    binlink(tmp.path())
        .args(["link", "node_modules"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert_eq!(first, fs::read(modules.join(".bin/tool")).unwrap());
}

// ============================================================================
// binlink plan
// ============================================================================

#[test]
fn test_plan_lists_bins_and_conflicts() {
    let tmp = temp_dir();
    let modules = tmp.path().join("node_modules");
    install(&modules, "a", r#"{ "name": "a", "bin": "a.js" }"#, &["a.js"]);
    install(&modules, "b", r#"{ "name": "b", "bin": { "a": "b.js", "bee": "b.js" } }"#, &["b.js"]);

    binlink(tmp.path())
        .args(["plan", "node_modules"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("a -> "))
        .stdout(predicate::str::contains("bee -> "))
        .stdout(predicate::str::contains("Rejected:"))
        .stdout(predicate::str::contains("`a` of `b` is shadowed by `a`"));

    assert!(!modules.join(".bin").exists());
}

#[test]
fn test_plan_json() {
    let tmp = temp_dir();
    let modules = tmp.path().join("node_modules");
    install(&modules, "a", r#"{ "name": "a", "bin": "a.js" }"#, &["a.js"]);
    install(&modules, "b", r#"{ "name": "b", "bin": { "a": "b.js" } }"#, &["b.js"]);

    let output = binlink(tmp.path())
        .args(["plan", "node_modules", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["bins"].as_array().unwrap().len(), 1);
    assert_eq!(plan["bins"][0]["name"], "a");
    assert_eq!(plan["bins"][0]["package"], "a");
    assert_eq!(plan["conflicts"][0]["pkg_name"], "b");
    assert_eq!(plan["conflicts"][0]["owner"], "a");
}

#[test]
fn test_plan_empty() {
    let tmp = temp_dir();
    fs::create_dir_all(tmp.path().join("node_modules")).unwrap();

    binlink(tmp.path())
        .args(["plan", "node_modules"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(no bins)"));
}
