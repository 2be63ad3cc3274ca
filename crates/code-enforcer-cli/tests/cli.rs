//! End-to-end tests for the `code-enforcer` binary.
//!
//! The external tools are replaced by shell scripts installed where the
//! default configuration looks for them.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const FAKE_ESDOC: &str = "#!/bin/sh
mkdir -p docs
printf '{\"files\":{}}' > docs/coverage.json
printf '[]' > docs/lint.json
";

const FAKE_ESLINT: &str = "#!/bin/sh
printf '[]'
";

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn install_script(root: &Path, rel: &str, body: &str) {
    write(root, rel, body);
    let path = root.join(rel);
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
}

/// Installs working fake tools and an empty config file under `root`.
fn setup(root: &Path) {
    install_script(root, "node_modules/.bin/esdoc", FAKE_ESDOC);
    install_script(root, "node_modules/.bin/eslint", FAKE_ESLINT);
    write(root, ".esdoc.json", r#"{ "destination": "./docs" }"#);
    write(root, ".code-enforcer.json", "{}");
}

fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    setup(tmp.path());
    tmp
}

fn run(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_code-enforcer"))
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .unwrap()
}

fn run_from(cwd: &Path, root: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_code-enforcer"))
        .current_dir(cwd)
        .args(["--root", root])
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn empty_project_exits_zero_silently() {
    let tmp = project();
    let output = run(tmp.path(), &[]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "");
}

#[test]
fn diagnostics_are_printed_and_exit_one() {
    let tmp = project();
    write(tmp.path(), "src/app.js", "let a = 1;\nconsole.log(a);\n");

    let output = run(tmp.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout(&output),
        "Errors:\n\
         src/app.js: 2: no console calls\n\
         \x20 console.log(a);\n\
         \x20 ^\n\
         \n\
         Errors: 1\n"
    );
}

#[test]
fn solutions_flag_appends_remediation() {
    let tmp = project();
    write(tmp.path(), "src/app.js", "console.log(1);\n");

    let output = run(tmp.path(), &["--solutions"]);
    assert!(stdout(&output).contains("src/app.js: 1: no console calls (use logging library)\n"));
}

#[test]
fn missing_config_falls_back_to_defaults() {
    let tmp = project();
    fs::remove_file(tmp.path().join(".code-enforcer.json")).unwrap();

    let output = run(tmp.path(), &[]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).starts_with("failed to read "));
}

#[test]
fn custom_config_file_is_honored() {
    let tmp = project();
    write(tmp.path(), "src/app.js", "// FIXME later\n");
    write(
        tmp.path(),
        "enforcer.json",
        "{\n  \"todoTags\": [\n    \"TODO\"\n  ]\n}\n",
    );

    let output = run(tmp.path(), &["--config-file", "enforcer.json"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn relative_root_from_parent_directory() {
    let parent = TempDir::new().unwrap();
    let proj = parent.path().join("proj");
    setup(&proj);
    write(&proj, "src/app.js", "console.log(1);\n");

    let output = run_from(parent.path(), "proj", &[]);
    assert_eq!(
        output.status.code(),
        Some(1),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout(&output).contains("src/app.js: 1: no console calls\n"));

    fs::write(proj.join("src/app.js"), "let a = 1;\n").unwrap();
    let output = run_from(parent.path(), "./proj", &[]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn missing_tools_are_fatal() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), ".code-enforcer.json", "{}");

    let output = run(tmp.path(), &[]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: "));
    assert_eq!(stderr.matches("No such file or directory").count(), 1, "{stderr}");
}

#[test]
fn list_rules_prints_every_rule() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["--list-rules"]);
    assert_eq!(output.status.code(), Some(0));

    let out = stdout(&output);
    for name in [
        "ascii-only",
        "console-style-calls",
        "no-extension-imports",
        "no-index-imports",
        "no-todo-tags",
    ] {
        assert!(out.contains(name), "missing {name}");
    }
}
