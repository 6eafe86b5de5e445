use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

const UNSAFE: &str = r#"package main

import "errors"

func check(err error) bool {
	var target MyErr
	return errors.As(err, target)
}
"#;

const SAFE: &str = r#"package main

import "errors"

func check(err error) bool {
	var target MyErr
	return errors.As(err, &target)
}
"#;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_faulty-errorsas"))
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    bin()
        .current_dir(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("binary should run")
}

fn write(dir: &Path, rel: &str, contents: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dirs");
    }
    std::fs::write(path, contents).expect("write file");
}

#[test]
fn clean_files_exit_zero() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write(tmp.path(), "main.go", SAFE);

    let out = run_in(tmp.path(), &["main.go"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
}

#[test]
fn findings_exit_one_and_print_location() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write(tmp.path(), "main.go", UNSAFE);

    let out = run_in(tmp.path(), &["check", "main.go"]);
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("main.go:7:24: warning: faulty_errorsas: this call to errors.As will panic. Consider prefixing target with &"),
        "stdout: {stdout}"
    );
}

#[test]
fn recursive_pattern_skips_vendor_testdata_and_hidden_dirs() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write(tmp.path(), "pkg/a.go", SAFE);
    write(tmp.path(), "vendor/dep/a.go", UNSAFE);
    write(tmp.path(), "pkg/testdata/a.go", UNSAFE);
    write(tmp.path(), ".cache/a.go", UNSAFE);
    write(tmp.path(), "_scratch/a.go", UNSAFE);

    let out = run_in(tmp.path(), &["./..."]);
    assert_eq!(
        out.status.code(),
        Some(0),
        "stdout: {}",
        String::from_utf8_lossy(&out.stdout)
    );

    write(tmp.path(), "pkg/inner/b.go", UNSAFE);
    let out = run_in(tmp.path(), &["./..."]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn directory_argument_is_not_recursive() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write(tmp.path(), "pkg/a.go", SAFE);
    write(tmp.path(), "pkg/sub/b.go", UNSAFE);

    let out = run_in(tmp.path(), &["pkg"]);
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn no_tests_skips_test_files() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write(tmp.path(), "a.go", SAFE);
    write(tmp.path(), "a_test.go", UNSAFE);

    assert_eq!(run_in(tmp.path(), &["."]).status.code(), Some(1));
    assert_eq!(
        run_in(tmp.path(), &["--no-tests", "."]).status.code(),
        Some(0)
    );
}

#[test]
fn json_output_is_machine_readable() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write(tmp.path(), "main.go", UNSAFE);

    let out = run_in(tmp.path(), &["--format", "json", "main.go"]);
    assert_eq!(out.status.code(), Some(1));
    let parsed: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout should be json");
    assert_eq!(parsed[0]["lint"], "faulty_errorsas");
    assert_eq!(parsed[0]["row"], 7);
    assert_eq!(parsed[0]["column"], 24);
}

#[test]
fn github_output_uses_annotations() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write(tmp.path(), "main.go", UNSAFE);

    let out = run_in(tmp.path(), &["--format", "github", "main.go"]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.starts_with("::warning file=main.go,line=7,col=24,title=faulty_errorsas::"),
        "stdout: {stdout}"
    );
}

#[test]
fn config_in_working_tree_is_applied() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write(tmp.path(), "main.go", UNSAFE);
    write(
        tmp.path(),
        "faulty-errorsas.toml",
        "[lints]\ndisabled = [\"faulty_errorsas\"]\n",
    );

    let out = run_in(tmp.path(), &["./..."]);
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn stdin_is_linted_when_no_path_is_given() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let mut child = bin()
        .current_dir(tmp.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("binary should run");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(UNSAFE.as_bytes())
        .expect("write stdin");

    let out = child.wait_with_output().expect("binary should finish");
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("stdin:7:24:"));
}

#[test]
fn syntax_errors_exit_two() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write(tmp.path(), "broken.go", "package main\n\nfunc check( {\n");

    let out = run_in(tmp.path(), &["broken.go"]);
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("broken.go"), "stderr: {stderr}");
}

#[test]
fn unparsable_file_does_not_hide_other_findings() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write(tmp.path(), "a.go", UNSAFE);
    write(tmp.path(), "b.go", "package main\n\nfunc check( {\n");

    let out = run_in(tmp.path(), &["."]);
    assert_eq!(out.status.code(), Some(2));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("a.go:7:24: warning: faulty_errorsas:"), "stdout: {stdout}");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("b.go"), "stderr: {stderr}");
}

#[test]
fn explain_prints_documentation() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = run_in(tmp.path(), &["explain", "faulty_errorsas"]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("name: faulty_errorsas\n"), "stdout: {stdout}");

    let out = run_in(tmp.path(), &["explain", "nope"]);
    assert_eq!(out.status.code(), Some(2));
}
