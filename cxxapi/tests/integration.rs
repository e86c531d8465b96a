use predicates::prelude::*;
use std::process::Command;
use tempfile::{Builder, NamedTempFile, TempDir};

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_cxxapi")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).unwrap()
}

fn temp_file(suffix: &str) -> NamedTempFile {
    Builder::new().suffix(suffix).tempfile().unwrap()
}

fn stdout_of(assert: assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

// -- stdin mode --

#[test]
fn stdin_json_array() {
    let assert = cmd().write_stdin(fixture("free_declarations.json")).assert().success();
    assert_eq!(stdout_of(assert), fixture("free_declarations.api"));
}

#[test]
fn stdin_json_lines() {
    let assert = cmd().write_stdin(fixture("class_methods.jsonl")).assert().success();
    assert_eq!(stdout_of(assert), fixture("class_methods.api"));
}

#[test]
fn stdin_invalid_json_fails() {
    cmd()
        .write_stdin("{not json}\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid record on line 1"));
}

// -- file mode --

#[test]
fn file_to_stdout() {
    let assert = cmd().arg(fixture_path("nested_enum.json")).assert().success();
    assert_eq!(stdout_of(assert), fixture("nested_enum.api"));
}

#[test]
fn store_initializers_flag() {
    let assert = cmd()
        .arg("--store-initializers")
        .arg(fixture_path("nested_enum.json"))
        .assert()
        .success();
    assert_eq!(stdout_of(assert), fixture("nested_enum.init.api"));
}

#[test]
fn output_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("api").join("test.api");

    cmd()
        .args(["-o", out.to_str().unwrap()])
        .arg(fixture_path("class_methods.jsonl"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(written, fixture("class_methods.api"));
}

#[test]
fn multiple_files_merge_into_one_snapshot() {
    // Both fixtures fill `test`; their blocks interleave in natural order.
    let expected = "enum test::AccessibilityState::CheckedState {\n  Checked,\n  Mixed,\n  None,\n  Unchecked,\n}\n\n\
         struct test::AccessibilityState {\n  public bool disabled;\n  public std::optional< bool > expanded;\n  public test::AccessibilityState::CheckedState checked;\n}\n\n\
         struct test::Param {\n}\n\n\
         template <typename T>\nconcept test::Sink = requires(T t) {\n  { t.consume() };\n};\n\
         typedef void(*test::FreeFnPtr)(test::Param);\n\
         using test::FreeCallback = void(test::Param);\n\
         void test::freeFunction(test::Param p);\n";

    let assert = cmd()
        .arg(fixture_path("nested_enum.json"))
        .arg(fixture_path("free_declarations.json"))
        .assert()
        .success();
    assert_eq!(stdout_of(assert), expected);
}

#[test]
fn glob_patterns() {
    let pattern = fixture_path("class_*.jsonl");
    let assert = cmd().arg(pattern).assert().success();
    assert_eq!(stdout_of(assert), fixture("class_methods.api"));
}

#[test]
fn record_order_does_not_matter() {
    let reversed: Vec<String> = fixture("class_methods.jsonl").lines().rev().map(str::to_string).collect();
    let mut file = temp_file(".jsonl");
    std::io::Write::write_all(&mut file, reversed.join("\n").as_bytes()).unwrap();

    let assert = cmd().arg(file.path()).assert().success();
    assert_eq!(stdout_of(assert), fixture("class_methods.api"));
}

#[test]
fn unsupported_extension_fails() {
    let file = temp_file(".xml");
    cmd()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported file type"));
}

// -- snapshot errors --

#[test]
fn undefined_scope_fails() {
    cmd()
        .arg(fixture_path("undefined_scope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("scope `app::detail` is referenced but never defined"));
}

#[test]
fn scope_conflict_fails() {
    cmd()
        .arg(fixture_path("conflict.jsonl"))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "identifier `app::Widget` already exists as a class (defined in app/Widget.h)",
        ));
}

// -- logging --

#[test]
fn verbose_reports_dropped_declarations() {
    cmd()
        .arg("-v")
        .arg(fixture_path("class_methods.jsonl"))
        .assert()
        .success()
        .stderr(predicate::str::contains("dropped private function"));
}

#[test]
fn unknown_kinds_warn_by_default() {
    cmd()
        .write_stdin("{\"kind\": \"protocol\", \"qualified_name\": \"NSCoding\"}\n")
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stdout("\n")
        .stderr(predicate::str::contains("protocol records are not supported"));
}
