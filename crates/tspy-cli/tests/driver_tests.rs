//! Driver integration tests over a temporary filesystem.

use std::path::Path;

use tspy_cli::driver::run;
use tspy_cli::reporter::Reporter;
use tspy_common::TranspileOptions;

fn options() -> TranspileOptions {
    TranspileOptions {
        use_type_union: true,
        use_not_required: true,
        ..Default::default()
    }
}

fn quiet() -> Reporter {
    Reporter::new(false)
}

#[test]
fn transpiles_a_single_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("point.ts");
    std::fs::write(&source, "interface Point { x: number; y: number; }").expect("write source");

    let outcome = run(&source, &options(), &quiet()).expect("run succeeds");
    assert_eq!(outcome.files_processed, 1);
    assert_eq!(outcome.files_written, 1);
    assert!(!outcome.fatal);

    let python = std::fs::read_to_string(dir.path().join("point.py")).expect("output written");
    assert!(python.contains("class Point(TypedDict):"));
    assert!(python.starts_with("from typing import TypedDict"));
}

#[test]
fn overwrites_existing_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("a.ts");
    let target = dir.path().join("a.py");
    std::fs::write(&source, "interface A { x: number }").expect("write source");
    std::fs::write(&target, "stale contents").expect("write stale target");

    run(&source, &options(), &quiet()).expect("run succeeds");
    let python = std::fs::read_to_string(&target).expect("output");
    assert!(python.contains("class A(TypedDict):"));
    assert!(!python.contains("stale contents"));
}

#[test]
fn processes_every_file_in_a_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("a.ts"), "interface A { x: number }").expect("write a");
    std::fs::write(dir.path().join("b.ts"), "interface B { y: string }").expect("write b");

    let outcome = run(dir.path(), &options(), &quiet()).expect("run succeeds");
    assert_eq!(outcome.files_processed, 2);
    assert!(dir.path().join("a.py").is_file());
    assert!(dir.path().join("b.py").is_file());
}

#[test]
fn missing_path_is_a_precondition_failure() {
    let error = run(Path::new("/no/such/input.ts"), &options(), &quiet())
        .expect_err("missing path should fail");
    assert!(error.to_string().contains("does not exist"));
}

#[test]
fn non_ts_extension_is_a_precondition_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("notes.txt");
    std::fs::write(&source, "interface A { }").expect("write source");

    let error = run(&source, &options(), &quiet()).expect_err("extension check should fail");
    assert!(error.to_string().contains(".ts"));
}

#[test]
fn stray_file_in_directory_fails_the_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("a.ts"), "interface A { x: number }").expect("write a");
    std::fs::write(dir.path().join("README.md"), "docs").expect("write readme");

    assert!(run(dir.path(), &options(), &quiet()).is_err());
}

#[test]
fn parse_errors_still_write_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("broken.ts");
    std::fs::write(
        &source,
        "interface Broken {\nexport interface Fine { x: number }",
    )
    .expect("write source");

    let outcome = run(&source, &options(), &quiet()).expect("run succeeds");
    assert_eq!(outcome.files_written, 1);
    assert!(!outcome.fatal);
    let python = std::fs::read_to_string(dir.path().join("broken.py")).expect("output");
    assert!(python.contains("class Fine(TypedDict):"));
}

#[test]
fn uppercase_ts_extension_is_accepted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("caps.TS");
    std::fs::write(&source, "interface C { x: number }").expect("write source");

    let outcome = run(&source, &options(), &quiet()).expect("run succeeds");
    assert_eq!(outcome.files_written, 1);
}
