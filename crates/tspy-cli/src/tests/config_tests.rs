use clap::Parser;
use tspy_common::TranspileOptions;

use crate::args::CliArgs;
use crate::config::{CONFIG_FILE, config_dir, load_config_file, resolve_options};

fn args(argv: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(argv).expect("args should parse")
}

#[test]
fn default_cli_enables_not_required_and_type_union() {
    let options = resolve_options(&args(&["tspy", "d.ts"]), TranspileOptions::default());
    assert!(options.use_not_required); // PEP 655 default
    assert!(options.use_type_union); // compatibility 3.11
    assert!(options.use_enum); // compiler default
    assert!(options.use_literal_type); // compiler default
}

#[test]
fn old_compatibility_keeps_union_brackets() {
    let base = TranspileOptions::default();
    let options = resolve_options(&args(&["tspy", "d.ts", "-c", "3.8", "-p", "655"]), base);
    assert!(!options.use_type_union);
    assert!(options.use_not_required);
}

#[test]
fn pep_604_enables_type_union_regardless_of_compatibility() {
    let base = TranspileOptions::default();
    let options = resolve_options(&args(&["tspy", "d.ts", "-c", "3.8", "-p", "604"]), base);
    assert!(options.use_type_union);
    assert!(!options.use_not_required); // 655 no longer defaulted
}

#[test]
fn decorator_and_base_flags_override() {
    let options = resolve_options(
        &args(&["tspy", "d.ts", "--decorator", "frozen", "--base", "a.B"]),
        TranspileOptions::default(),
    );
    assert_eq!(options.class_decorator, "frozen");
    assert_eq!(options.base_class_name, "a.B");
}

#[test]
fn missing_config_file_yields_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let loaded = load_config_file(dir.path()).expect("no error");
    assert!(loaded.is_none());
}

#[test]
fn config_file_overrides_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join(CONFIG_FILE),
        "[ts2py]\nUseEnum = false\nBaseClassName = \"mypkg.Base\"\nClassDecorator = \"frozen\"\n",
    )
    .expect("write config");
    let loaded = load_config_file(dir.path())
        .expect("no error")
        .expect("config present");
    assert!(!loaded.use_enum);
    assert_eq!(loaded.base_class_name, "mypkg.Base");
    assert_eq!(loaded.class_decorator, "frozen");
    // unset keys keep their defaults
    assert!(loaded.use_literal_type);
}

#[test]
fn malformed_config_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join(CONFIG_FILE), "[ts2py]\nUnknownKey = 1\n")
        .expect("write config");
    assert!(load_config_file(dir.path()).is_err());
}

#[test]
fn config_dir_for_files_and_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert_eq!(config_dir(dir.path()), dir.path());
    let file = dir.path().join("input.ts");
    std::fs::write(&file, "").expect("write file");
    assert_eq!(config_dir(&file), dir.path());
}
