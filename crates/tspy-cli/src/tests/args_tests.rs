use clap::Parser;

use crate::args::{CliArgs, Pep, PythonCompatibility};

#[test]
fn parses_defaults() {
    let args = CliArgs::try_parse_from(["tspy", "defs.ts"]).expect("default args should parse");
    assert_eq!(args.path, std::path::PathBuf::from("defs.ts"));
    assert_eq!(args.compatibility, PythonCompatibility::Python311);
    assert_eq!(args.peps, vec![Pep::Pep655]);
    assert!(args.decorator.is_none());
    assert!(args.base.is_none());
    assert!(!args.verbose);
    assert!(!args.debug);
}

#[test]
fn path_is_required() {
    assert!(CliArgs::try_parse_from(["tspy"]).is_err());
}

#[test]
fn parses_common_flags() {
    let args = CliArgs::try_parse_from([
        "tspy",
        "defs",
        "--compatibility",
        "3.9",
        "--pep",
        "435",
        "--pep",
        "604",
        "--decorator",
        "dataclass",
        "--base",
        "mypkg.Base",
        "--verbose",
        "--debug",
    ])
    .expect("flagged args should parse");
    assert_eq!(args.compatibility, PythonCompatibility::Python39);
    assert_eq!(args.peps, vec![Pep::Pep435, Pep::Pep604]);
    assert_eq!(args.decorator.as_deref(), Some("dataclass"));
    assert_eq!(args.base.as_deref(), Some("mypkg.Base"));
    assert!(args.verbose);
    assert!(args.debug);
}

#[test]
fn parses_short_flags() {
    let args = CliArgs::try_parse_from(["tspy", "d.ts", "-c", "3.6", "-p", "584", "-v", "-d"])
        .expect("short flags should parse");
    assert_eq!(args.compatibility, PythonCompatibility::Python36);
    assert_eq!(args.peps, vec![Pep::Pep584]);
    assert!(args.verbose);
    assert!(args.debug);
}

#[test]
fn rejects_unknown_compatibility() {
    assert!(CliArgs::try_parse_from(["tspy", "d.ts", "-c", "2.7"]).is_err());
}

#[test]
fn rejects_unknown_pep() {
    assert!(CliArgs::try_parse_from(["tspy", "d.ts", "-p", "8"]).is_err());
}

#[test]
fn type_union_threshold() {
    assert!(!PythonCompatibility::Python36.use_type_union());
    assert!(!PythonCompatibility::Python39.use_type_union());
    assert!(PythonCompatibility::Python310.use_type_union());
    assert!(PythonCompatibility::Python311.use_type_union());
}
