use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the tspy binary.
#[derive(Parser, Debug)]
#[command(
    name = "tspy",
    version,
    about = "Transpile TypeScript declarations to Python TypedDicts"
)]
pub struct CliArgs {
    /// Path to the file or the folder to process.
    pub path: PathBuf,

    /// Minimal required Python version (3.10 and later assume PEP 604
    /// type unions).
    #[arg(short = 'c', long, value_enum, default_value = "3.11")]
    pub compatibility: PythonCompatibility,

    /// Assume Python PEPs, e.g. 655. Repeatable.
    #[arg(short = 'p', long = "pep", value_enum, default_values = ["655"])]
    pub peps: Vec<Pep>,

    /// Emit the given decorator above every generated class.
    #[arg(long)]
    pub decorator: Option<String>,

    /// Base class for generated classes; a dotted name is imported.
    #[arg(long)]
    pub base: Option<String>,

    /// Enable verbose output.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Enable debug mode (trace-level pipeline logging).
    #[arg(short = 'd', long)]
    pub debug: bool,
}

/// Supported `--compatibility` versions.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PythonCompatibility {
    #[value(name = "3.6")]
    Python36,
    #[value(name = "3.7")]
    Python37,
    #[value(name = "3.8")]
    Python38,
    #[value(name = "3.9")]
    Python39,
    #[value(name = "3.10")]
    Python310,
    #[value(name = "3.11")]
    Python311,
}

impl PythonCompatibility {
    /// PEP 604 unions are available from Python 3.10 on.
    #[must_use]
    pub fn use_type_union(self) -> bool {
        matches!(self, Self::Python310 | Self::Python311)
    }
}

/// PEPs the emitted code may assume.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pep {
    /// Enum classes.
    #[value(name = "435")]
    Pep435,
    /// Literal types.
    #[value(name = "584")]
    Pep584,
    /// `X | Y` type unions.
    #[value(name = "604")]
    Pep604,
    /// `NotRequired` TypedDict keys.
    #[value(name = "655")]
    Pep655,
}
