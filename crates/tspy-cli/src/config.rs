//! Configuration loading and option resolution.
//!
//! Options start from the compiler defaults, are overridden by the
//! `[ts2py]` table of a `ts2py.toml` found next to the input (or in the
//! working directory), and finally by the CLI flags.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tspy_common::TranspileOptions;

use crate::args::{CliArgs, Pep};

/// Name of the optional configuration file.
pub const CONFIG_FILE: &str = "ts2py.toml";

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    ts2py: Option<TranspileOptions>,
}

/// Load options from `ts2py.toml` in `dir`, if present.
pub fn load_config_file(dir: &Path) -> Result<Option<TranspileOptions>> {
    let path = dir.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("could not read '{}'", path.display()))?;
    let parsed: ConfigFile = toml::from_str(&text)
        .with_context(|| format!("could not parse '{}'", path.display()))?;
    Ok(parsed.ts2py)
}

/// The directory whose configuration governs `input`: the input's own
/// directory for files, the input itself for directories.
#[must_use]
pub fn config_dir(input: &Path) -> &Path {
    if input.is_dir() {
        input
    } else {
        input.parent().unwrap_or(Path::new("."))
    }
}

/// Layer PEP and compatibility flags over the base options.
#[must_use]
pub fn resolve_options(args: &CliArgs, base: TranspileOptions) -> TranspileOptions {
    let mut options = base;
    for pep in &args.peps {
        match pep {
            Pep::Pep435 => options.use_enum = true,
            Pep::Pep584 => options.use_literal_type = true,
            Pep::Pep604 => options.use_type_union = true,
            Pep::Pep655 => options.use_not_required = true,
        }
    }
    if args.compatibility.use_type_union() {
        options.use_type_union = true;
    }
    if let Some(decorator) = &args.decorator {
        options.class_decorator = decorator.clone();
    }
    if let Some(base_class) = &args.base {
        options.base_class_name = base_class.clone();
    }
    options
}
