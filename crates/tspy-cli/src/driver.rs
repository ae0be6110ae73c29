//! The compilation driver: file discovery, precondition checks, and
//! per-file transpilation with sibling `.py` output.
//!
//! Files are processed sequentially; the pipeline itself never touches
//! the filesystem.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use walkdir::WalkDir;

use tspy_common::diagnostics::{Severity, canonical_strings, has_errors, has_fatal};
use tspy_common::TranspileOptions;
use tspy_emitter::transpile;

use crate::reporter::Reporter;

/// Outcome of a driver run over all input files.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub files_processed: usize,
    pub files_written: usize,
    /// True if any file produced a fatal diagnostic.
    pub fatal: bool,
}

/// Process a file or directory. I/O and precondition failures return an
/// error; pipeline diagnostics are reported but do not abort the run.
pub fn run(path: &Path, options: &TranspileOptions, reporter: &Reporter) -> Result<RunOutcome> {
    if !path.exists() {
        bail!("defined path does not exist: '{}'", path.display());
    }
    let files = collect_input_files(path)?;
    check_ts_extension(&files)?;
    let mut outcome = RunOutcome::default();
    for file in &files {
        let wrote = process_file(file, options, reporter, &mut outcome)?;
        outcome.files_processed += 1;
        if wrote {
            outcome.files_written += 1;
        }
    }
    Ok(outcome)
}

/// A file input is taken as-is; a directory contributes its immediate
/// files, in sorted order.
fn collect_input_files(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("could not list '{}'", path.display()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn check_ts_extension(files: &[PathBuf]) -> Result<()> {
    for file in files {
        if !file.to_string_lossy().to_lowercase().ends_with(".ts") {
            bail!(
                "file '{}' does not end with the '.ts' extension",
                file.display()
            );
        }
    }
    Ok(())
}

/// Compile one source file and write the sibling `.py`, unless a fatal
/// diagnostic suppressed the output. Returns whether a file was written.
fn process_file(
    source_path: &Path,
    options: &TranspileOptions,
    reporter: &Reporter,
    outcome: &mut RunOutcome,
) -> Result<bool> {
    let target = target_path(source_path);
    if target.is_file() {
        reporter.info(&format!(
            "target file '{}' already exists, deleting it",
            target.display()
        ));
        std::fs::remove_file(&target)
            .with_context(|| format!("could not delete '{}'", target.display()))?;
    }
    let source = std::fs::read_to_string(source_path)
        .with_context(|| format!("could not read '{}'", source_path.display()))?;
    tracing::debug!(file = %source_path.display(), "transpiling");

    let result = transpile(&source, options);
    if has_fatal(&result.diagnostics) {
        outcome.fatal = true;
    }
    let mut wrote = false;
    if let Some(output) = &result.output {
        std::fs::write(&target, output)
            .with_context(|| format!("could not write '{}'", target.display()))?;
        wrote = true;
    }
    if result.diagnostics.is_empty() {
        reporter.success(&format!(
            "conversion for file '{}' completed successfully",
            source_path.display()
        ));
    } else {
        let file_name = source_path.to_string_lossy();
        let rendered = canonical_strings(&result.diagnostics, &file_name, &source).join("\n");
        if has_errors(&result.diagnostics, Severity::Error) {
            reporter.error(&rendered);
        } else {
            reporter.warning(&rendered);
        }
    }
    Ok(wrote)
}

/// Sibling output path: same stem, `.py` extension.
fn target_path(source: &Path) -> PathBuf {
    source.with_extension("py")
}
