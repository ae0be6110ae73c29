//! Diagnostic types accumulated by the pipeline stages.
//!
//! Errors are first-class values: every stage returns the diagnostics it
//! produced and the pipeline keeps going wherever it can. Only `Fatal`
//! diagnostics suppress output.

use serde::Serialize;

use crate::position::LineMap;
use crate::span::Span;

/// Well-known diagnostic codes.
pub mod codes {
    /// A construct the transpiler recognizes but does not lower yet
    /// (intersection types, restricted generics, multiple ambient modules).
    pub const NOT_YET_IMPLEMENTED: u32 = 310;
    /// A construct outside the supported declaration subset.
    pub const UNSUPPORTED: u32 = 320;
    /// Generic pipeline error (malformed tree reaching the emitter).
    pub const ERROR: u32 = 1000;
    /// A parse failure that was recovered from via a resume rule.
    pub const PARSE_ERROR: u32 = 1010;
    /// An include reference the preprocessor could not resolve.
    pub const INCLUDE_ERROR: u32 = 1020;
}

/// Diagnostic severity, ordered from least to most severe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Fatal,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Fatal => "Fatal",
        };
        write!(f, "{name}")
    }
}

/// A diagnostic message with source position, severity and code.
#[derive(Clone, Debug, Serialize)]
pub struct Diagnostic {
    pub span: Span,
    pub message: String,
    pub severity: Severity,
    pub code: u32,
}

impl Diagnostic {
    #[must_use]
    pub fn info(span: Span, message: impl Into<String>) -> Self {
        Self::new(span, message, Severity::Info, 0)
    }

    #[must_use]
    pub fn warning(span: Span, message: impl Into<String>, code: u32) -> Self {
        Self::new(span, message, Severity::Warning, code)
    }

    #[must_use]
    pub fn error(span: Span, message: impl Into<String>, code: u32) -> Self {
        Self::new(span, message, Severity::Error, code)
    }

    #[must_use]
    pub fn fatal(span: Span, message: impl Into<String>, code: u32) -> Self {
        Self::new(span, message, Severity::Fatal, code)
    }

    fn new(span: Span, message: impl Into<String>, severity: Severity, code: u32) -> Self {
        Diagnostic {
            span,
            message: message.into(),
            severity,
            code,
        }
    }

    /// Render this diagnostic against its source text as
    /// `file:line:column: Severity (code): message`.
    #[must_use]
    pub fn render(&self, file: &str, line_map: &LineMap) -> String {
        let pos = line_map.position(if self.span.is_dummy() {
            0
        } else {
            self.span.start
        });
        format!(
            "{file}:{pos}: {} ({}): {}",
            self.severity, self.code, self.message
        )
    }
}

/// True if any diagnostic is `Fatal`.
#[must_use]
pub fn has_fatal(diagnostics: &[Diagnostic]) -> bool {
    has_errors(diagnostics, Severity::Fatal)
}

/// True if any diagnostic reaches `at_least`.
#[must_use]
pub fn has_errors(diagnostics: &[Diagnostic], at_least: Severity) -> bool {
    diagnostics.iter().any(|d| d.severity >= at_least)
}

/// Render all diagnostics in source order.
#[must_use]
pub fn canonical_strings(diagnostics: &[Diagnostic], file: &str, source: &str) -> Vec<String> {
    let line_map = LineMap::build(source);
    let mut sorted: Vec<&Diagnostic> = diagnostics.iter().collect();
    sorted.sort_by_key(|d| (d.span.start, d.span.end));
    sorted.iter().map(|d| d.render(file, &line_map)).collect()
}
