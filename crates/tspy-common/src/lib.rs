//! Common types and utilities for the tspy transpiler.
//!
//! This crate provides foundational types used across all tspy crates:
//! - Source spans (`Span`, `Spanned`)
//! - Position/line-map types for diagnostic rendering
//! - Diagnostics (`Diagnostic`, `Severity`, error codes)
//! - The immutable per-run configuration record (`TranspileOptions`)

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::{Span, Spanned};

// Position/LineMap types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// Diagnostics accumulated by the pipeline stages
pub mod diagnostics;
pub use diagnostics::{Diagnostic, Severity, codes};

// Per-run configuration record
pub mod options;
pub use options::TranspileOptions;

#[cfg(test)]
#[path = "tests/span_tests.rs"]
mod span_tests;
#[cfg(test)]
#[path = "tests/diagnostics_tests.rs"]
mod diagnostics_tests;
