//! The compilation pipeline: preprocess → parse → transform → emit.
//!
//! Each thread keeps one lazily-initialized emitter instance and reuses
//! it across compilations (state is reset per run). The configuration
//! record is read-only during a compilation.

use std::cell::RefCell;

use tspy_common::{Diagnostic, TranspileOptions, diagnostics};
use tspy_parser::{parse_document, preprocess, transform};

use crate::emitter::Emitter;

/// Result of transpiling one source text. `output` is `None` when a
/// fatal diagnostic suppressed emission.
#[derive(Debug)]
pub struct TranspileResult {
    pub output: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

thread_local! {
    static EMITTER: RefCell<Option<Emitter>> = const { RefCell::new(None) };
}

/// Transpile TypeScript declaration source to Python type declarations.
#[must_use]
pub fn transpile(source: &str, options: &TranspileOptions) -> TranspileResult {
    let (text, mut diagnostics) = preprocess(source);
    let parsed = parse_document(&text);
    diagnostics.extend(parsed.diagnostics);
    let mut root = parsed.root;
    transform(&mut root);
    let emitted = EMITTER.with(|slot| {
        let mut slot = slot.borrow_mut();
        let emitter = slot.get_or_insert_with(|| Emitter::new(options.clone()));
        emitter.configure(options.clone());
        emitter.emit(&root)
    });
    diagnostics.extend(emitted.diagnostics);
    let output = if diagnostics::has_fatal(&diagnostics) {
        None
    } else {
        Some(emitted.output)
    };
    TranspileResult {
        output,
        diagnostics,
    }
}
