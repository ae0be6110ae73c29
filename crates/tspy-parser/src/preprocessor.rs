//! Source preprocessor.
//!
//! Normalizes the raw source before parsing and resolves include
//! references. Includes are discovered with a configurable regex whose
//! default never matches, so the stage is a near-identity pass unless a
//! real pattern is supplied. Comment regions are masked with the same
//! comment syntax the grammar skips.
//!
//! Unresolvable includes produce a non-fatal diagnostic and the
//! reference is left in place.

use once_cell::sync::Lazy;
use regex::Regex;
use tspy_common::{Diagnostic, Span, codes};

/// Default include pattern: matches nothing. Replace with a pattern
/// containing a `name` capture group to enable includes.
static NEVER_MATCH: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\s\S]").expect("static pattern"));

/// Preprocess with includes disabled. Single pass; returns the processed
/// text and any diagnostics.
#[must_use]
pub fn preprocess(source: &str) -> (String, Vec<Diagnostic>) {
    preprocess_with(source, &NEVER_MATCH, |name| {
        Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no include loader configured for '{name}'"),
        ))
    })
}

/// Preprocess with a custom include pattern and loader.
///
/// The pattern must expose the included name in a capture group called
/// `name`. Matches inside comments are ignored. On loader failure the
/// reference is kept verbatim and an error (non-fatal) is recorded.
pub fn preprocess_with(
    source: &str,
    include_pattern: &Regex,
    load: impl Fn(&str) -> std::io::Result<String>,
) -> (String, Vec<Diagnostic>) {
    let mut errors = Vec::new();
    let comment_spans = crate::comments::comment_spans(source);
    let in_comment =
        |pos: usize| comment_spans.iter().any(|&(start, end)| pos >= start && pos < end);

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for captures in include_pattern.captures_iter(source) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        if whole.start() < cursor || in_comment(whole.start()) {
            continue;
        }
        let name = captures
            .name("name")
            .map(|m| m.as_str())
            .unwrap_or_else(|| whole.as_str());
        out.push_str(&source[cursor..whole.start()]);
        match load(name) {
            Ok(included) => out.push_str(&included),
            Err(io_error) => {
                errors.push(Diagnostic::error(
                    Span::new(whole.start() as u32, whole.end() as u32),
                    format!("could not resolve include '{name}': {io_error}"),
                    codes::INCLUDE_ERROR,
                ));
                out.push_str(whole.as_str());
            }
        }
        cursor = whole.end();
    }
    out.push_str(&source[cursor..]);
    (out, errors)
}
