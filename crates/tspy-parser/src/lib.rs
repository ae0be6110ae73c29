//! TypeScript declaration parser for the tspy transpiler.
//!
//! This crate provides the front half of the pipeline:
//! - Preprocessor with an (off-by-default) include hook
//! - Comment recognition shared by preprocessor and parser
//! - PEG-style parser producing the concrete syntax tree
//! - AST transformer canonicalizing the concrete tree

pub mod comments;

pub mod node;
pub use node::{Node, SyntaxKind};

pub mod preprocessor;
pub use preprocessor::{preprocess, preprocess_with};

pub mod parser;
pub use parser::{ParseResult, parse_document};

pub mod transform;
pub use transform::transform;
