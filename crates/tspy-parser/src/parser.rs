//! PEG-style parser for the TypeScript declaration subset.
//!
//! Hand-written recursive descent with ordered alternatives and
//! backtracking. Whitespace skipping covers `//` and `/* */` comments.
//! The parser never aborts: when no top-level alternative matches, it
//! records a warning at the furthest failure position, inserts a
//! `ZOMBIE` placeholder covering the skipped region, and resumes at the
//! next `export` keyword (or end of input).

use tspy_common::{Diagnostic, Span, codes};

use crate::comments::comment_len;
use crate::node::{Node, SyntaxKind as K};

/// Basic type keywords recognized by the grammar.
const BASIC_TYPES: &[&str] = &[
    "object", "array", "string", "number", "boolean", "null", "integer", "uinteger", "decimal",
    "unknown", "any", "void",
];

/// Result of parsing one document.
#[derive(Debug)]
pub struct ParseResult {
    pub root: Node,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse a (preprocessed) source text into a concrete syntax tree.
#[must_use]
pub fn parse_document(source: &str) -> ParseResult {
    tracing::debug!(len = source.len(), "parsing document");
    let mut parser = Parser::new(source);
    parser.ws();
    let root = parser.document(false);
    tracing::debug!(
        children = root.children.len(),
        diagnostics = parser.diagnostics.len(),
        "parsed document"
    );
    ParseResult {
        root,
        diagnostics: parser.diagnostics,
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    /// End of the most recently consumed token, before trailing trivia.
    token_end: usize,
    diagnostics: Vec<Diagnostic>,
    /// Furthest failure position, for error messages.
    furthest: usize,
    furthest_expected: &'static str,
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte >= 0x80
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Parser {
            src,
            pos: 0,
            token_end: 0,
            diagnostics: Vec::new(),
            furthest: 0,
            furthest_expected: "declaration",
        }
    }

    // =========================================================================
    // Primitives
    // =========================================================================

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Skip whitespace and comments.
    fn ws(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => self.pos += ch.len_utf8(),
                Some('/') => match comment_len(self.src, self.pos) {
                    Some(len) => self.pos += len,
                    None => break,
                },
                _ => break,
            }
        }
    }

    fn fail(&mut self, expected: &'static str) {
        if self.pos > self.furthest {
            self.furthest = self.pos;
            self.furthest_expected = expected;
        }
    }

    /// Match literal punctuation and skip trailing trivia.
    fn lit(&mut self, token: &'static str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            self.token_end = self.pos;
            self.ws();
            true
        } else {
            self.fail(token);
            false
        }
    }

    /// Match a word token at a word boundary and skip trailing trivia.
    fn keyword(&mut self, word: &'static str) -> bool {
        if self.rest().starts_with(word) {
            let after = self.src[self.pos + word.len()..].chars().next();
            if !matches!(after, Some(ch) if is_ident_char(ch)) {
                self.pos += word.len();
                self.token_end = self.pos;
                self.ws();
                return true;
            }
        }
        self.fail(word);
        false
    }

    fn sp(&self, start: usize) -> Span {
        Span::new(start as u32, self.token_end.max(start) as u32)
    }

    fn opt_export(&mut self) {
        let _ = self.keyword("export");
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    /// `identifier`: dotted word chain; may not start with `true`/`false`.
    fn identifier(&mut self) -> Option<Node> {
        let start = self.pos;
        let rest = self.rest();
        if rest.starts_with("true") || rest.starts_with("false") {
            self.fail("identifier");
            return None;
        }
        let mut len = Self::ident_part_len(rest)?;
        loop {
            let tail = &rest[len..];
            if let Some(after_dot) = tail.strip_prefix('.') {
                if let Some(part) = Self::ident_part_len(after_dot) {
                    len += 1 + part;
                    continue;
                }
            }
            break;
        }
        let text = &rest[..len];
        self.pos += len;
        self.token_end = self.pos;
        self.ws();
        Some(Node::leaf(K::Identifier, self.sp(start), text))
    }

    fn ident_part_len(text: &str) -> Option<usize> {
        let first = text.chars().next()?;
        if !is_ident_start(first) {
            return None;
        }
        let mut len = first.len_utf8();
        for ch in text[len..].chars() {
            if is_ident_char(ch) {
                len += ch.len_utf8();
            } else {
                break;
            }
        }
        Some(len)
    }

    /// `identifier` optionally wrapped in single or double quotes.
    fn quoted_identifier(&mut self) -> Option<Node> {
        if let Some(ident) = self.identifier() {
            return Some(ident);
        }
        for quote in ["\"", "'"] {
            let save = self.pos;
            if !self.lit(quote) {
                continue;
            }
            if let Some(ident) = self.identifier() {
                if self.lit(quote) {
                    return Some(ident);
                }
            }
            self.pos = save;
        }
        self.fail("identifier");
        None
    }

    /// `optional`: the `?` marker.
    fn optional_marker(&mut self) -> Option<Node> {
        let start = self.pos;
        if !self.lit("?") {
            return None;
        }
        let span = self.sp(start);
        Some(Node::new(K::Optional, span, vec![Node::leaf(K::Text, span, "?")]))
    }

    fn marker(&mut self, word: &'static str, kind: K) -> Option<Node> {
        let start = self.pos;
        if !self.keyword(word) {
            return None;
        }
        let span = self.sp(start);
        Some(Node::new(kind, span, vec![Node::leaf(K::Text, span, word)]))
    }

    // =========================================================================
    // Document and top-level constructs
    // =========================================================================

    /// `document`: top-level constructs until end of input (or the
    /// closing brace of an ambient module).
    fn document(&mut self, inside_module: bool) -> Node {
        let start = self.pos;
        let mut children = Vec::new();
        loop {
            if self.at_end() || (inside_module && self.rest().starts_with('}')) {
                break;
            }
            match self.top_level() {
                Some(Some(node)) => children.push(node),
                Some(None) => {} // parsed and dropped (top-level literals)
                None => {
                    if inside_module {
                        break; // let the module rule report the failure
                    }
                    children.push(self.recover());
                }
            }
        }
        Node::new(K::Document, self.sp(start), children)
    }

    /// One `document` alternative, in grammar order. `Some(None)` means
    /// the construct was consumed but produces no tree node.
    fn top_level(&mut self) -> Option<Option<Node>> {
        if let Some(node) = self.interface() {
            return Some(Some(node));
        }
        if let Some(node) = self.type_alias() {
            return Some(Some(node));
        }
        if let Some(node) = self.namespace() {
            return Some(Some(node));
        }
        if let Some(node) = self.enum_decl() {
            return Some(Some(node));
        }
        if let Some(node) = self.const_decl() {
            return Some(Some(node));
        }
        if let Some(node) = self.module() {
            return Some(Some(node));
        }
        if let Some(node) = self.assignment() {
            return Some(Some(node));
        }
        if self.literal_row() {
            return Some(None);
        }
        if let Some(node) = self.exported_declaration() {
            return Some(Some(node));
        }
        if let Some(node) = self.exported_function() {
            return Some(Some(node));
        }
        None
    }

    /// Resume rule shared by all top-level constructs: record a warning,
    /// then skip to the next `export` keyword or end of input. The
    /// skipped region is represented by a `ZOMBIE` node.
    fn recover(&mut self) -> Node {
        let error_at = self.furthest.max(self.pos);
        self.diagnostics.push(Diagnostic::warning(
            Span::at(error_at as u32),
            format!(
                "parsing failed: expected {}; resuming at next 'export' or end of input",
                self.furthest_expected
            ),
            codes::PARSE_ERROR,
        ));
        let skip_from = self.pos;
        let resume = self.find_resume_point();
        self.pos = resume;
        self.token_end = resume;
        self.ws();
        Node::leaf(K::Zombie, Span::new(skip_from as u32, resume as u32), "")
    }

    fn find_resume_point(&self) -> usize {
        let bytes = self.src.as_bytes();
        let mut idx = self.pos + 1;
        while idx + 6 <= bytes.len() {
            if &bytes[idx..idx + 6] == b"export"
                && !is_ident_byte(bytes[idx - 1])
                && bytes.get(idx + 6).is_none_or(|&b| !is_ident_byte(b))
            {
                return idx;
            }
            idx += 1;
        }
        self.src.len()
    }

    /// `interface := [export] ("interface"|"class") identifier
    /// [type_parameters] [extends] declarations_block`
    fn interface(&mut self) -> Option<Node> {
        let save = self.pos;
        self.opt_export();
        if !self.keyword("interface") && !self.keyword("class") {
            self.pos = save;
            return None;
        }
        let Some(ident) = self.identifier() else {
            self.pos = save;
            return None;
        };
        let mut children = vec![ident];
        if let Some(params) = self.type_parameters() {
            children.push(params);
        }
        if let Some(extends) = self.extends_clause() {
            children.push(extends);
        }
        let Some(block) = self.declarations_block() else {
            self.pos = save;
            return None;
        };
        children.push(block);
        Some(Node::new(K::Interface, self.sp(save), children))
    }

    /// `type_alias := [export] "type" identifier [type_parameters] "=" types ";"`
    fn type_alias(&mut self) -> Option<Node> {
        let save = self.pos;
        self.opt_export();
        if !self.keyword("type") {
            self.pos = save;
            return None;
        }
        let Some(ident) = self.identifier() else {
            self.pos = save;
            return None;
        };
        let mut children = vec![ident];
        if let Some(params) = self.type_parameters() {
            children.push(params);
        }
        if !self.lit("=") {
            self.pos = save;
            return None;
        }
        let Some(types) = self.types() else {
            self.pos = save;
            return None;
        };
        children.push(types);
        if !self.lit(";") {
            self.pos = save;
            return None;
        }
        Some(Node::new(K::TypeAlias, self.sp(save), children))
    }

    /// `namespace := [export] "namespace" identifier "{" members* "}"`.
    ///
    /// A namespace whose members are all `const` is classified as
    /// `virtual_enum`; everything else stays `namespace`.
    fn namespace(&mut self) -> Option<Node> {
        let save = self.pos;
        self.opt_export();
        if !self.keyword("namespace") {
            self.pos = save;
            return None;
        }
        let Some(ident) = self.identifier() else {
            self.pos = save;
            return None;
        };
        if !self.lit("{") {
            self.pos = save;
            return None;
        }
        let mut children = vec![ident];
        loop {
            if let Some(member) = self.namespace_member() {
                children.push(member);
            } else {
                break;
            }
        }
        if !self.lit("}") {
            self.pos = save;
            return None;
        }
        let members = &children[1..];
        let kind = if !members.is_empty() && members.iter().all(|m| m.kind == K::Const) {
            K::VirtualEnum
        } else {
            K::Namespace
        };
        Some(Node::new(kind, self.sp(save), children))
    }

    fn namespace_member(&mut self) -> Option<Node> {
        if let Some(node) = self.interface() {
            return Some(node);
        }
        if let Some(node) = self.type_alias() {
            return Some(node);
        }
        if let Some(node) = self.enum_decl() {
            return Some(node);
        }
        if let Some(node) = self.const_decl() {
            return Some(node);
        }
        if let Some(node) = self.exported_declaration() {
            return Some(node);
        }
        self.exported_function()
    }

    /// `enum := [export] "enum" identifier "{" item ("," item)* [","] "}"`
    fn enum_decl(&mut self) -> Option<Node> {
        let save = self.pos;
        self.opt_export();
        if !self.keyword("enum") {
            self.pos = save;
            return None;
        }
        let Some(ident) = self.identifier() else {
            self.pos = save;
            return None;
        };
        if !self.lit("{") {
            self.pos = save;
            return None;
        }
        let mut children = vec![ident];
        let Some(first) = self.item() else {
            self.pos = save;
            return None;
        };
        children.push(first);
        loop {
            let mark = self.pos;
            if !self.lit(",") {
                break;
            }
            match self.item() {
                Some(item) => children.push(item),
                None => {
                    self.pos = mark;
                    break;
                }
            }
        }
        let _ = self.lit(",");
        if !self.lit("}") {
            self.pos = save;
            return None;
        }
        Some(Node::new(K::Enum, self.sp(save), children))
    }

    /// `item := quoted_identifier ["=" literal]`
    fn item(&mut self) -> Option<Node> {
        let save = self.pos;
        let ident = self.quoted_identifier()?;
        let mut children = vec![ident];
        let mark = self.pos;
        if self.lit("=") {
            match self.literal() {
                Some(literal) => children.push(literal),
                None => self.pos = mark,
            }
        }
        Some(Node::new(K::Item, self.sp(save), children))
    }

    /// `const := [export] "const" declaration ["=" (literal|identifier)] ";"`
    fn const_decl(&mut self) -> Option<Node> {
        let save = self.pos;
        self.opt_export();
        if !self.keyword("const") {
            self.pos = save;
            return None;
        }
        let Some(declaration) = self.declaration() else {
            self.pos = save;
            return None;
        };
        let mut children = vec![declaration];
        let mark = self.pos;
        if self.lit("=") {
            if let Some(value) = self.literal().or_else(|| self.identifier()) {
                children.push(value);
            } else {
                self.pos = mark;
            }
        }
        if !self.lit(";") {
            self.pos = save;
            return None;
        }
        Some(Node::new(K::Const, self.sp(save), children))
    }

    /// `module := "declare" "module" quoted_identifier "{" document "}"`
    fn module(&mut self) -> Option<Node> {
        let save = self.pos;
        if !self.keyword("declare") || !self.keyword("module") {
            self.pos = save;
            return None;
        }
        let Some(ident) = self.quoted_identifier() else {
            self.pos = save;
            return None;
        };
        if !self.lit("{") {
            self.pos = save;
            return None;
        }
        let document = self.document(true);
        if !self.lit("}") {
            self.pos = save;
            return None;
        }
        Some(Node::new(K::Module, self.sp(save), vec![ident, document]))
    }

    /// `assignment := variable "=" (literal|variable) ";"`
    fn assignment(&mut self) -> Option<Node> {
        let save = self.pos;
        let Some(variable) = self.variable() else {
            return None;
        };
        if !self.lit("=") {
            self.pos = save;
            return None;
        }
        let value = match self.literal() {
            Some(literal) => literal,
            None => match self.variable() {
                Some(variable) => variable,
                None => {
                    self.pos = save;
                    return None;
                }
            },
        };
        if !self.lit(";") {
            self.pos = save;
            return None;
        }
        Some(Node::new(K::Assignment, self.sp(save), vec![variable, value]))
    }

    fn variable(&mut self) -> Option<Node> {
        let start = self.pos;
        let ident = self.identifier()?;
        Some(Node::leaf(K::Variable, self.sp(start), ident.text))
    }

    /// Top-level literal rows (`literal ("," literal)*`): consumed but
    /// producing no tree node, like the original's dropped synonyms.
    fn literal_row(&mut self) -> bool {
        if self.literal().is_none() {
            return false;
        }
        loop {
            let mark = self.pos;
            if !self.lit(",") {
                break;
            }
            if self.literal().is_none() {
                self.pos = mark;
                break;
            }
        }
        true
    }

    /// `[export] declaration ";"` at document/namespace level.
    fn exported_declaration(&mut self) -> Option<Node> {
        let save = self.pos;
        self.opt_export();
        let Some(declaration) = self.declaration() else {
            self.pos = save;
            return None;
        };
        if !self.lit(";") {
            self.pos = save;
            return None;
        }
        Some(declaration)
    }

    /// `[export] function ";"` at document/namespace level.
    fn exported_function(&mut self) -> Option<Node> {
        let save = self.pos;
        self.opt_export();
        let Some(function) = self.function() else {
            self.pos = save;
            return None;
        };
        if !self.lit(";") {
            self.pos = save;
            return None;
        }
        Some(function)
    }

    // =========================================================================
    // Declarations and functions
    // =========================================================================

    /// `declaration := qualifiers [let|var] identifier [optional] ![(] [":" types]`
    fn declaration(&mut self) -> Option<Node> {
        let save = self.pos;
        let mut children = Vec::new();
        if let Some(qualifiers) = self.qualifiers() {
            children.push(qualifiers);
        }
        if !self.keyword("let") {
            let _ = self.keyword("var");
        }
        let Some(ident) = self.identifier() else {
            self.pos = save;
            return None;
        };
        children.push(ident);
        if let Some(optional) = self.optional_marker() {
            children.push(optional);
        }
        if self.rest().starts_with('(') {
            self.pos = save;
            return None;
        }
        if self.lit(":") {
            match self.types() {
                Some(types) => children.push(types),
                None => {
                    self.pos = save;
                    return None;
                }
            }
        }
        Some(Node::new(K::Declaration, self.sp(save), children))
    }

    /// `qualifiers`: `readonly` and `static` interleaved, at most once each.
    fn qualifiers(&mut self) -> Option<Node> {
        let start = self.pos;
        let mut children = Vec::new();
        let mut seen_readonly = false;
        let mut seen_static = false;
        loop {
            if !seen_readonly {
                if let Some(node) = self.marker("readonly", K::Readonly) {
                    children.push(node);
                    seen_readonly = true;
                    continue;
                }
            }
            if !seen_static {
                if let Some(node) = self.marker("static", K::Static) {
                    children.push(node);
                    seen_static = true;
                    continue;
                }
            }
            break;
        }
        if children.is_empty() {
            None
        } else {
            Some(Node::new(K::Qualifiers, self.sp(start), children))
        }
    }

    /// `function := [[static] ["function"] identifier [optional]
    /// [type_parameters]] "(" [arg_list] ")" [":" types]`
    fn function(&mut self) -> Option<Node> {
        let save = self.pos;
        let mut children = Vec::new();
        let header_save = self.pos;
        let mut header = Vec::new();
        if let Some(node) = self.marker("static", K::Static) {
            header.push(node);
        }
        let _ = self.keyword("function");
        match self.identifier() {
            Some(ident) => {
                header.push(ident);
                if let Some(optional) = self.optional_marker() {
                    header.push(optional);
                }
                if let Some(params) = self.type_parameters() {
                    header.push(params);
                }
            }
            None => {
                // anonymous function: no header at all
                self.pos = header_save;
                header.clear();
            }
        }
        children.extend(header);
        if !self.lit("(") {
            self.pos = save;
            return None;
        }
        if let Some(args) = self.arg_list() {
            children.push(args);
        }
        if !self.lit(")") {
            self.pos = save;
            return None;
        }
        if self.lit(":") {
            match self.types() {
                Some(types) => children.push(types),
                None => {
                    self.pos = save;
                    return None;
                }
            }
        }
        Some(Node::new(K::Function, self.sp(save), children))
    }

    /// `arg_list := (argument ("," argument)* ["," arg_tail]) | arg_tail`
    fn arg_list(&mut self) -> Option<Node> {
        let start = self.pos;
        let mut children = Vec::new();
        match self.argument() {
            Some(first) => {
                children.push(first);
                loop {
                    let mark = self.pos;
                    if !self.lit(",") {
                        break;
                    }
                    if let Some(argument) = self.argument() {
                        children.push(argument);
                        continue;
                    }
                    if let Some(tail) = self.arg_tail() {
                        children.push(tail);
                        break;
                    }
                    self.pos = mark;
                    break;
                }
            }
            None => {
                children.push(self.arg_tail()?);
            }
        }
        Some(Node::new(K::ArgList, self.sp(start), children))
    }

    /// `argument := identifier [optional] [":" types]`
    fn argument(&mut self) -> Option<Node> {
        let start = self.pos;
        let ident = self.identifier()?;
        let mut children = vec![ident];
        if let Some(optional) = self.optional_marker() {
            children.push(optional);
        }
        let mark = self.pos;
        if self.lit(":") {
            match self.types() {
                Some(types) => children.push(types),
                None => self.pos = mark,
            }
        }
        Some(Node::new(K::Argument, self.sp(start), children))
    }

    /// `arg_tail := "..." identifier [":" array_of]`
    fn arg_tail(&mut self) -> Option<Node> {
        let save = self.pos;
        if !self.lit("...") {
            return None;
        }
        let Some(ident) = self.identifier() else {
            self.pos = save;
            return None;
        };
        let mut children = vec![ident];
        let mark = self.pos;
        if self.lit(":") {
            match self.array_of() {
                Some(array) => children.push(array),
                None => self.pos = mark,
            }
        }
        Some(Node::new(K::ArgTail, self.sp(save), children))
    }

    /// `declarations_block := "{" [(function|declaration)
    /// ([";"] (function|declaration))* [";" map_signature] [";"]] "}"`
    fn declarations_block(&mut self) -> Option<Node> {
        let save = self.pos;
        if !self.lit("{") {
            return None;
        }
        let mut children = Vec::new();
        if let Some(first) = self.block_member() {
            children.push(first);
            loop {
                let mark = self.pos;
                let _ = self.lit(";");
                match self.block_member() {
                    Some(member) => children.push(member),
                    None => {
                        self.pos = mark;
                        break;
                    }
                }
            }
            let mark = self.pos;
            if self.lit(";") {
                match self.map_signature() {
                    Some(signature) => children.push(signature),
                    None => self.pos = mark,
                }
            }
            let _ = self.lit(";");
        }
        if !self.lit("}") {
            self.pos = save;
            return None;
        }
        Some(Node::new(K::DeclarationsBlock, self.sp(save), children))
    }

    fn block_member(&mut self) -> Option<Node> {
        self.function().or_else(|| self.declaration())
    }

    // =========================================================================
    // Type expressions
    // =========================================================================

    /// `types := (intersection|type) ("|" (intersection|type))*`
    fn types(&mut self) -> Option<Node> {
        let start = self.pos;
        let first = self.intersection_or_type()?;
        let mut children = vec![first];
        loop {
            let mark = self.pos;
            if !self.lit("|") {
                break;
            }
            match self.intersection_or_type() {
                Some(alternative) => children.push(alternative),
                None => {
                    self.pos = mark;
                    break;
                }
            }
        }
        Some(Node::new(K::Types, self.sp(start), children))
    }

    /// `intersection := type ("&" type)+`, otherwise a plain `type`.
    fn intersection_or_type(&mut self) -> Option<Node> {
        let start = self.pos;
        let first = self.type_rule()?;
        if !self.rest().starts_with('&') {
            return Some(first);
        }
        let mut children = vec![first];
        loop {
            let mark = self.pos;
            if !self.lit("&") {
                break;
            }
            match self.type_rule() {
                Some(operand) => children.push(operand),
                None => {
                    self.pos = mark;
                    break;
                }
            }
        }
        if children.len() == 1 {
            return children.pop();
        }
        Some(Node::new(K::Intersection, self.sp(start), children))
    }

    /// `type`: ordered alternatives, wrapped in a `type` node.
    fn type_rule(&mut self) -> Option<Node> {
        let start = self.pos;
        let inner = self
            .array_of()
            .or_else(|| self.basic_type())
            .or_else(|| self.generic_type())
            .or_else(|| self.type_name())
            .or_else(|| self.paren_types())
            .or_else(|| self.mapped_type())
            .or_else(|| self.declarations_block())
            .or_else(|| self.type_tuple())
            .or_else(|| self.literal())
            .or_else(|| self.func_type())?;
        Some(Node::new(K::Type, self.sp(start), vec![inner]))
    }

    /// `array_of := ["readonly"] array_type "[]"`
    fn array_of(&mut self) -> Option<Node> {
        let save = self.pos;
        let _ = self.keyword("readonly");
        let Some(element) = self.array_type() else {
            self.pos = save;
            return None;
        };
        if !self.lit("[]") {
            self.pos = save;
            return None;
        }
        let span = element.span;
        let array_type = Node::new(K::ArrayType, span, vec![element]);
        let array_types = Node::new(K::ArrayTypes, span, vec![array_type]);
        Some(Node::new(K::ArrayOf, self.sp(save), vec![array_types]))
    }

    fn array_type(&mut self) -> Option<Node> {
        self.basic_type()
            .or_else(|| self.generic_type())
            .or_else(|| self.type_name())
            .or_else(|| self.paren_types())
            .or_else(|| self.type_tuple())
            .or_else(|| self.declarations_block())
    }

    fn basic_type(&mut self) -> Option<Node> {
        let start = self.pos;
        for word in BASIC_TYPES {
            if self.rest().starts_with(word) {
                let after = self.src[self.pos + word.len()..].chars().next();
                if !matches!(after, Some(ch) if is_ident_char(ch)) {
                    self.pos += word.len();
                    self.token_end = self.pos;
                    self.ws();
                    return Some(Node::leaf(K::BasicType, self.sp(start), *word));
                }
            }
        }
        self.fail("basic type");
        None
    }

    /// `generic_type := type_name type_parameters`
    fn generic_type(&mut self) -> Option<Node> {
        let save = self.pos;
        let name = self.type_name()?;
        let Some(params) = self.type_parameters() else {
            self.pos = save;
            return None;
        };
        Some(Node::new(K::GenericType, self.sp(save), vec![name, params]))
    }

    fn type_name(&mut self) -> Option<Node> {
        let start = self.pos;
        let ident = self.identifier()?;
        Some(Node::new(K::TypeName, self.sp(start), vec![ident]))
    }

    fn paren_types(&mut self) -> Option<Node> {
        let save = self.pos;
        if !self.lit("(") {
            return None;
        }
        let Some(types) = self.types() else {
            self.pos = save;
            return None;
        };
        if !self.lit(")") {
            self.pos = save;
            return None;
        }
        Some(types)
    }

    /// `type_parameters := "<" parameter_types ("," parameter_types)* ">"`
    fn type_parameters(&mut self) -> Option<Node> {
        let save = self.pos;
        if !self.lit("<") {
            return None;
        }
        let Some(first) = self.parameter_types() else {
            self.pos = save;
            return None;
        };
        let mut children = vec![first];
        loop {
            let mark = self.pos;
            if !self.lit(",") {
                break;
            }
            match self.parameter_types() {
                Some(parameter) => children.push(parameter),
                None => {
                    self.pos = mark;
                    break;
                }
            }
        }
        if !self.lit(">") {
            self.pos = save;
            return None;
        }
        Some(Node::new(K::TypeParameters, self.sp(save), children))
    }

    /// `parameter_types := parameter_type ("|" parameter_type)*`
    fn parameter_types(&mut self) -> Option<Node> {
        let start = self.pos;
        let first = self.parameter_type()?;
        let mut children = vec![first];
        loop {
            let mark = self.pos;
            if !self.lit("|") {
                break;
            }
            match self.parameter_type() {
                Some(parameter) => children.push(parameter),
                None => {
                    self.pos = mark;
                    break;
                }
            }
        }
        Some(Node::new(K::ParameterTypes, self.sp(start), children))
    }

    /// `parameter_type := array_of | basic_type | generic_type |
    /// (type_name [extends_type] [equals_type]) | declarations_block | type_tuple`
    fn parameter_type(&mut self) -> Option<Node> {
        let start = self.pos;
        if let Some(inner) = self
            .array_of()
            .or_else(|| self.basic_type())
            .or_else(|| self.generic_type())
        {
            return Some(Node::new(K::ParameterType, self.sp(start), vec![inner]));
        }
        if let Some(name) = self.type_name() {
            let mut children = vec![name];
            if let Some(extends) = self.extends_type() {
                children.push(extends);
            }
            if let Some(equals) = self.equals_type() {
                children.push(equals);
            }
            return Some(Node::new(K::ParameterType, self.sp(start), children));
        }
        let inner = self.declarations_block().or_else(|| self.type_tuple())?;
        Some(Node::new(K::ParameterType, self.sp(start), vec![inner]))
    }

    /// `extends_type := "extends" (basic_type|type_name)`
    fn extends_type(&mut self) -> Option<Node> {
        let save = self.pos;
        if !self.keyword("extends") {
            return None;
        }
        let Some(inner) = self.basic_type().or_else(|| self.type_name()) else {
            self.pos = save;
            return None;
        };
        Some(Node::new(K::ExtendsType, self.sp(save), vec![inner]))
    }

    /// `equals_type := "=" (basic_type|type_name)`
    fn equals_type(&mut self) -> Option<Node> {
        let save = self.pos;
        if !self.lit("=") {
            return None;
        }
        let Some(inner) = self.basic_type().or_else(|| self.type_name()) else {
            self.pos = save;
            return None;
        };
        Some(Node::new(K::EqualsType, self.sp(save), vec![inner]))
    }

    /// `extends := "extends" (generic_type|type_name)
    /// ("," (generic_type|type_name))*` on interfaces.
    fn extends_clause(&mut self) -> Option<Node> {
        let save = self.pos;
        if !self.keyword("extends") {
            return None;
        }
        let Some(first) = self.generic_type().or_else(|| self.type_name()) else {
            self.pos = save;
            return None;
        };
        let mut children = vec![first];
        loop {
            let mark = self.pos;
            if !self.lit(",") {
                break;
            }
            match self.generic_type().or_else(|| self.type_name()) {
                Some(base) => children.push(base),
                None => {
                    self.pos = mark;
                    break;
                }
            }
        }
        Some(Node::new(K::Extends, self.sp(save), children))
    }

    /// `mapped_type := "{" map_signature [";"] "}"`
    fn mapped_type(&mut self) -> Option<Node> {
        let save = self.pos;
        if !self.lit("{") {
            return None;
        }
        let Some(signature) = self.map_signature() else {
            self.pos = save;
            return None;
        };
        let _ = self.lit(";");
        if !self.lit("}") {
            self.pos = save;
            return None;
        }
        Some(Node::new(K::MappedType, self.sp(save), vec![signature]))
    }

    /// `map_signature := index_signature ":" types`
    fn map_signature(&mut self) -> Option<Node> {
        let save = self.pos;
        let signature = self.index_signature()?;
        if !self.lit(":") {
            self.pos = save;
            return None;
        }
        let Some(types) = self.types() else {
            self.pos = save;
            return None;
        };
        Some(Node::new(K::MapSignature, self.sp(save), vec![signature, types]))
    }

    /// `index_signature := [readonly] "[" identifier (":" | "in" "keyof") type "]"`
    fn index_signature(&mut self) -> Option<Node> {
        let save = self.pos;
        let mut children = Vec::new();
        if let Some(readonly) = self.marker("readonly", K::Readonly) {
            children.push(readonly);
        }
        if !self.lit("[") {
            self.pos = save;
            return None;
        }
        let Some(ident) = self.identifier() else {
            self.pos = save;
            return None;
        };
        children.push(ident);
        if !self.lit(":") && !(self.keyword("in") && self.keyword("keyof")) {
            self.pos = save;
            return None;
        }
        let Some(key_type) = self.type_rule() else {
            self.pos = save;
            return None;
        };
        children.push(key_type);
        if !self.lit("]") {
            self.pos = save;
            return None;
        }
        Some(Node::new(K::IndexSignature, self.sp(save), children))
    }

    /// `type_tuple := "[" types ("," types)* "]"`
    fn type_tuple(&mut self) -> Option<Node> {
        let save = self.pos;
        if !self.lit("[") {
            return None;
        }
        let Some(first) = self.types() else {
            self.pos = save;
            return None;
        };
        let mut children = vec![first];
        loop {
            let mark = self.pos;
            if !self.lit(",") {
                break;
            }
            match self.types() {
                Some(types) => children.push(types),
                None => {
                    self.pos = mark;
                    break;
                }
            }
        }
        if !self.lit("]") {
            self.pos = save;
            return None;
        }
        Some(Node::new(K::TypeTuple, self.sp(save), children))
    }

    /// `func_type := "(" [arg_list] ")" "=>" types`
    fn func_type(&mut self) -> Option<Node> {
        let save = self.pos;
        if !self.lit("(") {
            return None;
        }
        let mut children = Vec::new();
        if let Some(args) = self.arg_list() {
            children.push(args);
        }
        if !self.lit(")") || !self.lit("=>") {
            self.pos = save;
            return None;
        }
        let Some(types) = self.types() else {
            self.pos = save;
            return None;
        };
        children.push(types);
        Some(Node::new(K::FuncType, self.sp(save), children))
    }

    // =========================================================================
    // Literals
    // =========================================================================

    /// `literal := integer | number | boolean | string | array | object`
    fn literal(&mut self) -> Option<Node> {
        let start = self.pos;
        let inner = self
            .numeric()
            .or_else(|| self.boolean())
            .or_else(|| self.string_lit())
            .or_else(|| self.array_lit())
            .or_else(|| self.object_lit())?;
        Some(Node::new(K::Literal, self.sp(start), vec![inner]))
    }

    /// Integer and floating point literals share a scanner; the result
    /// kind depends on whether a fraction or exponent was consumed.
    fn numeric(&mut self) -> Option<Node> {
        let start = self.pos;
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut len = 0;
        if bytes.first() == Some(&b'-') {
            len += 1;
        }
        let digits = Self::digit_run(&bytes[len..]);
        if digits == 0 {
            self.fail("number");
            return None;
        }
        len += digits;
        let mut is_integer = true;
        if bytes.get(len) == Some(&b'.') {
            let frac = Self::digit_run(&bytes[len + 1..]);
            if frac > 0 {
                len += 1 + frac;
                is_integer = false;
            }
        }
        if matches!(bytes.get(len), Some(b'e' | b'E')) {
            let mut exp_len = 1;
            if matches!(bytes.get(len + exp_len), Some(b'+' | b'-')) {
                exp_len += 1;
            }
            let exp_digits = Self::digit_run(&bytes[len + exp_len..]);
            if exp_digits > 0 {
                len += exp_len + exp_digits;
                is_integer = false;
            }
        }
        let text = &rest[..len];
        self.pos += len;
        self.token_end = self.pos;
        self.ws();
        let kind = if is_integer { K::Integer } else { K::Number };
        Some(Node::leaf(kind, self.sp(start), text))
    }

    fn digit_run(bytes: &[u8]) -> usize {
        bytes.iter().take_while(|b| b.is_ascii_digit()).count()
    }

    fn boolean(&mut self) -> Option<Node> {
        let start = self.pos;
        for word in ["true", "false"] {
            if self.rest().starts_with(word) {
                let after = self.src[self.pos + word.len()..].chars().next();
                if !matches!(after, Some(ch) if is_ident_char(ch)) {
                    self.pos += word.len();
                    self.token_end = self.pos;
                    self.ws();
                    return Some(Node::leaf(K::Boolean, self.sp(start), word));
                }
            }
        }
        self.fail("boolean");
        None
    }

    /// Single- or double-quoted string on one line; the quotes are part
    /// of the token text.
    fn string_lit(&mut self) -> Option<Node> {
        let start = self.pos;
        let rest = self.rest();
        let quote = match rest.chars().next() {
            Some(ch @ ('"' | '\'')) => ch,
            _ => {
                self.fail("string");
                return None;
            }
        };
        let body = &rest[1..];
        let close = body.find([quote, '\n']);
        match close {
            Some(i) if body[i..].starts_with(quote) => {
                let len = 1 + i + 1;
                let text = &rest[..len];
                self.pos += len;
                self.token_end = self.pos;
                self.ws();
                Some(Node::leaf(K::String, self.sp(start), text))
            }
            _ => {
                self.fail("closing quote");
                None
            }
        }
    }

    /// `array := "[" [literal ("," literal)*] "]"`
    fn array_lit(&mut self) -> Option<Node> {
        let save = self.pos;
        if !self.lit("[") {
            return None;
        }
        let mut children = Vec::new();
        if let Some(first) = self.literal() {
            children.push(first);
            loop {
                let mark = self.pos;
                if !self.lit(",") {
                    break;
                }
                match self.literal() {
                    Some(literal) => children.push(literal),
                    None => {
                        self.pos = mark;
                        break;
                    }
                }
            }
        }
        if !self.lit("]") {
            self.pos = save;
            return None;
        }
        Some(Node::new(K::Array, self.sp(save), children))
    }

    /// `object := "{" [association ("," association)*] [","] "}"`
    fn object_lit(&mut self) -> Option<Node> {
        let save = self.pos;
        if !self.lit("{") {
            return None;
        }
        let mut children = Vec::new();
        if let Some(first) = self.association() {
            children.push(first);
            loop {
                let mark = self.pos;
                if !self.lit(",") {
                    break;
                }
                match self.association() {
                    Some(association) => children.push(association),
                    None => {
                        self.pos = mark;
                        break;
                    }
                }
            }
            let _ = self.lit(",");
        }
        if !self.lit("}") {
            self.pos = save;
            return None;
        }
        Some(Node::new(K::Object, self.sp(save), children))
    }

    /// `association := name ":" literal`
    fn association(&mut self) -> Option<Node> {
        let save = self.pos;
        let name = self.name()?;
        if !self.lit(":") {
            self.pos = save;
            return None;
        }
        let Some(literal) = self.literal() else {
            self.pos = save;
            return None;
        };
        Some(Node::new(K::Association, self.sp(save), vec![name, literal]))
    }

    /// `name := identifier | '"' identifier '"'`
    fn name(&mut self) -> Option<Node> {
        let start = self.pos;
        if let Some(ident) = self.identifier() {
            return Some(Node::leaf(K::Name, self.sp(start), ident.text));
        }
        let save = self.pos;
        if self.lit("\"") {
            if let Some(ident) = self.identifier() {
                if self.lit("\"") {
                    return Some(Node::leaf(K::Name, self.sp(save), ident.text));
                }
            }
            self.pos = save;
        }
        None
    }
}
