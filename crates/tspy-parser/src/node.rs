//! Syntax tree node types.
//!
//! Every node carries the grammar rule that produced it (`SyntaxKind`),
//! its source span, its ordered children, and - for leaves - the matched
//! token text. Interior nodes reconstruct their text via [`Node::content`].

use serde::Serialize;
use tspy_common::{Span, Spanned};

/// The grammar rule that produced a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxKind {
    // Top-level constructs
    Document,
    Module,
    Namespace,
    VirtualEnum,
    Interface,
    TypeAlias,
    Enum,
    Const,
    Declaration,
    Function,
    // Type expressions
    Types,
    Type,
    BasicType,
    TypeName,
    GenericType,
    TypeParameters,
    ParameterTypes,
    ParameterType,
    TypeTuple,
    ArrayOf,
    ArrayTypes,
    ArrayType,
    FuncType,
    MappedType,
    MapSignature,
    IndexSignature,
    Intersection,
    Extends,
    ExtendsType,
    EqualsType,
    // Structure
    DeclarationsBlock,
    ArgList,
    Argument,
    ArgTail,
    Optional,
    Qualifiers,
    Readonly,
    Static,
    Identifier,
    Variable,
    // Literals
    Literal,
    Integer,
    Number,
    String,
    Boolean,
    Array,
    Object,
    Association,
    Name,
    Assignment,
    Item,
    // Anonymous token text (renamed to TEXT by the transformer)
    Text,
    // Placeholder inserted when error recovery skips source text
    Zombie,
}

impl SyntaxKind {
    /// The grammar-rule name, used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SyntaxKind::Document => "document",
            SyntaxKind::Module => "module",
            SyntaxKind::Namespace => "namespace",
            SyntaxKind::VirtualEnum => "virtual_enum",
            SyntaxKind::Interface => "interface",
            SyntaxKind::TypeAlias => "type_alias",
            SyntaxKind::Enum => "enum",
            SyntaxKind::Const => "const",
            SyntaxKind::Declaration => "declaration",
            SyntaxKind::Function => "function",
            SyntaxKind::Types => "types",
            SyntaxKind::Type => "type",
            SyntaxKind::BasicType => "basic_type",
            SyntaxKind::TypeName => "type_name",
            SyntaxKind::GenericType => "generic_type",
            SyntaxKind::TypeParameters => "type_parameters",
            SyntaxKind::ParameterTypes => "parameter_types",
            SyntaxKind::ParameterType => "parameter_type",
            SyntaxKind::TypeTuple => "type_tuple",
            SyntaxKind::ArrayOf => "array_of",
            SyntaxKind::ArrayTypes => "array_types",
            SyntaxKind::ArrayType => "array_type",
            SyntaxKind::FuncType => "func_type",
            SyntaxKind::MappedType => "mapped_type",
            SyntaxKind::MapSignature => "map_signature",
            SyntaxKind::IndexSignature => "index_signature",
            SyntaxKind::Intersection => "intersection",
            SyntaxKind::Extends => "extends",
            SyntaxKind::ExtendsType => "extends_type",
            SyntaxKind::EqualsType => "equals_type",
            SyntaxKind::DeclarationsBlock => "declarations_block",
            SyntaxKind::ArgList => "arg_list",
            SyntaxKind::Argument => "argument",
            SyntaxKind::ArgTail => "arg_tail",
            SyntaxKind::Optional => "optional",
            SyntaxKind::Qualifiers => "qualifiers",
            SyntaxKind::Readonly => "readonly",
            SyntaxKind::Static => "static",
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::Variable => "variable",
            SyntaxKind::Literal => "literal",
            SyntaxKind::Integer => "integer",
            SyntaxKind::Number => "number",
            SyntaxKind::String => "string",
            SyntaxKind::Boolean => "boolean",
            SyntaxKind::Array => "array",
            SyntaxKind::Object => "object",
            SyntaxKind::Association => "association",
            SyntaxKind::Name => "name",
            SyntaxKind::Assignment => "assignment",
            SyntaxKind::Item => "item",
            SyntaxKind::Text => "TEXT",
            SyntaxKind::Zombie => "ZOMBIE",
        }
    }
}

/// A concrete/abstract syntax tree node.
#[derive(Clone, Debug, Serialize)]
pub struct Node {
    pub kind: SyntaxKind,
    pub span: Span,
    /// Matched token text; empty for interior nodes.
    pub text: String,
    pub children: Vec<Node>,
}

impl Node {
    /// Create an interior node.
    #[must_use]
    pub fn new(kind: SyntaxKind, span: Span, children: Vec<Node>) -> Self {
        Node {
            kind,
            span,
            text: String::new(),
            children,
        }
    }

    /// Create a leaf node holding token text.
    #[must_use]
    pub fn leaf(kind: SyntaxKind, span: Span, text: impl Into<String>) -> Self {
        Node {
            kind,
            span,
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// First direct child of the given kind.
    #[must_use]
    pub fn child(&self, kind: SyntaxKind) -> Option<&Node> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// True if a direct child of the given kind exists.
    #[must_use]
    pub fn has(&self, kind: SyntaxKind) -> bool {
        self.child(kind).is_some()
    }

    /// All direct children of the given kind, in order.
    pub fn children_of(&self, kind: SyntaxKind) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    /// All descendants of the given kind (preorder, excluding self).
    #[must_use]
    pub fn select(&self, kind: SyntaxKind) -> Vec<&Node> {
        let mut out = Vec::new();
        for child in &self.children {
            child.collect_into(kind, &mut out);
        }
        out
    }

    fn collect_into<'a>(&'a self, kind: SyntaxKind, out: &mut Vec<&'a Node>) {
        if self.kind == kind {
            out.push(self);
        }
        for child in &self.children {
            child.collect_into(kind, out);
        }
    }

    /// The text covered by this node: its own token text for leaves,
    /// the concatenation of its children's content otherwise.
    #[must_use]
    pub fn content(&self) -> String {
        if self.children.is_empty() {
            return self.text.clone();
        }
        let mut out = String::new();
        for child in &self.children {
            out.push_str(&child.content());
        }
        out
    }
}

impl Spanned for Node {
    fn span(&self) -> Span {
        self.span
    }
}
