//! The semantic compiler: walks the AST and emits Python source.
//!
//! State is reset between runs; scoped information lives on explicit
//! stacks (`known_types`, `local_classes`, `optional_keys`, `obj_name`,
//! `scope_type`) that are returned to their pre-entry depth after each
//! node. Nested anonymous classes are hoisted through `local_classes`
//! so they always precede the declaration that uses them.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use tspy_common::{Diagnostic, TranspileOptions, codes};
use tspy_parser::node::{Node, SyntaxKind as K};

mod declarations;
pub mod helpers;
mod literals;
mod types;

use helpers::{
    TYPING_TYPES, collapse_blank_lines, contains_word, escape_keyword, py_bool,
    replace_word_outside_quotes, strip_trailing_spaces,
};

/// Output of one emitter run.
#[derive(Debug)]
pub struct EmitResult {
    pub output: String,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum ScopeKind {
    Plain,
    Interface,
}

/// Compiler for the abstract syntax tree of a declaration source file.
#[derive(Debug)]
pub struct Emitter {
    options: TranspileOptions,
    // Derived from options on reset
    base_class_name: String,
    base_class_import: Option<String>,
    class_decorator: String,
    // Per-run state
    diagnostics: Vec<Diagnostic>,
    overloaded_type_names: FxHashSet<String>,
    known_types: Vec<FxHashSet<String>>,
    local_classes: Vec<Vec<String>>,
    optional_keys: Vec<Vec<String>>,
    base_classes: IndexMap<String, Vec<String>>,
    typed_dicts: FxHashSet<String>,
    basic_type_aliases: FxHashSet<String>,
    obj_name: Vec<String>,
    scope_type: Vec<ScopeKind>,
    type_param_renames: Vec<FxHashMap<String, String>>,
    constructor_prefaces: Vec<Vec<String>>,
    func_name: String,
    strip_type_from_const: bool,
}

impl Emitter {
    #[must_use]
    pub fn new(options: TranspileOptions) -> Self {
        let mut emitter = Emitter {
            options,
            base_class_name: String::new(),
            base_class_import: None,
            class_decorator: String::new(),
            diagnostics: Vec::new(),
            overloaded_type_names: FxHashSet::default(),
            known_types: Vec::new(),
            local_classes: Vec::new(),
            optional_keys: Vec::new(),
            base_classes: IndexMap::new(),
            typed_dicts: FxHashSet::default(),
            basic_type_aliases: FxHashSet::default(),
            obj_name: Vec::new(),
            scope_type: Vec::new(),
            type_param_renames: Vec::new(),
            constructor_prefaces: Vec::new(),
            func_name: String::new(),
            strip_type_from_const: false,
        };
        emitter.reset();
        emitter
    }

    /// Swap in a new configuration (used by the per-thread cached
    /// instance). State is re-derived on the next [`Emitter::emit`].
    pub fn configure(&mut self, options: TranspileOptions) {
        self.options = options;
    }

    /// Reset all per-run state.
    fn reset(&mut self) {
        let (base, import) = self.options.split_base_class();
        self.base_class_name = base;
        self.base_class_import = import;
        self.class_decorator = self.options.normalized_decorator();

        self.diagnostics.clear();
        self.overloaded_type_names.clear();
        self.known_types = vec![
            [
                "Union", "List", "Tuple", "Optional", "Dict", "Any", "Generic", "Coroutine",
                "list",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        ];
        self.local_classes = vec![Vec::new()];
        self.optional_keys = vec![Vec::new()];
        self.base_classes = IndexMap::new();
        self.typed_dicts = std::iter::once("TypedDict".to_string()).collect();
        self.basic_type_aliases.clear();
        self.obj_name = vec!["TOPLEVEL_".to_string()];
        self.scope_type = vec![ScopeKind::Plain];
        self.type_param_renames.clear();
        self.constructor_prefaces.clear();
        self.func_name.clear();
        self.strip_type_from_const = false;
    }

    /// Compile a document AST to Python source.
    pub fn emit(&mut self, root: &Node) -> EmitResult {
        self.reset();
        tracing::debug!(kind = root.kind.name(), "emitting");
        self.prepare(root);
        let body = self.emit_top(root, "");
        let output = self.finalize(root, body);
        EmitResult {
            output,
            diagnostics: std::mem::take(&mut self.diagnostics),
        }
    }

    /// Base classes recorded per emitted class, in declaration order.
    #[must_use]
    pub fn recorded_base_classes(&self) -> &IndexMap<String, Vec<String>> {
        &self.base_classes
    }

    /// Aliases whose right-hand side consists only of basic types and
    /// literals.
    #[must_use]
    pub fn basic_type_aliases(&self) -> &FxHashSet<String> {
        &self.basic_type_aliases
    }

    // =========================================================================
    // Scope helpers
    // =========================================================================

    pub(super) fn warn(&mut self, node: &Node, message: impl Into<String>, code: u32) {
        self.diagnostics.push(Diagnostic::warning(node.span, message, code));
    }

    pub(super) fn in_interface(&self) -> bool {
        self.scope_type.last() == Some(&ScopeKind::Interface)
    }

    pub(super) fn is_toplevel(&self) -> bool {
        self.obj_name.len() == 1
    }

    pub(super) fn is_known_type(&self, name: &str) -> bool {
        self.known_types.iter().any(|frame| frame.contains(name))
    }

    pub(super) fn lookup_type_param(&self, name: &str) -> Option<String> {
        self.type_param_renames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name).cloned())
    }

    pub(super) fn current_obj_name(&self) -> String {
        self.obj_name.last().cloned().unwrap_or_default()
    }

    pub(super) fn push_local_class(&mut self, definition: String) {
        if let Some(frame) = self.local_classes.last_mut() {
            frame.push(definition);
        }
    }

    pub(super) fn push_optional_key(&mut self, key: String) {
        if let Some(frame) = self.optional_keys.last_mut() {
            frame.push(key);
        }
    }

    pub(super) fn add_known_type(&mut self, name: String) {
        if let Some(frame) = self.known_types.last_mut() {
            frame.insert(name);
        }
    }

    /// Pop the current hoisting frame and render its classes.
    pub(super) fn render_local_classes(&mut self) -> String {
        self.func_name.clear();
        let classes = self.local_classes.pop().unwrap_or_default();
        if classes.is_empty() {
            String::new()
        } else {
            format!("{}\n", classes.join("\n"))
        }
    }

    /// Render and clear the current hoisting frame without changing the
    /// stack depth (the top-level "refresh").
    pub(super) fn flush_local_classes(&mut self) -> String {
        self.func_name.clear();
        let classes = match self.local_classes.last_mut() {
            Some(frame) => std::mem::take(frame),
            None => Vec::new(),
        };
        if classes.is_empty() {
            String::new()
        } else {
            format!("{}\n", classes.join("\n"))
        }
    }

    pub(super) fn has_pending_local_classes(&self) -> bool {
        self.local_classes.last().is_some_and(|frame| !frame.is_empty())
    }

    // =========================================================================
    // Document
    // =========================================================================

    /// Record identifiers used both as a type alias and as a namespace;
    /// for those the namespace wins and the alias is suppressed.
    fn prepare(&mut self, root: &Node) {
        let aliases: FxHashSet<String> = root
            .children_of(K::TypeAlias)
            .filter_map(|n| n.child(K::Identifier))
            .map(|id| id.text.clone())
            .collect();
        let namespaces: FxHashSet<String> = root
            .children
            .iter()
            .filter(|n| matches!(n.kind, K::Namespace | K::VirtualEnum))
            .filter_map(|n| n.child(K::Identifier))
            .map(|id| id.text.clone())
            .collect();
        self.overloaded_type_names = aliases.intersection(&namespaces).cloned().collect();
    }

    /// Dispatch for document- and namespace-level constructs.
    pub(super) fn emit_top(&mut self, node: &Node, decorator: &str) -> String {
        match node.kind {
            K::Document => self.emit_document(node),
            K::Module => self.emit_module(node),
            K::Interface => self.emit_interface(node),
            K::TypeAlias => self.emit_type_alias(node),
            K::Namespace => self.emit_namespace(node),
            K::VirtualEnum => self.emit_virtual_enum(node),
            K::Enum => self.emit_enum(node),
            K::Const => self.emit_const(node),
            K::Declaration => self.emit_declaration(node),
            K::Function => self.emit_function(node, decorator),
            K::Assignment => self.emit_assignment(node),
            _ => self.emit_zombie(node),
        }
    }

    fn emit_document(&mut self, node: &Node) -> String {
        let modules: Vec<&Node> = node.children_of(K::Module).collect();
        if modules.len() > 1 {
            self.warn(
                node,
                "Transpiling more than a single ambient module is not yet implemented! \
                 Only the first ambient module will be transpiled for now.",
                codes::NOT_YET_IMPLEMENTED,
            );
            return match modules[0].child(K::Document) {
                Some(document) => self.emit_document(document),
                None => String::new(),
            };
        }
        let decorators = self.overload_decorators(&node.children);
        let parts: Vec<String> = node
            .children
            .iter()
            .enumerate()
            .filter(|(_, child)| child.kind != K::Declaration)
            .map(|(i, child)| {
                let decorator = decorators.get(&i).map(String::as_str).unwrap_or("");
                self.emit_top(child, decorator)
            })
            .collect();
        parts.join("\n\n")
    }

    fn emit_module(&mut self, node: &Node) -> String {
        match node.child(K::Document) {
            Some(document) => self.emit_document(document),
            None => self.emit_zombie(node),
        }
    }

    /// A `ZOMBIE` placeholder (left behind by error recovery) reaching
    /// the emitter is itself an error; it lowers to nothing.
    pub(super) fn emit_zombie(&mut self, node: &Node) -> String {
        self.diagnostics.push(Diagnostic::error(
            node.span,
            "Malformed syntax-tree! Possibly caused by a parsing error.",
            codes::ERROR,
        ));
        String::new()
    }

    // =========================================================================
    // Overload detection
    // =========================================================================

    /// Scan `function` members in order; repeated names make the first
    /// occurrence a single-dispatch root and later ones registrations.
    pub(super) fn overload_decorators(&self, members: &[Node]) -> FxHashMap<usize, String> {
        let root_decorator = if self.in_interface() {
            "@singledispatchmethod"
        } else {
            "@singledispatch"
        };
        let mut first_use: FxHashMap<String, usize> = FxHashMap::default();
        let mut decorators: FxHashMap<usize, String> = FxHashMap::default();
        for (i, member) in members.iter().enumerate() {
            if member.kind != K::Function {
                continue;
            }
            let Some(ident) = member.child(K::Identifier) else {
                continue;
            };
            let name = escape_keyword(&ident.text);
            match first_use.get(&name) {
                Some(&first) => {
                    decorators
                        .entry(first)
                        .or_insert_with(|| root_decorator.to_string());
                    decorators.insert(i, format!("@{name}.register"));
                }
                None => {
                    first_use.insert(name, i);
                }
            }
        }
        decorators
    }

    // =========================================================================
    // Class headers and type parameters
    // =========================================================================

    /// Render `class Name(bases):` with TypedDict totality handling.
    /// `force_base_class` overrides the configured base class; a blank
    /// (whitespace) override suppresses any base.
    pub(super) fn render_class_header(
        &self,
        name: &str,
        base_classes: &str,
        force_base_class: &str,
        optional_keys: &[String],
    ) -> String {
        let decorator = &self.class_decorator;
        let chosen = if force_base_class.is_empty() {
            self.base_class_name.as_str()
        } else {
            force_base_class
        };
        let base_class_name = chosen.trim();
        if base_class_name == "TypedDict" {
            let total = optional_keys.is_empty() || self.options.use_not_required;
            if !base_classes.is_empty() {
                let td_name = if base_classes.contains("Generic[") {
                    "GenericTypedDict"
                } else {
                    "TypedDict"
                };
                if self.options.use_not_required {
                    return format!("{decorator}class {name}({base_classes}, {td_name}):\n");
                }
                return format!(
                    "{decorator}class {name}({base_classes}, {td_name}, total={}):\n",
                    py_bool(total)
                );
            }
            if self.options.use_not_required {
                return format!("{decorator}class {name}(TypedDict):\n");
            }
            return format!(
                "{decorator}class {name}(TypedDict, total={}):\n",
                py_bool(total)
            );
        }
        if !base_classes.is_empty() {
            if !base_class_name.is_empty() {
                return format!("{decorator}class {name}({base_classes}, {base_class_name}):\n");
            }
            return format!("{decorator}class {name}({base_classes}):\n");
        }
        if !base_class_name.is_empty() {
            return format!("{decorator}class {name}({base_class_name}):\n");
        }
        format!("{decorator}class {name}:\n")
    }

    /// Lower declared type parameters into synthesized `Owner_Param`
    /// TypeVars. Returns the joined parameter list and the TypeVar
    /// preface lines. Always pushes a rename frame; the caller pops it
    /// when the owner's scope ends.
    pub(super) fn process_type_parameters(&mut self, node: &Node, owner: &str) -> (String, String) {
        self.type_param_renames.push(FxHashMap::default());
        let Some(params) = node.child(K::TypeParameters) else {
            return (String::new(), String::new());
        };
        let mut synthesized = Vec::new();
        let mut preface = String::new();
        for parameter_types in params.children_of(K::ParameterTypes) {
            for parameter in parameter_types.children_of(K::ParameterType) {
                if parameter.children.len() > 1 {
                    self.diagnostics.push(Diagnostic::warning(
                        parameter.span,
                        "restricted generics not yet implemented",
                        codes::NOT_YET_IMPLEMENTED,
                    ));
                }
            }
            let Some(identifier) = parameter_types
                .select(K::Identifier)
                .first()
                .map(|id| id.text.clone())
            else {
                continue;
            };
            let raw = escape_keyword(&identifier);
            let synth = format!("{owner}_{raw}");
            preface.push_str(&format!("{synth} = TypeVar('{synth}')\n"));
            // stays visible after the owner, in the enclosing frame
            self.add_known_type(synth.clone());
            if let Some(frame) = self.type_param_renames.last_mut() {
                frame.insert(raw, synth.clone());
            }
            synthesized.push(synth);
        }
        (synthesized.join(", "), preface)
    }

    pub(super) fn pop_type_param_frame(&mut self) {
        self.type_param_renames.pop();
    }

    // =========================================================================
    // Forward references
    // =========================================================================

    /// Type names referenced under `scope` that are not known yet; those
    /// become quoted forward references.
    pub(super) fn unknown_type_names(&self, scope: &Node) -> Vec<String> {
        let mut unknown = Vec::new();
        for type_name in scope.select(K::TypeName) {
            let Some(identifier) = type_name.child(K::Identifier) else {
                continue;
            };
            let name = identifier.text.clone();
            if self.is_known_type(&name) || self.lookup_type_param(&name).is_some() {
                continue;
            }
            if !unknown.contains(&name) {
                unknown.push(name);
            }
        }
        unknown
    }

    /// Quote bare occurrences of each unknown name; if the expression
    /// then starts with a quote, re-wrap the whole expression in one
    /// quoted string so the forward reference stays contiguous.
    pub(super) fn apply_forward_refs(mut expression: String, unknown: &[String]) -> String {
        for name in unknown {
            expression =
                replace_word_outside_quotes(&expression, name, &format!("'{name}'"));
        }
        if expression.starts_with('\'') {
            expression = format!("'{}'", expression.replace('\'', ""));
        }
        expression
    }

    /// Lower a type expression rooted at `scope`, rewriting unknown type
    /// names into quoted forward references.
    pub(super) fn compile_type_expression(&mut self, scope: &Node, type_node: &Node) -> String {
        let unknown = self.unknown_type_names(scope);
        let expression = self.emit_type_node(type_node);
        Self::apply_forward_refs(expression, &unknown)
    }

    // =========================================================================
    // Finalization
    // =========================================================================

    /// Prepend imports (documents only) and normalize whitespace.
    fn finalize(&mut self, root: &Node, code: String) -> String {
        let mut blocks = Vec::new();
        if root.kind == K::Document {
            blocks.push(self.imports_block(&code));
        }
        blocks.push(code);
        let cooked = blocks.join("\n\n");
        collapse_blank_lines(&strip_trailing_spaces(&cooked))
    }

    fn imports_block(&self, code: &str) -> String {
        let mut typing = vec!["TypedDict"];
        for name in TYPING_TYPES {
            if contains_word(code, name) {
                typing.push(*name);
            }
        }
        let mut lines = vec![format!("from typing import {}", typing.join(", "))];

        let mut enum_names = Vec::new();
        if contains_word(code, "Enum") {
            enum_names.push("Enum");
        }
        if contains_word(code, "IntEnum") {
            enum_names.push("IntEnum");
        }
        if !enum_names.is_empty() {
            lines.push(format!("from enum import {}", enum_names.join(", ")));
        }
        if code.contains("enum.auto()") {
            lines.push("import enum".to_string());
        }

        let mut functools = Vec::new();
        if contains_word(code, "singledispatch") {
            functools.push("singledispatch");
        }
        if contains_word(code, "singledispatchmethod") {
            functools.push("singledispatchmethod");
        }
        if !functools.is_empty() {
            lines.push(format!("from functools import {}", functools.join(", ")));
        }

        if let Some(module) = &self.base_class_import {
            lines.push(format!("from {module} import {}", self.base_class_name));
        }
        lines.join("\n")
    }
}
