//! Lowering of declaration-level constructs: interfaces, type aliases,
//! namespaces, enums, constants, functions and fields.

use tspy_parser::node::{Node, SyntaxKind as K};

use super::helpers::{capitalize_first, escape_keyword, strip_argument_name, to_typename};
use super::{Emitter, ScopeKind};

impl Emitter {
    fn identifier_text(&self, node: &Node) -> String {
        node.child(K::Identifier)
            .map(|id| escape_keyword(&id.text))
            .unwrap_or_default()
    }

    // =========================================================================
    // Interfaces
    // =========================================================================

    /// `interface Name<T> extends Base { ... }` becomes a class
    /// declaration. The class derives from `TypedDict` unless a base is
    /// not itself a known TypedDict or the body declares methods.
    pub(super) fn emit_interface(&mut self, node: &Node) -> String {
        let name = self.identifier_text(node);
        self.obj_name.push(name.clone());
        self.scope_type.push(ScopeKind::Interface);
        self.local_classes.push(Vec::new());
        self.optional_keys.push(Vec::new());
        self.constructor_prefaces.push(Vec::new());

        let (type_parameters, mut preface) = self.process_type_parameters(node, &name);
        preface.push('\n');
        self.known_types.push(Default::default());

        let (base_class_list, base_classes) = match node.child(K::Extends) {
            Some(extends) => {
                let list = self.bases(extends);
                let mut joined = list.join(", ");
                if !type_parameters.is_empty() {
                    joined.push_str(&format!(", Generic[{type_parameters}]"));
                }
                (list, joined)
            }
            None => {
                let joined = if type_parameters.is_empty() {
                    String::new()
                } else {
                    format!("Generic[{type_parameters}]")
                };
                (Vec::new(), joined)
            }
        };

        let block = node.child(K::DeclarationsBlock);
        let force_base_class = if base_class_list
            .iter()
            .any(|base| !self.typed_dicts.contains(base))
            || block.is_some_and(|b| b.has(K::Function))
        {
            " " // blank override: plain class
        } else {
            self.typed_dicts.insert(name.clone());
            ""
        };

        let decls = match block {
            Some(block) => self.emit_declarations_block(block),
            None => "pass".to_string(),
        };

        // constructor functions collected while the block was compiled
        for constructor in self.constructor_prefaces.pop().unwrap_or_default() {
            preface.push_str(&constructor);
        }

        let optional_keys = self.optional_keys.pop().unwrap_or_default();
        let mut class_text =
            self.render_class_header(&name, &base_classes, force_base_class, &optional_keys);
        self.base_classes.insert(name.clone(), base_class_list);
        let local_classes = self.render_local_classes();
        let indented_locals = format!("    {}", local_classes.replace('\n', "\n    "));
        class_text.push_str(indented_locals.trim_end_matches(' '));

        self.known_types.pop();
        self.pop_type_param_frame();
        self.add_known_type(name);
        self.scope_type.pop();
        self.obj_name.pop();
        format!("{preface}{class_text}    {}", decls.replace('\n', "\n    "))
    }

    /// Interface bases with basic-type substitution applied.
    pub(super) fn bases(&mut self, node: &Node) -> Vec<String> {
        node.children
            .iter()
            .map(|base| {
                let compiled = match base.kind {
                    K::TypeName => self.emit_type_name(base),
                    K::GenericType => self.emit_generic_type(base),
                    _ => base.content(),
                };
                super::helpers::substitute_type_name(&compiled).to_string()
            })
            .collect()
    }

    // =========================================================================
    // Type aliases
    // =========================================================================

    /// `type Foo = T;` becomes `Foo = <lowered T>`. An alias whose name
    /// is also a namespace is suppressed (the namespace wins).
    pub(super) fn emit_type_alias(&mut self, node: &Node) -> String {
        let alias = self.identifier_text(node);
        let all_basic = node.select(K::Type).iter().all(|t| {
            t.children
                .first()
                .is_some_and(|child| matches!(child.kind, K::BasicType | K::Literal))
        });
        if all_basic {
            self.basic_type_aliases.insert(alias.clone());
        }
        self.obj_name.push(alias.clone());
        let code = if self.overloaded_type_names.contains(&alias) {
            String::new()
        } else {
            self.add_known_type(alias.clone());
            self.local_classes.push(Vec::new());
            self.optional_keys.push(Vec::new());
            let types = match node.child(K::Types) {
                Some(types) => self.emit_types(types),
                None => self.emit_zombie(node),
            };
            let preface = self.render_local_classes();
            self.optional_keys.pop();
            format!("{preface}{alias} = {types}")
        };
        self.obj_name.pop();
        code
    }

    // =========================================================================
    // Declarations blocks and fields
    // =========================================================================

    pub(super) fn emit_declarations_block(&mut self, node: &Node) -> String {
        let decorators = self.overload_decorators(&node.children);
        let mut declarations = Vec::new();
        for (i, child) in node.children.iter().enumerate() {
            match child.kind {
                K::Declaration => declarations.push(self.emit_declaration(child)),
                K::Function => {
                    let decorator = decorators.get(&i).map(String::as_str).unwrap_or("");
                    declarations.push(self.emit_function(child, decorator));
                }
                _ => {}
            }
        }
        let joined = declarations.join("\n");
        if joined.is_empty() {
            "pass".to_string()
        } else {
            joined
        }
    }

    /// A field: `name?: T` with optionality lowered per configuration.
    pub(super) fn emit_declaration(&mut self, node: &Node) -> String {
        let identifier = self.identifier_text(node);
        self.obj_name.push(to_typename(&identifier));
        let mut python_type = match node.child(K::Types) {
            Some(types) => self.compile_type_expression(node, types),
            None => "Any".to_string(),
        };
        let typename = self.obj_name.pop().unwrap_or_default();
        if python_type.starts_with("class") {
            self.push_local_class(python_type);
            python_type = typename;
        }
        if node.has(K::Optional) {
            self.push_optional_key(identifier.clone());
            if self.options.use_not_required {
                python_type = format!("NotRequired[{python_type}]");
            } else if python_type.starts_with("Union[") {
                if !python_type.contains("None") {
                    python_type.truncate(python_type.len() - 1);
                    python_type.push_str(", None]");
                }
            } else if python_type.contains('|') {
                if !python_type.contains("None") {
                    python_type.push_str("|None");
                }
            } else {
                python_type = format!("Optional[{python_type}]");
            }
        }
        if self.is_toplevel() && self.has_pending_local_classes() {
            let preface = self.flush_local_classes();
            return format!("{preface}{identifier}: {python_type}");
        }
        format!("{identifier}: {python_type}")
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// `name(args): T` becomes a stubbed `def`. Inside an interface the
    /// first argument is `self`; a `constructor` is synthesized as
    /// `NameConstructor` and hoisted before the class.
    pub(super) fn emit_function(&mut self, node: &Node, decorator: &str) -> String {
        let mut is_constructor = false;
        let mut name = match node.child(K::Identifier) {
            Some(identifier) => {
                let name = escape_keyword(&identifier.text);
                self.func_name = name.clone();
                if name == "constructor" && self.in_interface() {
                    is_constructor = true;
                    format!("{}Constructor", self.current_obj_name())
                } else {
                    name
                }
            }
            None => "__call__".to_string(),
        };
        let owner = capitalize_first(&name);
        let (_parameters, preface) = self.process_type_parameters(node, &owner);

        let arguments = match node.child(K::ArgList) {
            Some(args) => {
                let compiled = self.emit_arg_list(args, false);
                if self.in_interface() {
                    format!("self, {compiled}")
                } else {
                    compiled
                }
            }
            None => {
                if self.in_interface() {
                    "self".to_string()
                } else {
                    String::new()
                }
            }
        };

        let return_type = match node.child(K::Types) {
            Some(types) => self.compile_type_expression(node, types),
            None => "Any".to_string(),
        };

        let mut decorator = decorator.to_string();
        if !decorator.is_empty() {
            if decorator.ends_with(".register") {
                name = "_".to_string();
            }
            decorator.push('\n');
        }
        let mut pyfunc =
            format!("{preface}\n{decorator}def {name}({arguments}) -> {return_type}:\n    pass");
        self.pop_type_param_frame();

        if is_constructor {
            if let Some(frame) = self.constructor_prefaces.last_mut() {
                frame.push(format!("{pyfunc}\n"));
            }
            return String::new();
        }
        if self.is_toplevel() && self.has_pending_local_classes() {
            let hoisted = self.flush_local_classes();
            pyfunc = format!("{hoisted}{pyfunc}");
        }
        pyfunc
    }

    /// Argument lists. Inside a `func_type` the rendering collapses to
    /// the `Callable` form: names are stripped and any rest/default
    /// marker degrades the whole list to `...`.
    pub(super) fn emit_arg_list(&mut self, node: &Node, for_func_type: bool) -> String {
        let compiled: Vec<String> = node
            .children
            .iter()
            .map(|child| match child.kind {
                K::Argument => self.emit_argument(child),
                K::ArgTail => self.emit_arg_tail(child),
                _ => String::new(),
            })
            .collect();
        if for_func_type {
            if compiled.iter().any(|arg| arg.starts_with('*')) {
                return "...".to_string();
            }
            return compiled
                .iter()
                .map(|arg| strip_argument_name(arg))
                .collect::<Vec<_>>()
                .join(", ");
        }
        compiled.join(", ")
    }

    fn emit_argument(&mut self, node: &Node) -> String {
        let argname = self.identifier_text(node);
        if let Some(types) = node.child(K::Types) {
            self.obj_name.push(to_typename(&argname));
            let lowered = self.compile_type_expression(node, types);
            self.obj_name.pop();
            if node.has(K::Optional) {
                return format!("{argname}: Optional[{lowered}] = None");
            }
            return format!("{argname}: {lowered}");
        }
        if node.has(K::Optional) {
            format!("{argname} = None")
        } else {
            argname
        }
    }

    /// `...rest: T[]` becomes `*rest: T`.
    fn emit_arg_tail(&mut self, node: &Node) -> String {
        let argname = self.identifier_text(node);
        if let Some(array) = node.child(K::ArrayOf) {
            let lowered = self.emit_array_of(array);
            let element = lowered
                .strip_prefix("List[")
                .and_then(|rest| rest.strip_suffix(']'))
                .unwrap_or(&lowered);
            return format!("*{argname}: {element}");
        }
        format!("*{argname}")
    }

    // =========================================================================
    // Namespaces
    // =========================================================================

    /// A general namespace becomes `class Name:` with indented members.
    pub(super) fn emit_namespace(&mut self, node: &Node) -> String {
        let name = self.identifier_text(node);
        let code = self.emit_namespace_body(&name, &node.children[1..]);
        self.add_known_type(name);
        code
    }

    fn emit_namespace_body(&mut self, name: &str, members: &[Node]) -> String {
        self.known_types.push(Default::default());
        let decorators = self.overload_decorators(members);
        let mut lines = vec![format!("class {name}:")];
        for (i, member) in members.iter().enumerate() {
            let decorator = decorators.get(&i).map(String::as_str).unwrap_or("");
            let compiled = self.emit_top(member, decorator);
            let compiled = if i == 0 {
                compiled.trim_start_matches('\n').to_string()
            } else {
                compiled
            };
            for line in compiled.split('\n') {
                lines.push(line.to_string());
            }
        }
        if members.is_empty() {
            lines.push("pass".to_string());
        }
        self.known_types.pop();
        lines.join("\n    ")
    }

    /// A namespace of pure constants. With `UseEnum` it lowers to an
    /// `Enum`/`IntEnum` class with the constant type annotations
    /// stripped; otherwise it lowers like a plain namespace.
    pub(super) fn emit_virtual_enum(&mut self, node: &Node) -> String {
        let name = self.identifier_text(node);
        if self.is_known_type(&name) {
            return String::new();
        }
        self.add_known_type(name.clone());
        let members = &node.children[1..];
        if self.options.use_enum && !members.is_empty() {
            let all_integer = members
                .iter()
                .filter_map(|member| member.child(K::Literal))
                .all(|literal| {
                    literal
                        .children
                        .first()
                        .is_some_and(|value| value.kind == K::Integer)
                });
            let base = if all_integer { "IntEnum" } else { "Enum" };
            let saved = self.strip_type_from_const;
            self.strip_type_from_const = true;
            let mut lines = vec![format!("class {name}({base}):")];
            for member in members {
                lines.push(self.emit_const(member));
            }
            self.strip_type_from_const = saved;
            return lines.join("\n    ");
        }
        self.emit_namespace_body(&name, members)
    }

    // =========================================================================
    // Enums, constants, assignments
    // =========================================================================

    /// `enum` lowers to `IntEnum` when every explicit value is an
    /// integer literal, `Enum` otherwise; without `UseEnum` the items
    /// become plain string constants.
    pub(super) fn emit_enum(&mut self, node: &Node) -> String {
        let base_class = if self.options.use_enum {
            let all_integer = node
                .children_of(K::Item)
                .filter_map(|item| item.child(K::Literal))
                .all(|literal| {
                    literal
                        .children
                        .first()
                        .is_some_and(|value| value.kind == K::Integer)
                });
            if all_integer { "(IntEnum)" } else { "(Enum)" }
        } else {
            ""
        };
        let name = self.identifier_text(node);
        self.add_known_type(name.clone());
        let mut lines = vec![format!("class {name}{base_class}:")];
        for item in node.children_of(K::Item) {
            lines.push(self.emit_item(item));
        }
        lines.join("\n    ")
    }

    fn emit_item(&mut self, node: &Node) -> String {
        let identifier = self.identifier_text(node);
        match node.child(K::Literal) {
            Some(literal) => {
                let value = self.emit_literal(literal);
                format!("{identifier} = {value}")
            }
            None => {
                if self.options.use_enum {
                    format!("{identifier} = enum.auto()")
                } else {
                    format!("{identifier} = '{identifier}'")
                }
            }
        }
    }

    /// `const name: T = value;` — inside a virtual enum the type
    /// annotation is stripped.
    pub(super) fn emit_const(&mut self, node: &Node) -> String {
        let Some(declaration) = node.child(K::Declaration) else {
            return self.emit_zombie(node);
        };
        let value = node
            .children
            .iter()
            .find(|child| matches!(child.kind, K::Literal | K::Identifier));
        match value {
            Some(value) => {
                let value_text = match value.kind {
                    K::Literal => self.emit_literal(value),
                    _ => escape_keyword(&value.text),
                };
                if self.strip_type_from_const {
                    let identifier = self.identifier_text(declaration);
                    format!("{identifier} = {value_text}")
                } else {
                    let lowered = self.emit_declaration(declaration);
                    format!("{lowered} = {value_text}")
                }
            }
            // no value: just the annotated name
            None => self.emit_declaration(declaration),
        }
    }

    pub(super) fn emit_assignment(&mut self, node: &Node) -> String {
        let variable = node
            .children
            .first()
            .map(|v| v.text.clone())
            .unwrap_or_default();
        let value = node
            .children
            .get(1)
            .map(|child| match child.kind {
                K::Literal => self.emit_literal(child),
                _ => child.text.clone(),
            })
            .unwrap_or_default();
        format!("{variable} = {value}")
    }
}
