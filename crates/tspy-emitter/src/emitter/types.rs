//! Lowering of type expressions: unions, generics, tuples, mapped and
//! function types, and the anonymous-class hoisting that keeps Python
//! syntax valid.

use tspy_common::codes;
use tspy_parser::node::{Node, SyntaxKind as K};

use super::Emitter;
use super::helpers::{capitalize_first, escape_keyword, extract_class_name, strip_name_index,
    substitute_type_name};

impl Emitter {
    /// Dispatch for any node that can appear in type position.
    pub(super) fn emit_type_node(&mut self, node: &Node) -> String {
        match node.kind {
            K::Types | K::ParameterTypes => {
                let alternatives: Vec<&Node> = node.children.iter().collect();
                self.emit_union(node, &alternatives)
            }
            K::Type | K::ArrayType => self.emit_type(node),
            K::ParameterType => self.emit_parameter_type(node),
            K::Intersection => self.emit_intersection(node),
            K::BasicType => substitute_type_name(&node.text).to_string(),
            K::TypeName => self.emit_type_name(node),
            K::GenericType => self.emit_generic_type(node),
            K::ArrayOf => self.emit_array_of(node),
            K::TypeTuple => self.emit_type_tuple(node),
            K::MappedType => self.emit_mapped_type(node),
            K::MapSignature => self.emit_map_signature(node),
            K::FuncType => self.emit_func_type(node),
            K::Literal => self.emit_literal(node),
            _ => self.emit_zombie(node),
        }
    }

    /// `types`: lower every alternative, suppress textual duplicates,
    /// hoist anonymous classes, then join as `Literal[…]`, `|`, or
    /// `Union[…]` depending on configuration.
    pub(super) fn emit_types(&mut self, node: &Node) -> String {
        let alternatives: Vec<&Node> = node.children.iter().collect();
        self.emit_union(node, &alternatives)
    }

    pub(super) fn emit_union(&mut self, scope: &Node, alternatives: &[&Node]) -> String {
        // A union of nothing but literals collapses to one flat Literal[…].
        if self.options.use_literal_type
            && !alternatives.is_empty()
            && alternatives.iter().all(|a| Self::is_literal_alternative(a))
        {
            let mut values: Vec<String> = Vec::new();
            for alternative in alternatives {
                if let Some(literal) = alternative.children.first() {
                    let value = self.emit_literal(literal);
                    if !values.contains(&value) {
                        values.push(value);
                    }
                }
            }
            return format!("Literal[{}]", values.join(", "));
        }

        let mut union: Vec<String> = Vec::new();
        let mut index = 0usize;
        for alternative in alternatives {
            // synthesize a name for any anonymous type in this slot
            let stub = strip_name_index(&self.current_obj_name());
            let fname = capitalize_first(&self.func_name);
            if let Some(last) = self.obj_name.last_mut() {
                *last = format!("{fname}{stub}_{index}");
            }
            let lowered = self.compile_type_expression(scope, alternative);
            if !union.contains(&lowered) {
                union.push(lowered);
                index += 1;
            }
            if let Some(last) = self.obj_name.last_mut() {
                *last = stub;
            }
        }
        for entry in union.iter_mut() {
            if entry.starts_with("class") {
                let class_name = extract_class_name(entry);
                let definition = std::mem::replace(entry, class_name);
                self.push_local_class(definition);
            }
        }
        if self.options.use_type_union || union.len() <= 1 {
            return union.join("|");
        }
        format!("Union[{}]", union.join(", "))
    }

    fn is_literal_alternative(node: &Node) -> bool {
        node.kind == K::Type
            && node
                .children
                .first()
                .is_some_and(|child| child.kind == K::Literal)
    }

    /// A single `type` alternative.
    pub(super) fn emit_type(&mut self, node: &Node) -> String {
        match node.children.first() {
            Some(child) => self.emit_type_single(child),
            None => self.emit_zombie(node),
        }
    }

    /// Lower the payload of a `type`/`parameter_type` node. Anonymous
    /// object bodies become a synthesized class definition (hoisted by
    /// the enclosing union); bare literals erase to their carrier type
    /// unless `UseLiteralType` keeps them as `Literal[…]`.
    fn emit_type_single(&mut self, child: &Node) -> String {
        match child.kind {
            K::DeclarationsBlock => {
                self.local_classes.push(Vec::new());
                self.optional_keys.push(Vec::new());
                let decls = self.emit_declarations_block(child);
                let optional_keys = self.optional_keys.pop().unwrap_or_default();
                let name = self.current_obj_name();
                let header = self.render_class_header(&name, "", "", &optional_keys);
                let local_classes = self.render_local_classes();
                format!(
                    "{header}    {}{}",
                    local_classes.replace('\n', "\n    "),
                    decls.replace('\n', "\n    ")
                )
            }
            K::Literal => {
                if self.options.use_literal_type {
                    let value = self.emit_literal(child);
                    return format!("Literal[{value}]");
                }
                match child.children.first().map(|value| value.kind) {
                    Some(K::Array) => "List".to_string(),
                    Some(K::Object) => "Dict".to_string(),
                    Some(K::Integer | K::Number) => {
                        let value = self.emit_literal(child);
                        if value.parse::<i64>().is_ok() {
                            "int".to_string()
                        } else {
                            "str".to_string()
                        }
                    }
                    Some(K::Boolean) => "bool".to_string(),
                    _ => "str".to_string(),
                }
            }
            _ => self.emit_type_node(child),
        }
    }

    /// `parameter_type`: restricted generics (`extends`/`=`) are not
    /// lowered; warn and keep the first alternative only.
    pub(super) fn emit_parameter_type(&mut self, node: &Node) -> String {
        if node.children.len() > 1 {
            self.warn(
                node,
                "restricted generics not yet implemented",
                codes::NOT_YET_IMPLEMENTED,
            );
        }
        match node.children.first() {
            Some(child) => self.emit_type_single(child),
            None => self.emit_zombie(node),
        }
    }

    /// Intersections fall back to `Any`.
    pub(super) fn emit_intersection(&mut self, node: &Node) -> String {
        self.warn(
            node,
            "Type intersections are not yet implemented",
            codes::NOT_YET_IMPLEMENTED,
        );
        "Any".to_string()
    }

    pub(super) fn emit_type_name(&mut self, node: &Node) -> String {
        let raw = node
            .child(K::Identifier)
            .map(|id| id.text.clone())
            .unwrap_or_default();
        let name = escape_keyword(&raw);
        if let Some(renamed) = self.lookup_type_param(&name) {
            return renamed;
        }
        substitute_type_name(&name).to_string()
    }

    pub(super) fn emit_generic_type(&mut self, node: &Node) -> String {
        let base = match node.child(K::TypeName) {
            Some(name) => self.emit_type_name(name),
            None => return self.emit_zombie(node),
        };
        let parameters = match node.child(K::TypeParameters) {
            Some(parameters) => self.emit_type_parameters(parameters),
            None => String::new(),
        };
        if parameters == "None" {
            return base;
        }
        format!("{base}[{parameters}]")
    }

    /// Type arguments at a use site: `Map<string, number>`.
    pub(super) fn emit_type_parameters(&mut self, node: &Node) -> String {
        let parameters: Vec<String> = node
            .children
            .iter()
            .map(|parameter| self.emit_type_node(parameter))
            .collect();
        parameters.join(", ")
    }

    pub(super) fn emit_type_tuple(&mut self, node: &Node) -> String {
        let elements: Vec<String> = node
            .children
            .iter()
            .map(|types| self.emit_type_node(types))
            .collect();
        format!("Tuple[{}]", elements.join(", "))
    }

    pub(super) fn emit_mapped_type(&mut self, node: &Node) -> String {
        match node.child(K::MapSignature) {
            Some(signature) => self.emit_map_signature(signature),
            None => self.emit_zombie(node),
        }
    }

    /// `{ [key: K]: V }` becomes `Dict[K, V]`.
    pub(super) fn emit_map_signature(&mut self, node: &Node) -> String {
        let key = match node.child(K::IndexSignature) {
            Some(signature) => self.emit_index_signature(signature),
            None => return self.emit_zombie(node),
        };
        let value = match node.child(K::Types) {
            Some(types) => self.emit_types(types),
            None => return self.emit_zombie(node),
        };
        format!("Dict[{key}, {value}]")
    }

    pub(super) fn emit_index_signature(&mut self, node: &Node) -> String {
        match node.child(K::Type) {
            Some(key_type) => self.emit_type(key_type),
            None => self.emit_zombie(node),
        }
    }

    /// `(args) => T` becomes `Callable[[args], T]`; rest arguments or
    /// defaults collapse the argument list to `...`.
    pub(super) fn emit_func_type(&mut self, node: &Node) -> String {
        let args = match node.child(K::ArgList) {
            Some(arg_list) => {
                let compiled = self.emit_arg_list(arg_list, true);
                if compiled.contains("= None") || compiled.contains('*') {
                    "...".to_string()
                } else {
                    format!("[{compiled}]")
                }
            }
            None => "[]".to_string(),
        };
        let return_type = match node.child(K::Types) {
            Some(types) => self.emit_types(types),
            None => "Any".to_string(),
        };
        format!("Callable[{args}, {return_type}]")
    }

    /// `T[]` becomes `List[T]`, routed through the union machinery so
    /// anonymous element types are named and hoisted like any other.
    pub(super) fn emit_array_of(&mut self, node: &Node) -> String {
        let unknown = self.unknown_type_names(node);
        let alternatives: Vec<&Node> = node.children.iter().collect();
        if alternatives.is_empty() {
            return self.emit_zombie(node);
        }
        let expression = self.emit_union(node, &alternatives);
        let element = Self::apply_forward_refs(expression, &unknown);
        format!("List[{element}]")
    }
}
