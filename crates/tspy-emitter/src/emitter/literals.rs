//! Lowering of literal values.

use tspy_parser::node::{Node, SyntaxKind as K};

use super::Emitter;

impl Emitter {
    /// A `literal` wrapper holds exactly one concrete value.
    pub(super) fn emit_literal(&mut self, node: &Node) -> String {
        match node.children.first() {
            Some(value) => self.emit_literal_value(value),
            None => self.emit_zombie(node),
        }
    }

    fn emit_literal_value(&mut self, node: &Node) -> String {
        match node.kind {
            K::Integer | K::Number | K::String => node.text.clone(),
            K::Boolean => match node.text.as_str() {
                "true" => "True".to_string(),
                _ => "False".to_string(),
            },
            K::Array => {
                let elements: Vec<String> = node
                    .children
                    .iter()
                    .map(|element| self.emit_literal(element))
                    .collect();
                format!("[{}]", elements.join(", "))
            }
            K::Object => {
                let associations: Vec<String> = node
                    .children
                    .iter()
                    .map(|association| self.emit_association(association))
                    .collect();
                format!("{{\n    {}\n}}", associations.join(",\n    "))
            }
            _ => self.emit_zombie(node),
        }
    }

    fn emit_association(&mut self, node: &Node) -> String {
        let name = node
            .child(K::Name)
            .map(|name| name.text.clone())
            .unwrap_or_default();
        let value = match node.child(K::Literal) {
            Some(literal) => self.emit_literal(literal),
            None => return self.emit_zombie(node),
        };
        format!("\"{name}\": {value}")
    }
}
