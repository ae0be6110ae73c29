//! Concrete-tree to AST canonicalization.
//!
//! A near-identity traversal: anonymous token leaves become `TEXT`
//! (already their static kind here, so the rename is a structural
//! absorption), marker constructs (`optional`, `readonly`, `static`)
//! collapse their `TEXT` child into the parent's token text, and the
//! trivial `array_types`/`array_type` wrapper chain under `array_of` is
//! flattened into a plain `type` node. Stateless per invocation.

use crate::node::{Node, SyntaxKind as K};

/// Rewrite the concrete syntax tree into the canonical AST, in place.
pub fn transform(node: &mut Node) {
    for child in &mut node.children {
        transform(child);
    }
    match node.kind {
        K::Optional | K::Readonly | K::Static => absorb_text(node),
        K::ArrayOf => flatten_array_wrappers(node),
        _ => {}
    }
}

/// `optional`/`readonly`/`static` hold a single `TEXT` leaf; fold its
/// text into the marker node itself.
fn absorb_text(node: &mut Node) {
    if node.children.len() == 1 && node.children[0].kind == K::Text {
        if let Some(text_child) = node.children.pop() {
            node.text = text_child.text;
        }
    }
}

/// `array_of > array_types > array_type > X` becomes `array_of > type > X`.
fn flatten_array_wrappers(node: &mut Node) {
    let Some(mut wrapper) = node.children.pop() else {
        return;
    };
    if node.children.is_empty() && wrapper.kind == K::ArrayTypes && wrapper.children.len() == 1 {
        if let Some(mut array_type) = wrapper.children.pop() {
            if array_type.kind == K::ArrayType && array_type.children.len() == 1 {
                if let Some(element) = array_type.children.pop() {
                    let span = element.span;
                    node.children.push(Node::new(K::Type, span, vec![element]));
                    return;
                }
            }
            wrapper.children.push(array_type);
        }
    }
    node.children.push(wrapper);
}
