//! The immutable per-run configuration record.
//!
//! Field names follow the `ts2py.<Option>` configuration keys, so the
//! `[ts2py]` table of a config file deserializes straight into this
//! struct. The CLI layers `--pep`/`--compatibility` flags on top before
//! the record is handed to the emitter, after which it is read-only.

use serde::Deserialize;

/// Emission policy options recognized by the compiler.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TranspileOptions {
    /// Qualified name of the base class for generated classes. A dotted
    /// name contributes an additional `from <module> import <name>`.
    #[serde(rename = "BaseClassName")]
    pub base_class_name: String,
    /// Decorator emitted above every generated class (`@` prefixed if
    /// missing). Empty means no decorator.
    #[serde(rename = "ClassDecorator")]
    pub class_decorator: String,
    /// Lower `enum` declarations and constant-only namespaces to real
    /// `Enum`/`IntEnum` classes (PEP 435).
    #[serde(rename = "UseEnum")]
    pub use_enum: bool,
    /// Collapse literal-only unions to `Literal[…]` (PEP 586 via the
    /// original's PEP 584 flag).
    #[serde(rename = "UseLiteralType")]
    pub use_literal_type: bool,
    /// Join union alternatives with `|` instead of `Union[…]` (PEP 604).
    #[serde(rename = "UseTypeUnion")]
    pub use_type_union: bool,
    /// Mark optional keys with `NotRequired[…]` instead of falling back
    /// to `Optional` plus `total=False` (PEP 655).
    #[serde(rename = "UseNotRequired")]
    pub use_not_required: bool,
}

impl Default for TranspileOptions {
    fn default() -> Self {
        TranspileOptions {
            base_class_name: "TypedDict".to_string(),
            class_decorator: String::new(),
            use_enum: true,
            use_literal_type: true,
            use_type_union: false,
            use_not_required: false,
        }
    }
}

impl TranspileOptions {
    /// Split a dotted `BaseClassName` into the bare class name and the
    /// module it must be imported from.
    #[must_use]
    pub fn split_base_class(&self) -> (String, Option<String>) {
        let name = self.base_class_name.trim();
        match name.rfind('.') {
            Some(i) => (name[i + 1..].to_string(), Some(name[..i].to_string())),
            None => (name.to_string(), None),
        }
    }

    /// The class decorator normalized to start with `@`, with a trailing
    /// newline, or an empty string when no decorator is configured.
    #[must_use]
    pub fn normalized_decorator(&self) -> String {
        let decorator = self.class_decorator.trim();
        if decorator.is_empty() {
            return String::new();
        }
        if decorator.starts_with('@') {
            format!("{decorator}\n")
        } else {
            format!("@{decorator}\n")
        }
    }
}
