//! Emission-policy options and their effect on the generated code.

use tspy_common::TranspileOptions;
use tspy_emitter::transpile;

fn output(source: &str, options: &TranspileOptions) -> String {
    transpile(source, options).output.expect("no fatal errors")
}

#[test]
fn union_without_pep604_uses_union_brackets() {
    let options = TranspileOptions {
        use_type_union: false,
        ..Default::default()
    };
    let python = output("type U = number | string;", &options);
    assert!(python.contains("U = Union[float, str]"));
    assert!(python.contains("from typing import TypedDict, Union"));
}

#[test]
fn union_with_pep604_uses_pipes() {
    let options = TranspileOptions {
        use_type_union: true,
        ..Default::default()
    };
    let python = output("type U = number | string;", &options);
    assert!(python.contains("U = float|str"));
}

#[test]
fn optional_union_field_splices_none_into_union() {
    let options = TranspileOptions {
        use_type_union: false,
        use_not_required: false,
        ..Default::default()
    };
    let python = output("interface P { x?: number | string }", &options);
    assert!(python.contains("x: Union[float, str, None]"));
}

#[test]
fn optional_piped_union_field_appends_none() {
    let options = TranspileOptions {
        use_type_union: true,
        use_not_required: false,
        ..Default::default()
    };
    let python = output("interface P { x?: number | string }", &options);
    assert!(python.contains("x: float|str|None"));
}

#[test]
fn literals_erase_to_carrier_types_without_literal_support() {
    let options = TranspileOptions {
        use_literal_type: false,
        use_type_union: true,
        ..Default::default()
    };
    let python = output("type A = 1; type B = \"x\"; type C = 2.5;", &options);
    assert!(python.contains("A = int"));
    assert!(python.contains("B = str"));
    assert!(python.contains("C = str"));
}

#[test]
fn enum_items_without_use_enum_become_strings() {
    let options = TranspileOptions {
        use_enum: false,
        ..Default::default()
    };
    let python = output("enum Dir { Up, Down }", &options);
    assert!(python.contains("class Dir:\n    Up = 'Up'\n    Down = 'Down'"));
    assert!(!python.contains("from enum import"));
}

#[test]
fn enum_items_without_values_use_auto() {
    let python = output("enum Dir { Up, Down }", &TranspileOptions::default());
    assert!(python.contains("Up = enum.auto()"));
    assert!(python.contains("import enum"));
}

#[test]
fn constant_namespace_without_use_enum_stays_a_namespace() {
    let options = TranspileOptions {
        use_enum: false,
        ..Default::default()
    };
    let python = output("namespace Color { const red = 1; }", &options);
    assert!(python.contains("class Color:"));
    assert!(python.contains("red: Any = 1"));
}

#[test]
fn class_decorator_is_normalized_and_applied() {
    let options = TranspileOptions {
        class_decorator: "my_decorator".to_string(),
        use_not_required: true,
        ..Default::default()
    };
    let python = output("interface Point { x: number }", &options);
    assert!(python.contains("@my_decorator\nclass Point(TypedDict):"));
}

#[test]
fn decorator_with_at_sign_is_kept_verbatim() {
    let options = TranspileOptions {
        class_decorator: "@frozen".to_string(),
        ..Default::default()
    };
    let python = output("interface Point { x: number }", &options);
    assert!(python.contains("@frozen\nclass Point(TypedDict, total=True):"));
}

#[test]
fn dotted_base_class_adds_an_import() {
    let options = TranspileOptions {
        base_class_name: "mypkg.Base".to_string(),
        ..Default::default()
    };
    let python = output("interface Point { x: number }", &options);
    assert!(python.contains("from mypkg import Base"));
    assert!(python.contains("class Point(Base):"));
}

#[test]
fn plain_custom_base_class() {
    let options = TranspileOptions {
        base_class_name: "pydantic.BaseModel".to_string(),
        ..Default::default()
    };
    let python = output("interface User { name: string }", &options);
    assert!(python.contains("from pydantic import BaseModel"));
    assert!(python.contains("class User(BaseModel):\n    name: str"));
}

#[test]
fn literal_union_without_literal_support_erases_each_alternative() {
    let options = TranspileOptions {
        use_literal_type: false,
        use_type_union: true,
        ..Default::default()
    };
    let python = output("type Flag = \"on\" | \"off\";", &options);
    // both alternatives erase to str and deduplicate
    assert!(python.contains("Flag = str"));
}
