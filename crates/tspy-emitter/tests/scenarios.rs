//! End-to-end lowering scenarios, driven through the full pipeline.

use tspy_common::TranspileOptions;
use tspy_emitter::transpile;

/// The default CLI configuration: compatibility 3.11, PEP 655 on.
fn defaults() -> TranspileOptions {
    TranspileOptions {
        use_type_union: true,
        use_not_required: true,
        ..Default::default()
    }
}

fn output(source: &str, options: &TranspileOptions) -> String {
    let result = transpile(source, options);
    result.output.expect("no fatal errors expected")
}

#[test]
fn simple_interface() {
    let python = output("interface Point { x: number; y: number; }", &defaults());
    assert_eq!(
        python,
        "from typing import TypedDict\n\n\nclass Point(TypedDict):\n    x: float\n    y: float"
    );
}

#[test]
fn optional_field_with_not_required() {
    let python = output("interface P { x?: number }", &defaults());
    assert_eq!(
        python,
        "from typing import TypedDict, NotRequired\n\n\nclass P(TypedDict):\n    x: NotRequired[float]"
    );
}

#[test]
fn optional_field_without_not_required() {
    let options = TranspileOptions {
        use_type_union: true,
        use_not_required: false,
        ..Default::default()
    };
    let python = output("interface P { x?: number }", &options);
    assert_eq!(
        python,
        "from typing import TypedDict, Optional\n\n\nclass P(TypedDict, total=False):\n    x: Optional[float]"
    );
}

#[test]
fn literal_union_collapses_to_literal_type() {
    let python = output("type Color = \"red\" | \"green\" | \"blue\";", &defaults());
    assert!(python.contains("Color = Literal[\"red\", \"green\", \"blue\"]"));
    assert!(python.starts_with("from typing import TypedDict, Literal"));
}

#[test]
fn integer_enum() {
    let python = output("enum Dir { Up = 1, Down = 2 }", &defaults());
    assert!(python.contains("class Dir(IntEnum):\n    Up = 1\n    Down = 2"));
    assert!(python.contains("from enum import IntEnum"));
}

#[test]
fn string_enum_uses_plain_enum() {
    let python = output("enum Color { Red = \"red\", Green = \"green\" }", &defaults());
    assert!(python.contains("class Color(Enum):\n    Red = \"red\"\n    Green = \"green\""));
    assert!(python.contains("from enum import Enum"));
}

#[test]
fn generic_interface_synthesizes_typevar() {
    let python = output("interface Box<T> { value: T }", &defaults());
    assert!(python.contains("Box_T = TypeVar('Box_T')"));
    assert!(python.contains("class Box(Generic[Box_T], GenericTypedDict):"));
    assert!(python.contains("value: Box_T"));
    assert!(python.contains("from typing import TypedDict, Generic, TypeVar"));
}

#[test]
fn overloaded_methods_use_single_dispatch() {
    let python = output(
        "interface A { f(x: number): string; f(x: string): string; }",
        &defaults(),
    );
    assert!(python.contains("@singledispatchmethod\n    def f(self, x: float) -> str:"));
    assert!(python.contains("@f.register\n    def _(self, x: str) -> str:"));
    assert!(python.contains("from functools import singledispatchmethod"));
    // the enclosing class holds methods, so it is not a TypedDict
    assert!(python.contains("class A:"));
}

#[test]
fn overloaded_functions_at_module_scope() {
    let python = output(
        "function f(x: number): string;\nfunction f(x: string): string;",
        &defaults(),
    );
    assert!(python.contains("@singledispatch\ndef f(x: float) -> str:"));
    assert!(python.contains("@f.register\ndef _(x: str) -> str:"));
    assert!(python.contains("from functools import singledispatch"));
}

#[test]
fn mapped_type_lowers_to_dict() {
    let python = output("type X = { [k: string]: number };", &defaults());
    assert!(python.contains("X = Dict[str, float]"));
    assert!(python.contains("from typing import TypedDict, Dict"));
}

#[test]
fn self_reference_is_quoted() {
    let python = output("interface Node { next: Node }", &defaults());
    assert!(python.contains("next: 'Node'"));
}

#[test]
fn earlier_definition_is_not_quoted() {
    let python = output(
        "interface A { x: number }\ninterface B { a: A }",
        &defaults(),
    );
    assert!(python.contains("a: A"));
    assert!(!python.contains("a: 'A'"));
}

#[test]
fn function_type_lowers_to_callable() {
    let python = output("type Handler = (x: number) => string;", &defaults());
    assert!(python.contains("Handler = Callable[[float], str]"));
}

#[test]
fn optional_callable_arguments_degrade_to_ellipsis() {
    let python = output("type Handler = (x?: number) => void;", &defaults());
    assert!(python.contains("Handler = Callable[..., None]"));
}

#[test]
fn tuple_type() {
    let python = output("type Pair = [string, number];", &defaults());
    assert!(python.contains("Pair = Tuple[str, float]"));
}

#[test]
fn array_type() {
    let python = output("type Names = string[];", &defaults());
    assert!(python.contains("Names = List[str]"));
}

#[test]
fn builtin_generics_are_substituted() {
    let python = output("type P = Array<string>;", &defaults());
    assert!(python.contains("P = List[str]"));
}

#[test]
fn rest_arguments_become_star_args() {
    let python = output(
        "function concat(first: string, ...rest: string[]): string;",
        &defaults(),
    );
    assert!(python.contains("def concat(first: str, *rest: str) -> str:\n    pass"));
}

#[test]
fn interface_method_gets_self() {
    let python = output("interface A { run(): void }", &defaults());
    assert!(python.contains("def run(self) -> None:"));
}

#[test]
fn constructor_is_hoisted_before_the_class() {
    let python = output(
        "interface Widget { constructor(size: number); label: string }",
        &defaults(),
    );
    let constructor_at = python
        .find("def WidgetConstructor(self, size: float) -> Any:")
        .expect("constructor emitted");
    let class_at = python.find("class Widget").expect("class emitted");
    assert!(constructor_at < class_at);
    assert!(python.contains("label: str"));
}

#[test]
fn anonymous_call_signature_becomes_dunder_call() {
    let python = output("interface Invoker { (x: number): string }", &defaults());
    assert!(python.contains("def __call__(self, x: float) -> str:"));
}

#[test]
fn empty_interface_has_pass_body() {
    let python = output("interface Empty {}", &defaults());
    assert!(python.contains("class Empty(TypedDict):\n    pass"));
}

#[test]
fn nested_anonymous_object_is_hoisted() {
    let python = output("interface Outer { inner: { a: string } }", &defaults());
    let nested_at = python
        .find("class Inner_0(TypedDict):\n        a: str")
        .expect("nested class");
    let field_at = python.find("inner: Inner_0").expect("field");
    assert!(nested_at < field_at);
}

#[test]
fn interface_inheritance_keeps_typed_dict() {
    let python = output(
        "interface A { x: number }\ninterface B extends A { y: string }",
        &defaults(),
    );
    assert!(python.contains("class B(A, TypedDict):"));
}

#[test]
fn unknown_base_drops_typed_dict() {
    let python = output("interface E extends Error { message: string }", &defaults());
    assert!(python.contains("class E(Exception):\n    message: str"));
}

#[test]
fn keyword_identifiers_get_trailing_underscore() {
    let python = output("interface X { class: string; from: number; }", &defaults());
    assert!(python.contains("class_: str"));
    assert!(python.contains("from_: float"));
}

#[test]
fn union_duplicates_are_suppressed() {
    let python = output("type U = number | number | string;", &defaults());
    assert!(python.contains("U = float|str"));
}

#[test]
fn namespace_lowering() {
    let python = output(
        "namespace NS { export function greet(name: string): void; const version: string; }",
        &defaults(),
    );
    assert!(python.contains("class NS:"));
    assert!(python.contains("def greet(name: str) -> None:"));
    assert!(python.contains("version: str"));
}

#[test]
fn constant_namespace_becomes_int_enum() {
    let python = output(
        "namespace Color { const red = 1; const green = 2; }",
        &defaults(),
    );
    assert!(python.contains("class Color(IntEnum):\n    red = 1\n    green = 2"));
}

#[test]
fn namespace_wins_over_type_alias_of_same_name() {
    let python = output(
        "type Fruit = string;\nnamespace Fruit { const apple = 1; }",
        &defaults(),
    );
    assert!(python.contains("class Fruit(IntEnum):"));
    assert!(!python.contains("Fruit = str"));
}

#[test]
fn duplicate_virtual_enum_is_suppressed() {
    let python = output(
        "namespace A { const x = 1; }\nnamespace A { const y = 2; }",
        &defaults(),
    );
    assert_eq!(python.matches("class A(IntEnum):").count(), 1);
}

#[test]
fn top_level_declarations_are_skipped() {
    let python = output("export let x: number;\ninterface A { y: string }", &defaults());
    assert!(!python.contains("x: float"));
    assert!(python.contains("class A(TypedDict):"));
}

#[test]
fn top_level_const_is_kept() {
    let python = output("export const VERSION = \"1.0\";", &defaults());
    assert!(python.contains("VERSION: Any = \"1.0\""));
    assert!(python.contains("from typing import TypedDict, Any"));
}

#[test]
fn top_level_assignment_is_kept() {
    let python = output("config.debug = true;", &defaults());
    assert!(python.contains("config.debug = True"));
}

#[test]
fn determinism_across_runs() {
    let source = "interface Point { x: number }\ntype Color = \"red\" | \"blue\";\nenum D { A = 1 }";
    let first = output(source, &defaults());
    let second = output(source, &defaults());
    assert_eq!(first, second);
}

#[test]
fn emitter_reuse_does_not_leak_state() {
    // the thread-local emitter is reset between runs; an interface
    // defined in the first document must be forward-quoted again in the
    // second
    let combined = "interface A { x: number }\ninterface B { a: A }";
    let _ = output(combined, &defaults());
    let second = output("interface B { a: A }", &defaults());
    assert!(second.contains("a: 'A'"));
}
