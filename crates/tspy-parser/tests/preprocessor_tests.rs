use regex::Regex;
use tspy_parser::{preprocess, preprocess_with};

#[test]
fn default_preprocessor_is_identity() {
    let source = "interface A { x: number } // @include \"other.ts\"";
    let (text, errors) = preprocess(source);
    assert_eq!(text, source);
    assert!(errors.is_empty());
}

#[test]
fn resolves_includes_with_custom_pattern() {
    let pattern = Regex::new(r#"@include "(?P<name>[^"]+)""#).expect("pattern");
    let source = "@include \"point.ts\"\ninterface B { }";
    let (text, errors) = preprocess_with(source, &pattern, |name| {
        assert_eq!(name, "point.ts");
        Ok("interface Point { x: number }".to_string())
    });
    assert!(errors.is_empty());
    assert_eq!(text, "interface Point { x: number }\ninterface B { }");
}

#[test]
fn unresolved_include_is_left_in_place_with_error() {
    let pattern = Regex::new(r#"@include "(?P<name>[^"]+)""#).expect("pattern");
    let source = "@include \"missing.ts\"\n";
    let (text, errors) = preprocess_with(source, &pattern, |_| {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))
    });
    assert_eq!(text, source);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("missing.ts"));
}

#[test]
fn includes_inside_comments_are_ignored() {
    let pattern = Regex::new(r#"@include "(?P<name>[^"]+)""#).expect("pattern");
    let source = "// @include \"a.ts\"\n/* @include \"b.ts\" */\n";
    let (text, errors) = preprocess_with(source, &pattern, |_| Ok("INLINED".to_string()));
    assert_eq!(text, source);
    assert!(errors.is_empty());
}
