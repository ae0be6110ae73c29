use crate::position::LineMap;
use crate::span::{Span, Spanned};

#[test]
fn span_basic_properties() {
    let span = Span::new(3, 10);
    assert_eq!(span.len(), 7);
    assert!(!span.is_empty());
    assert_eq!(span.start(), 3);
    assert_eq!(span.end(), 10);
}

#[test]
fn empty_and_dummy_spans() {
    assert!(Span::at(5).is_empty());
    assert!(Span::dummy().is_dummy());
    assert!(!Span::new(0, 1).is_dummy());
}

#[test]
fn merge_covers_both_spans() {
    let merged = Span::new(4, 8).merge(Span::new(1, 6));
    assert_eq!(merged, Span::new(1, 8));
}

#[test]
fn slice_is_clamped_to_text() {
    let text = "interface X {}";
    assert_eq!(Span::new(0, 9).slice(text), "interface");
    assert_eq!(Span::new(10, 99).slice(text), "X {}");
}

#[test]
fn line_map_positions() {
    let map = LineMap::build("ab\ncd\n\nef");
    assert_eq!(map.line_count(), 4);
    let pos = map.position(0);
    assert_eq!((pos.line, pos.column), (0, 0));
    let pos = map.position(4);
    assert_eq!((pos.line, pos.column), (1, 1));
    let pos = map.position(6);
    assert_eq!((pos.line, pos.column), (2, 0));
    let pos = map.position(8);
    assert_eq!((pos.line, pos.column), (3, 1));
}

#[test]
fn position_displays_one_indexed() {
    let map = LineMap::build("a\nbc");
    assert_eq!(map.position(3).to_string(), "2:2");
}
