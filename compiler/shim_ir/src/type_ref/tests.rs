// Tests use unwrap for brevity; a panic is a good failure message here.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_parse_plain_name() {
    let symbol = DumpSymbol::parse("UnityEngine", "Transform").unwrap();
    assert_eq!(symbol.namespace(), "UnityEngine");
    assert_eq!(symbol.path(), ["Transform".to_owned()]);
    assert_eq!(symbol.kind(), RefKind::Named);
    assert!(!symbol.is_generic());
}

#[test]
fn test_parse_keyword_alias_maps_to_system() {
    let symbol = DumpSymbol::parse("", "int").unwrap();
    assert_eq!(symbol.namespace(), "System");
    assert_eq!(symbol.path(), ["Int32".to_owned()]);
}

#[test]
fn test_parse_nested_generic_with_suffixes() {
    let symbol = DumpSymbol::parse("", "Dictionary.Entry<string, List<int>>[]*").unwrap();
    assert_eq!(symbol.path(), ["Dictionary".to_owned(), "Entry".to_owned()]);
    assert_eq!(symbol.arguments().len(), 2);
    assert_eq!(symbol.arguments()[1].arguments().len(), 1);
    assert_eq!(symbol.suffixes(), [Suffix::Array { rank: 1 }, Suffix::Pointer]);
    assert_eq!(symbol.kind(), RefKind::Pointer);
}

#[test]
fn test_whitespace_does_not_change_identity() {
    let a = DumpSymbol::parse("", "Dictionary<string,int>").unwrap();
    let b = DumpSymbol::parse("", "Dictionary< string , int >").unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_arguments_on_declaring_segment_move_inward() {
    let symbol = DumpSymbol::parse("", "Dictionary<string, int>.Entry").unwrap();
    assert_eq!(symbol.path().len(), 2);
    assert_eq!(symbol.arguments().len(), 2);
}

#[test]
fn test_multi_dimensional_array_rank() {
    let symbol = DumpSymbol::parse("", "float[,,]").unwrap();
    assert_eq!(symbol.kind(), RefKind::Array { rank: 3 });
}

#[test]
fn test_element_and_declaring() {
    let symbol = DumpSymbol::parse("", "Outer.Inner[]").unwrap();
    let element = symbol.element().unwrap();
    assert_eq!(element.to_string(), "Outer.Inner");
    assert!(symbol.declaring().is_none());
    assert_eq!(element.declaring().unwrap().to_string(), "Outer");
}

#[test]
fn test_display_renders_canonical_text() {
    let symbol = DumpSymbol::parse("Game", "Pool<Item>[]").unwrap();
    assert_eq!(symbol.to_string(), "Game.Pool<Item>[]");
}

#[test]
fn test_malformed_symbols() {
    let cases = [
        ("", "expected a type name"),
        ("List<int", "unclosed generic argument list"),
        ("List<int>>", "unexpected trailing input"),
        ("int[", "unclosed array rank"),
        ("Outer.", "expected a type name"),
        ("A<int><int>", "generic argument list repeated"),
        ("A<int; int>", "expected `,` or `>`"),
    ];
    for (text, reason) in cases {
        let err = DumpSymbol::parse("", text).unwrap_err();
        assert_eq!(err.reason, reason, "for `{text}`");
    }
}

#[test]
fn test_strip_arity() {
    assert_eq!(strip_arity("List`1"), "List");
    assert_eq!(strip_arity("Dictionary`2"), "Dictionary");
    assert_eq!(strip_arity("Plain"), "Plain");
    assert_eq!(strip_arity("We`ird"), "We`ird");
}

fn nested_list(depth: usize) -> String {
    format!("{}int{}", "List<".repeat(depth), ">".repeat(depth))
}

#[test]
fn test_generic_nesting_is_bounded() {
    let limit = super::dump::MAX_GENERIC_NESTING;
    assert!(DumpSymbol::parse("Game", &nested_list(limit)).is_ok());

    let err = DumpSymbol::parse("Game", &nested_list(limit + 1)).unwrap_err();
    assert_eq!(err.reason, "generic nesting too deep");

    // Far past the limit the declaration still fails cleanly.
    let err = DumpSymbol::parse("Game", &nested_list(50_000)).unwrap_err();
    assert_eq!(err.reason, "generic nesting too deep");
}
