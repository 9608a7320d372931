use super::attributes::{AttributeDict, DictKind, attribute_refs};

#[test]
fn typed_declarations_with_nested_generics() {
    let dict = AttributeDict::parse(DictKind::Args, "[int a, List<String> b = null, Map<K, V> m]");

    assert_eq!(dict.raw(), "int a, List<String> b = null, Map<K, V> m");
    assert_eq!(dict.names().collect::<Vec<_>>(), vec!["a", "b", "m"]);

    let b = dict.get("b").unwrap();
    assert_eq!(b.ty.as_deref(), Some("List<String>"));
    assert_eq!(b.init.as_deref(), Some("null"));
    assert_eq!(dict.get("m").unwrap().ty.as_deref(), Some("Map<K, V>"));
}

#[test]
fn name_colon_type_spelling() {
    let dict = AttributeDict::parse(DictKind::Returns, "x: number, y");

    assert_eq!(dict.kind(), DictKind::Returns);
    assert_eq!(dict.get("x").unwrap().ty.as_deref(), Some("number"));
    assert_eq!(dict.get("y").unwrap().ty, None);
}

#[test]
fn path_separator_is_part_of_type() {
    let dict = AttributeDict::parse(DictKind::Locals, "[std::string s = \"a, b\"]");

    assert_eq!(dict.len(), 1);
    let s = dict.get("s").unwrap();
    assert_eq!(s.ty.as_deref(), Some("std::string"));
    assert_eq!(s.init.as_deref(), Some("\"a, b\""));
}

#[test]
fn empty_list() {
    let dict = AttributeDict::parse(DictKind::Args, "[ ]");
    assert!(dict.is_empty());
    assert_eq!(DictKind::Args.keyword(), None);
    assert_eq!(DictKind::Locals.keyword(), Some("locals"));
}

#[test]
fn references_in_action_text() {
    let refs = attribute_refs(r#"$x = $e.v + $ctx; "$no" \$esc $ $1"#);
    let found: Vec<_> = refs.iter().map(|r| (r.name, r.field, r.offset, r.len)).collect();

    assert_eq!(
        found,
        vec![
            ("x", None, 0, 2),
            ("e", Some("v"), 5, 4),
            ("ctx", None, 12, 4),
        ]
    );
}

#[test]
fn trailing_dot_is_not_a_field() {
    let refs = attribute_refs("$a. $b.c()");
    let found: Vec<_> = refs.iter().map(|r| (r.name, r.field)).collect();
    assert_eq!(found, vec![("a", None), ("b", Some("c"))]);
}
