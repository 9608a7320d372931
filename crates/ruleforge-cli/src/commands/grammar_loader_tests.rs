use std::fs;

use ruleforge_lib::SourceKind;

use super::grammar_loader::{LoadError, load_grammar_source};

#[test]
fn inline_text_wins() {
    let map = load_grammar_source(None, Some("a : A ;")).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.iter().next().unwrap().as_str(), "a : A ;");
}

#[test]
fn missing_input() {
    let err = load_grammar_source(None, None).unwrap_err();
    assert!(matches!(err, LoadError::NoInput));
}

#[test]
fn single_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Expr.g4");
    fs::write(&path, "e : e '+' e | INT ;").unwrap();

    let map = load_grammar_source(Some(&path), None).unwrap();
    assert_eq!(map.len(), 1);
    let source = map.iter().next().unwrap();
    assert_eq!(source.as_str(), "e : e '+' e | INT ;");
    assert!(matches!(source.kind, SourceKind::File(p) if p.ends_with("Expr.g4")));
}

#[test]
fn directory_loads_g4_files_in_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.g4"), "b : B ;").unwrap();
    fs::write(dir.path().join("a.g4"), "a : A ;").unwrap();
    fs::write(dir.path().join("notes.txt"), "not a grammar").unwrap();

    let map = load_grammar_source(Some(dir.path()), None).unwrap();
    let contents: Vec<_> = map.iter().map(|s| s.as_str()).collect();
    assert_eq!(contents, vec!["a : A ;", "b : B ;"]);
}

#[test]
fn directory_without_grammars() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), "not a grammar").unwrap();

    let err = load_grammar_source(Some(dir.path()), None).unwrap_err();
    assert!(matches!(err, LoadError::EmptyDirectory(_)));
    assert!(err.to_string().starts_with("no .g4 files found in"));
}

#[test]
fn unreadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.g4");

    let err = load_grammar_source(Some(&path), None).unwrap_err();
    assert!(matches!(err, LoadError::Read { .. }));
    assert!(err.to_string().contains("missing.g4"));
}
