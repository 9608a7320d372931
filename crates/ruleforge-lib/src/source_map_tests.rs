use rowan::TextRange;

use super::{SourceId, SourceKind, SourceMap, Span, TokenId};
use crate::parser::SyntaxKind;

#[test]
fn single_one_liner() {
    let map = SourceMap::one_liner("e : INT ;");
    let id = SourceId(0);

    assert_eq!(map.content(id), "e : INT ;");
    assert_eq!(map.kind(id), &SourceKind::OneLiner);
    assert_eq!(map.len(), 1);
}

#[test]
fn multiple_sources() {
    let mut map = SourceMap::new();
    let a = map.add_file("Expr.g4", "grammar Expr;");
    let b = map.add_stdin("e : INT ;");
    let c = map.add_synthesized("e", "e : ( INT ) ;");

    assert_eq!(map.len(), 3);
    assert_eq!(map.kind(a), &SourceKind::File("Expr.g4".to_owned()));
    assert_eq!(map.kind(b), &SourceKind::Stdin);
    assert_eq!(map.kind(c), &SourceKind::Synthesized("e".to_owned()));
    assert_eq!(map.path(a), Some("Expr.g4"));
    assert_eq!(map.path(c), None);
}

#[test]
fn display_name() {
    assert_eq!(SourceKind::OneLiner.display_name(), "<grammar>");
    assert_eq!(SourceKind::Stdin.display_name(), "<stdin>");
    assert_eq!(
        SourceKind::File("a/Expr.g4".to_owned()).display_name(),
        "a/Expr.g4"
    );
    assert_eq!(
        SourceKind::Synthesized("expr".to_owned()).display_name(),
        "<rewritten rule `expr`>"
    );
}

#[test]
fn tokens_are_lexed_on_insert() {
    let map = SourceMap::one_liner("e : INT ;");
    let id = SourceId(0);

    let kinds: Vec<_> = map.tokens(id).iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::RuleRefId,
            SyntaxKind::Whitespace,
            SyntaxKind::Colon,
            SyntaxKind::Whitespace,
            SyntaxKind::TokenRefId,
            SyntaxKind::Whitespace,
            SyntaxKind::Semicolon,
        ]
    );
    assert_eq!(map.token_text(TokenId::new(id, 4)), Some("INT"));
    assert_eq!(
        map.token_span(TokenId::new(id, 4)),
        Some(Span::new(id, TextRange::new(4.into(), 7.into())))
    );
    assert_eq!(map.token_text(TokenId::new(id, 99)), None);
}

#[test]
fn iteration() {
    let mut map = SourceMap::new();
    map.add_file("a.g4", "a : A ;");
    map.add_one_liner("b : B ;");

    let items: Vec<_> = map.iter().collect();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, SourceId(0));
    assert_eq!(items[0].as_str(), "a : A ;");
    assert_eq!(items[1].kind, &SourceKind::OneLiner);
    assert_eq!(items[1].tokens.len(), 7);
}

#[test]
#[should_panic(expected = "invalid SourceId")]
fn invalid_id_panics() {
    let map = SourceMap::new();
    let _ = map.content(SourceId(0));
}
