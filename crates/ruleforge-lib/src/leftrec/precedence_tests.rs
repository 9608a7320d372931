use rowan::TextRange;

use super::alt_info::Assoc;
use super::precedence::{PrecedenceTable, declared_assoc};
use crate::analyze::{RuleTable, collect_rules};
use crate::config::ParseLimits;
use crate::diagnostics::Diagnostics;
use crate::parser::parse_grammar;
use crate::source_map::{SourceId, SourceMap};
use crate::tree::GrammarTree;

fn parse(src: &str) -> (GrammarTree, RuleTable) {
    let sources = SourceMap::one_liner(src);
    let mut tree = GrammarTree::new();
    let (root, _) =
        parse_grammar(&sources, SourceId::default(), &mut tree, ParseLimits::default()).unwrap();
    tree.add_root(root);
    let rules = collect_rules(&tree, &mut Diagnostics::new());
    (tree, rules)
}

#[test]
fn first_alternative_binds_tightest() {
    let table = PrecedenceTable::new(3);
    assert_eq!(table.precedence(1), 3);
    assert_eq!(table.precedence(2), 2);
    assert_eq!(table.precedence(3), 1);
    assert_eq!(table.next_precedence(1), 4);
    assert_eq!(table.next_precedence(2), 3);
}

#[test]
fn levels_strictly_decrease() {
    for n in 1..=12 {
        let table = PrecedenceTable::new(n);
        assert_eq!(table.precedence(1), n as u32);
        assert_eq!(table.precedence(n), 1);
        for alt in 2..=n {
            assert!(table.precedence(alt) < table.precedence(alt - 1));
        }
    }
}

#[test]
fn next_level_follows_assoc() {
    let mut table = PrecedenceTable::new(4);
    table.set_assoc(2, Assoc::Right);
    for alt in 1..=4 {
        let expected = match table.assoc(alt) {
            Assoc::Right => table.precedence(alt),
            Assoc::Left => table.precedence(alt) + 1,
        };
        assert_eq!(table.next_precedence(alt), expected, "alt {alt}");
    }
    assert_eq!(table.next_precedence(2), 3);
    assert_eq!(table.assoc(1), Assoc::Left);
}

#[test]
fn assoc_on_alternative() {
    let (tree, rules) = parse("e : <assoc=right> e '^' e | INT ;");
    let alts = rules["e"].alts(&tree);

    let declared = declared_assoc(&tree, alts[0]);
    assert_eq!(declared.assoc, Assoc::Right);
    assert_eq!(declared.conflict, None);
    assert_eq!(declared_assoc(&tree, alts[1]).assoc, Assoc::Left);
}

#[test]
fn assoc_on_operator_token() {
    let (tree, rules) = parse("e : e '^'<assoc=right> e | e POW<assoc=left> e | INT ;");
    let alts = rules["e"].alts(&tree);
    assert_eq!(declared_assoc(&tree, alts[0]).assoc, Assoc::Right);
    assert_eq!(declared_assoc(&tree, alts[1]).assoc, Assoc::Left);
}

#[test]
fn agreeing_declarations() {
    let (tree, rules) = parse("e : <assoc=right> e '^'<assoc=right> e | INT ;");
    let declared = declared_assoc(&tree, rules["e"].alts(&tree)[0]);
    assert_eq!(declared.assoc, Assoc::Right);
    assert_eq!(declared.conflict, None);
}

#[test]
fn conflicting_declarations() {
    let (tree, rules) = parse("e : <assoc=left> e '^'<assoc=right> e | INT ;");
    let declared = declared_assoc(&tree, rules["e"].alts(&tree)[0]);
    assert_eq!(declared.assoc, Assoc::Left);
    let conflict = declared.conflict.expect("conflict");
    assert_eq!(conflict.range, TextRange::new(19.into(), 22.into()));
}

#[test]
fn invalid_value_is_ignored() {
    let (tree, rules) = parse("e : <assoc=up> e '^' e | INT ;");
    let declared = declared_assoc(&tree, rules["e"].alts(&tree)[0]);
    assert_eq!(declared.assoc, Assoc::Left);
    assert_eq!(declared.conflict, None);
}
