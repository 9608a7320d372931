use rowan::TextRange;

use super::rules::{RuleTable, collect_rules};
use super::symbols::SymbolChecks;
use crate::config::ParseLimits;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::leftrec::RemovedLabel;
use crate::parser::parse_grammar;
use crate::source_map::{SourceId, SourceMap, Span};
use crate::tree::GrammarTree;

fn parse(src: &str) -> (GrammarTree, RuleTable) {
    let sources = SourceMap::one_liner(src);
    let mut tree = GrammarTree::new();
    let (root, diagnostics) =
        parse_grammar(&sources, SourceId::default(), &mut tree, ParseLimits::default()).unwrap();
    assert!(diagnostics.is_empty(), "{diagnostics}");
    tree.add_root(root);
    let rules = collect_rules(&tree, &mut Diagnostics::new());
    (tree, rules)
}

fn check(src: &str, rule: &str, removed: &[RemovedLabel]) -> Diagnostics {
    let (tree, rules) = parse(src);
    let mut diagnostics = Diagnostics::new();
    SymbolChecks::new(&tree, &rules, &mut diagnostics).check_rule(&rules[rule], removed);
    diagnostics
}

fn span(start: u32, end: u32) -> Span {
    Span::new(SourceId::default(), TextRange::new(start.into(), end.into()))
}

#[test]
fn label_bound_to_rule_and_token() {
    let diagnostics = check("a : x=b | x=C ; b : B ;", "a", &[]);
    insta::assert_snapshot!(
        diagnostics.to_string(),
        @"error at 10..11: label `x` type mismatch with previous definition (related: previous definition at 4..5) (hint: bound to a token here, to a rule before)"
    );
}

#[test]
fn list_and_single_label_conflict() {
    let diagnostics = check("a : x=B x+=B ;", "a", &[]);
    assert_eq!(diagnostics.kinds(), vec![DiagnosticKind::LabelTypeConflict]);
}

#[test]
fn labels_shadowing_other_names() {
    let src = "a[int n] returns [int r] locals [int l] : b=B n=B r=B l=B ID=B ; b : B ; ID : 'i' ;";
    let diagnostics = check(src, "a", &[]);
    assert_eq!(
        diagnostics.kinds(),
        vec![
            DiagnosticKind::LabelConflictsWithRule,
            DiagnosticKind::LabelConflictsWithArg,
            DiagnosticKind::LabelConflictsWithRetval,
            DiagnosticKind::LabelConflictsWithLocal,
            DiagnosticKind::LabelConflictsWithToken,
        ]
    );
}

#[test]
fn attribute_references_in_actions() {
    let src = "e returns [int v] : l=e '+' r=e {$v = $l.v + $r.text + $x;} | INT {$INT.text; $INT.foo; $e.bar; $parser;} ;";
    let diagnostics = check(src, "e", &[]);

    assert_eq!(
        diagnostics.messages(),
        vec![
            "unknown attribute reference `x`",
            "unknown token attribute `INT.foo`",
            "unknown rule attribute `e.bar`",
        ]
    );
    assert_eq!(diagnostics.spans(), vec![span(55, 57), span(78, 86), span(88, 94)]);
}

#[test]
fn removed_labels_stay_defined() {
    let src = "e : '-' e {$l.text;} | INT ;";
    let removed = RemovedLabel {
        text: "l".to_owned(),
        is_list: false,
        span: span(0, 1),
        alt_label: None,
    };

    assert!(check(src, "e", std::slice::from_ref(&removed)).is_empty());
    assert_eq!(
        check(src, "e", &[]).kinds(),
        vec![DiagnosticKind::UnknownSimpleAttribute]
    );
}

#[test]
fn lexer_rules_resolve_token_attributes_only() {
    let diagnostics = check("ID : [a-z]+ {$text; $type; $foo;} ;", "ID", &[]);
    assert_eq!(diagnostics.messages(), vec!["unknown attribute reference `foo`"]);
}
