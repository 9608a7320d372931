use super::checks::BasicChecks;
use super::rules::{RuleTable, collect_rules};
use crate::config::ParseLimits;
use crate::diagnostics::Diagnostics;
use crate::parser::parse_grammar;
use crate::source_map::{SourceId, SourceMap};
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

fn check(src: &str, rule: &str, is_left_recursive: bool) -> String {
    let (tree, rules) = parse(src);
    let mut diagnostics = Diagnostics::new();
    BasicChecks::new(&tree, &mut diagnostics, "p").check_rule(&rules[rule], is_left_recursive);
    diagnostics.to_string()
}

#[test]
fn unknown_option_on_literal() {
    let src = "e : <assoc=right> e '^'<fail='f'> e | e '.'<bogus> ID | INT ;";
    insta::assert_snapshot!(check(src, "e", true), @"warning at 40..43: unsupported option `bogus`");
}

#[test]
fn assoc_outside_left_recursive_rule() {
    let src = "a : <assoc=right> A B | C ;";
    insta::assert_snapshot!(
        check(src, "a", false),
        @"warning at 4..21: rule `a` is not left recursive; `assoc` has no effect (hint: associativity only affects alternatives of left-recursive rules)"
    );
}

#[test]
fn assoc_check_can_be_skipped() {
    let (tree, rules) = parse("a : <assoc=right> A B | C ;");
    let mut diagnostics = Diagnostics::new();
    BasicChecks::new(&tree, &mut diagnostics, "p")
        .without_assoc_check()
        .check_rule(&rules["a"], false);
    assert!(diagnostics.is_empty());
}

#[test]
fn invalid_assoc_value() {
    insta::assert_snapshot!(
        check("e : e '^'<assoc=up> e | INT ;", "e", true),
        @"error at 6..9: unsupported option value: `assoc=up` (hint: `assoc` accepts `left` or `right`)"
    );
}

#[test]
fn precedence_option_name_is_configurable() {
    let src = "a : b<q=1> {x}?<q=2> ;";
    let (tree, rules) = parse(src);

    let mut diagnostics = Diagnostics::new();
    BasicChecks::new(&tree, &mut diagnostics, "q").check_rule(&rules["a"], false);
    assert!(diagnostics.is_empty());

    let mut diagnostics = Diagnostics::new();
    BasicChecks::new(&tree, &mut diagnostics, "p").check_rule(&rules["a"], false);
    assert_eq!(
        diagnostics.messages(),
        vec!["unsupported option `q`", "unsupported option `q`"]
    );
    assert!(!diagnostics.has_errors());
}

#[test]
fn structural_options_are_allowed() {
    let src = "fragment A : 'a'*? B<tokenIndex=3> ;";
    assert_eq!(check(src, "A", false), "");
}
