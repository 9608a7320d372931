use indexmap::IndexSet;

use super::sites::update_call_sites;
use crate::config::ParseLimits;
use crate::parser::parse_grammar;
use crate::source_map::{SourceId, SourceMap};
use crate::tree::{GrammarTree, NodeId, NodeKind, OptionValue};

fn parse(src: &str) -> GrammarTree {
    let sources = SourceMap::one_liner(src);
    let mut tree = GrammarTree::new();
    let (root, diagnostics) =
        parse_grammar(&sources, SourceId::default(), &mut tree, ParseLimits::default()).unwrap();
    assert!(diagnostics.is_empty(), "{diagnostics}");
    tree.add_root(root);
    tree
}

fn rule_refs(tree: &GrammarTree) -> Vec<NodeId> {
    tree.nodes_with_kind(tree.roots()[0], &[NodeKind::RuleRef])
}

fn names(items: &[&str]) -> IndexSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn tags_untagged_references() {
    let mut tree = parse("s : e ';' | x=e (e)* ; e : INT ; t : s ;");
    assert_eq!(update_call_sites(&mut tree, &names(&["e"]), "p"), 3);

    let refs = rule_refs(&tree);
    let tagged: Vec<_> = refs
        .iter()
        .map(|&r| (tree.text(r), tree.node(r).option("p").cloned()))
        .collect();
    assert_eq!(
        tagged,
        vec![
            ("e", Some(OptionValue::Int(0))),
            ("e", Some(OptionValue::Int(0))),
            ("e", Some(OptionValue::Int(0))),
            ("s", None),
        ]
    );
}

#[test]
fn existing_levels_are_kept() {
    let mut tree = parse("s : e<p=3> e ; e : INT ;");
    assert_eq!(update_call_sites(&mut tree, &names(&["e"]), "p"), 1);

    let refs = rule_refs(&tree);
    assert_eq!(tree.node(refs[0]).option("p"), Some(&OptionValue::Int(3)));
    assert_eq!(tree.node(refs[1]).option("p"), Some(&OptionValue::Int(0)));
}

#[test]
fn second_run_changes_nothing() {
    let mut tree = parse("s : e | f e ; e : INT ; f : ID ;");
    let left_recursive = names(&["e"]);
    assert_eq!(update_call_sites(&mut tree, &left_recursive, "p"), 2);
    let once = tree.dump();
    assert_eq!(update_call_sites(&mut tree, &left_recursive, "p"), 0);
    assert_eq!(tree.dump(), once);
}

#[test]
fn nothing_to_tag() {
    let mut tree = parse("s : e ; e : INT ;");
    assert_eq!(update_call_sites(&mut tree, &IndexSet::new(), "p"), 0);
    assert_eq!(tree.node(rule_refs(&tree)[0]).option("p"), None);
}

#[test]
fn option_name_is_configurable() {
    let mut tree = parse("s : e ; e : INT ;");
    update_call_sites(&mut tree, &names(&["e"]), "prec");
    let r = rule_refs(&tree)[0];
    assert_eq!(tree.node(r).option("prec"), Some(&OptionValue::Int(0)));
    assert_eq!(tree.node(r).option("p"), None);
}
