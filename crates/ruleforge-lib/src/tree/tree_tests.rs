use rowan::TextRange;

use super::*;

fn span(start: u32, end: u32) -> Span {
    Span::new(SourceId::default(), TextRange::new(start.into(), end.into()))
}

/// Block(Alt(RuleRef e, StringLiteral '+', RuleRef e))
fn small_tree() -> (GrammarTree, NodeId, NodeId) {
    let mut tree = GrammarTree::new();
    let block = tree.alloc(NodeKind::Block, span(0, 7), None, "");
    let alt = tree.alloc(NodeKind::Alt, span(0, 7), None, "");
    tree.add_child(block, alt);
    let e1 = tree.alloc(NodeKind::RuleRef, span(0, 1), Some(0), "e");
    let plus = tree.alloc(NodeKind::StringLiteral, span(2, 5), Some(2), "'+'");
    let e2 = tree.alloc(NodeKind::RuleRef, span(6, 7), Some(4), "e");
    tree.add_child(alt, e1);
    tree.add_child(alt, plus);
    tree.add_child(alt, e2);
    tree.set_tokens(alt, Some((0, 4)));
    (tree, block, alt)
}

#[test]
fn parent_links() {
    let (tree, block, alt) = small_tree();
    let e2 = tree.child(alt, 2).unwrap();

    assert_eq!(tree.parent(alt), Some(block));
    assert_eq!(tree.parent(e2), Some(alt));
    assert_eq!(tree.child_index(e2), Some(2));
    assert_eq!(tree.parent(block), None);
}

#[test]
fn preorder_visits_parents_first() {
    let (tree, block, _) = small_tree();
    let texts: Vec<_> = tree
        .preorder(block)
        .into_iter()
        .map(|id| format!("{:?}{}", tree.kind(id), tree.text(id)))
        .collect();
    assert_eq!(texts, vec!["Block", "Alt", "RuleRefe", "StringLiteral'+'", "RuleRefe"]);
}

#[test]
fn replace_child_detaches_old_subtree() {
    let (mut tree, block, alt) = small_tree();
    let new_alt = tree.alloc(NodeKind::Alt, span(0, 0), None, "");

    let old = tree.replace_child(block, 0, new_alt);

    assert_eq!(old, alt);
    assert_eq!(tree.parent(alt), None);
    assert_eq!(tree.parent(new_alt), Some(block));
    assert_eq!(tree.children(block), &[new_alt]);
    // detached subtree stays readable
    assert_eq!(tree.children(alt).len(), 3);
}

#[test]
fn remove_child_shifts_siblings() {
    let (mut tree, _, alt) = small_tree();
    let removed = tree.remove_child(alt, 0);

    assert_eq!(tree.text(removed), "e");
    assert_eq!(tree.parent(removed), None);
    assert_eq!(tree.kind(tree.child(alt, 0).unwrap()), NodeKind::StringLiteral);
}

#[test]
fn dup_subtree_is_independent() {
    let (mut tree, _, alt) = small_tree();
    let copy = tree.dup_subtree(alt);

    assert_ne!(copy, alt);
    assert_eq!(tree.parent(copy), None);
    assert_eq!(tree.node(copy).tokens(), Some((0, 4)));

    let copied_ref = tree.child(copy, 2).unwrap();
    tree.set_option(copied_ref, "p", OptionValue::Int(4));
    tree.remove_child(copy, 0);

    let original_ref = tree.child(alt, 2).unwrap();
    assert!(tree.node(original_ref).options().is_empty());
    assert_eq!(tree.children(alt).len(), 3);
    assert_eq!(tree.children(copy).len(), 2);
    assert_eq!(tree.parent(copied_ref), Some(copy));
}

#[test]
fn nodes_with_kind_in_preorder() {
    let (tree, block, _) = small_tree();
    let refs = tree.nodes_with_kind(block, &[NodeKind::RuleRef]);
    let tokens: Vec<_> = refs.iter().map(|&r| tree.node(r).token()).collect();
    assert_eq!(tokens, vec![Some(0), Some(4)]);
}

#[test]
fn origin_defaults_to_own_token() {
    let (mut tree, _, alt) = small_tree();
    let e2 = tree.child(alt, 2).unwrap();
    assert_eq!(tree.node(e2).origin(), Some(TokenId::new(SourceId::default(), 4)));

    let elsewhere = TokenId::new(SourceId(3), 9);
    tree.set_origin(e2, elsewhere, Span::new(SourceId(3), TextRange::new(20.into(), 21.into())));
    assert_eq!(tree.node(e2).origin(), Some(elsewhere));
    assert_eq!(tree.span(e2).source, SourceId(3));
}

#[test]
fn option_rendering() {
    assert_eq!(render_option("p", &OptionValue::Int(3)), "p=3");
    assert_eq!(render_option("assoc", &OptionValue::Id("right".into())), "assoc=right");
    assert_eq!(render_option("fail", &OptionValue::Str("'no'".into())), "fail='no'");
    assert_eq!(render_option("greedy", &OptionValue::Flag), "greedy");
}

#[test]
fn printer_with_options() {
    let (mut tree, block, alt) = small_tree();
    let e2 = tree.child(alt, 2).unwrap();
    tree.set_option(e2, "p", OptionValue::Int(2));
    tree.set_alt_label(alt, Some("Add".into()));

    let dump = TreePrinter::new(&tree).root(block).with_options(true).dump();
    insta::assert_snapshot!(dump, @r"
    Block
      Alt #Add
        RuleRef e
        StringLiteral '+'
        RuleRef e <p=2>
    ");
}

#[test]
fn printer_with_spans() {
    let (tree, block, _) = small_tree();
    let dump = TreePrinter::new(&tree).root(block).with_spans(true).dump();
    insta::assert_snapshot!(dump, @r"
    Block @0..7
      Alt @0..7
        RuleRef e @0..1
        StringLiteral '+' @2..5
        RuleRef e @6..7
    ");
}

#[test]
fn insert_child_at_position() {
    let (mut tree, _, alt) = small_tree();
    let action = tree.alloc(NodeKind::Action, span(1, 2), Some(1), "{}");

    tree.insert_child(alt, 1, action);

    assert_eq!(tree.child(alt, 1), Some(action));
    assert_eq!(tree.parent(action), Some(alt));
    assert_eq!(tree.children(alt).len(), 4);
}

#[test]
fn lookup_by_token_index() {
    let (tree, block, alt) = small_tree();
    let plus = tree.node_with_token_index(block, 2).unwrap();

    assert_eq!(tree.text(plus), "'+'");
    assert_eq!(tree.parent(plus), Some(alt));
    assert_eq!(tree.node_with_token_index(block, 3), None);
}
