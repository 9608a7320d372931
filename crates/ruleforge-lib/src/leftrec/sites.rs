//! Precedence tags on references to rewritten rules.

use indexmap::IndexSet;

use crate::tree::{GrammarTree, NodeKind, OptionValue};

/// Tags every untagged reference to a rule in `left_recursive` with precedence `0`.
///
/// References that already carry the option (the rewritten rules' own
/// recursive operands) are left alone, so running this twice changes nothing.
/// Returns the number of references tagged.
pub fn update_call_sites(
    tree: &mut GrammarTree,
    left_recursive: &IndexSet<String>,
    precedence_option: &str,
) -> usize {
    if left_recursive.is_empty() {
        return 0;
    }

    let mut targets = Vec::new();
    for &root in tree.roots() {
        for node in tree.nodes_with_kind(root, &[NodeKind::RuleRef]) {
            if tree
                .parent(node)
                .is_some_and(|p| tree.kind(p) == NodeKind::Rule)
            {
                continue;
            }
            if tree.node(node).option(precedence_option).is_some() {
                continue;
            }
            if left_recursive.contains(tree.text(node)) {
                targets.push(node);
            }
        }
    }

    for &node in &targets {
        tree.set_option(node, precedence_option, OptionValue::Int(0));
    }
    targets.len()
}
