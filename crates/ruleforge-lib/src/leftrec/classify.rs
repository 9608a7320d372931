//! Alternative shapes of immediately left-recursive rules.
//!
//! Only top-level elements of an alternative are inspected. Actions and
//! predicates match no input and are ignored when looking for the right
//! edge, but an action in front of the leading reference hides it.

use super::alt_info::{AltShape, LeadingRef};
use crate::tree::{GrammarTree, NodeId, NodeKind};

/// Some alternative starts with a reference to `rule_name`.
pub fn has_immediate_left_recursion(tree: &GrammarTree, rule_name: &str, alts: &[NodeId]) -> bool {
    alts.iter().any(|&alt| {
        elements(tree, alt)
            .first()
            .is_some_and(|&first| self_ref(tree, rule_name, first).is_some())
    })
}

/// Classifies every alternative; `None` when one of them fits no supported shape.
pub fn classify_alts(tree: &GrammarTree, rule_name: &str, alts: &[NodeId]) -> Option<Vec<AltShape>> {
    alts.iter()
        .map(|&alt| classify_alt(tree, rule_name, alt))
        .collect()
}

/// `None` for a left edge self reference that starts no known operator form,
/// such as a lone `e` or `e e e`.
pub fn classify_alt(tree: &GrammarTree, rule_name: &str, alt: NodeId) -> Option<AltShape> {
    let elements = elements(tree, alt);
    let matching: Vec<NodeId> = elements
        .iter()
        .copied()
        .filter(|&e| !tree.kind(e).is_epsilon())
        .collect();
    let is_self = |e: NodeId| self_ref(tree, rule_name, e).is_some();
    let trailing = matching.last().is_some_and(|&e| is_self(e));

    let Some(&first) = elements.first() else {
        return Some(AltShape::Other);
    };
    let Some(rule_ref) = self_ref(tree, rule_name, first) else {
        return Some(if trailing { AltShape::Prefix } else { AltShape::Other });
    };

    let leading = LeadingRef {
        child_index: tree.child_index(first)?,
        element: first,
        rule_ref,
    };
    if matching.len() == 1 {
        return None;
    }

    let self_count = matching.iter().filter(|&&e| is_self(e)).count();
    let ternary = matching.len() == 5
        && [0, 2, 4].iter().all(|&i| is_self(matching[i]))
        && [1, 3].iter().all(|&i| is_terminal(tree, matching[i]));

    if ternary {
        Some(AltShape::Ternary(leading))
    } else if !trailing {
        Some(AltShape::Suffix(leading))
    } else if self_count == 2 {
        Some(AltShape::Binary(leading))
    } else {
        None
    }
}

/// Top-level elements of an alternative, without options and lexer commands.
pub(crate) fn elements(tree: &GrammarTree, alt: NodeId) -> Vec<NodeId> {
    tree.children(alt)
        .iter()
        .copied()
        .filter(|&c| {
            !matches!(
                tree.kind(c),
                NodeKind::ElementOptions | NodeKind::LexerCommands | NodeKind::Epsilon
            )
        })
        .collect()
}

/// The reference to `rule_name` that `element` is, directly or through a label.
pub(crate) fn self_ref(tree: &GrammarTree, rule_name: &str, element: NodeId) -> Option<NodeId> {
    let target = match tree.kind(element) {
        NodeKind::RuleRef => element,
        NodeKind::Assign | NodeKind::PlusAssign => tree.child(element, 1)?,
        _ => return None,
    };
    (tree.kind(target) == NodeKind::RuleRef && tree.text(target) == rule_name).then_some(target)
}

fn is_terminal(tree: &GrammarTree, element: NodeId) -> bool {
    let target = match tree.kind(element) {
        NodeKind::Assign | NodeKind::PlusAssign => tree.child(element, 1),
        _ => Some(element),
    };
    target.is_some_and(|t| matches!(tree.kind(t), NodeKind::TokenRef | NodeKind::StringLiteral))
}
