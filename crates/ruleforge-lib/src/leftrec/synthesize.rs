//! Text of the loop form of a left-recursive rule.
//!
//! ```text
//! e
//!     :   ( primary
//!         | primary
//!         )
//!         (
//!           {precpred(_ctx, 3)}?<p=3> op-alt
//!         | {precpred(_ctx, 2)}?<p=2> op-alt
//!         )*
//!     ;
//! ```
//!
//! The primary block and the loop block are found again by position once the
//! text is parsed: rule block, its only alternative, then child 0 (primaries)
//! and child 1 (the `*` loop).

use super::fragment::Fragment;
use crate::analyze::Rule;
use crate::config::TransformConfig;
use crate::tree::{GrammarTree, NodeKind};

/// Joins rewritten alternatives into one rule definition.
///
/// `ops` pairs each operator alternative with its precedence, in loop order.
pub fn synthesize_rule(
    tree: &GrammarTree,
    rule: &Rule,
    primaries: &[&Fragment],
    ops: &[(u32, &Fragment)],
    config: &TransformConfig,
) -> Fragment {
    let mut out = Fragment::new();
    out.push_token(&rule.name, rule.name_token);

    for kind in [NodeKind::ArgAction, NodeKind::Returns, NodeKind::Locals] {
        let Some(node) = tree.first_child_with_kind(rule.ast, kind) else {
            continue;
        };
        match kind {
            NodeKind::Returns => out.push_str(" returns "),
            NodeKind::Locals => out.push_str(" locals "),
            _ => {}
        }
        out.push_token(tree.text(node), tree.node(node).origin());
    }

    out.push_str("\n    :   ( ");
    for (i, alt) in primaries.iter().enumerate() {
        if i > 0 {
            out.push_str("\n        | ");
        }
        out.push_fragment(alt);
    }
    out.push_str("\n        )\n        (\n          ");

    for (i, (precedence, alt)) in ops.iter().enumerate() {
        if i > 0 {
            out.push_str("\n        | ");
        }
        out.push_str(&config.predicate(*precedence));
        out.push_str(&format!("<{}={}> ", config.precedence_option(), precedence));
        out.push_fragment(alt);
    }
    out.push_str("\n        )*\n    ;");
    out
}
