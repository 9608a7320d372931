//! Rewriting one alternative for the loop form.
//!
//! The alternative is copied, the copy edited, and the result serialized back
//! to text from the original token range. Element options never come from the
//! source text: they are rebuilt from each element's option map together with
//! a `tokenIndex` pointing at the element's original token.

use std::collections::BTreeMap;

use log::trace;

use super::alt_info::{AltShape, RemovedLabel};
use super::classify::{elements, self_ref};
use super::fragment::Fragment;
use crate::config::TOKEN_INDEX_OPTION_NAME;
use crate::parser::{SyntaxKind, Token, token_text};
use crate::source_map::{SourceMap, TokenId};
use crate::tree::{GrammarTree, NodeId, NodeKind, OptionValue, render_option};

#[derive(Debug, Clone)]
pub struct RewrittenAlt {
    /// The edited copy; detached from the grammar.
    pub copy: NodeId,
    pub text: Fragment,
    pub removed_label: Option<RemovedLabel>,
    /// Precedence set on the rightmost self reference, if any.
    pub injected: Option<u32>,
}

pub struct AltRewriter<'a> {
    tree: &'a mut GrammarTree,
    sources: &'a SourceMap,
    rule_name: &'a str,
    precedence_option: &'a str,
}

impl<'a> AltRewriter<'a> {
    pub fn new(
        tree: &'a mut GrammarTree,
        sources: &'a SourceMap,
        rule_name: &'a str,
        precedence_option: &'a str,
    ) -> Self {
        Self {
            tree,
            sources,
            rule_name,
            precedence_option,
        }
    }

    /// Rewrites `alt` without touching it.
    ///
    /// Operator alternatives lose their leading self reference. Binary and
    /// ternary alternatives pass `next_precedence` to their rightmost self
    /// reference, prefix alternatives pass their own `precedence`.
    pub fn rewrite(
        &mut self,
        alt: NodeId,
        shape: &AltShape,
        precedence: u32,
        next_precedence: u32,
    ) -> RewrittenAlt {
        let copy = self.tree.dup_subtree(alt);
        let alt_label = self.tree.node(alt).alt_label().map(str::to_owned);

        let mut skip = Vec::new();
        let mut removed_label = None;
        if let Some(leading) = shape.leading_ref() {
            let removed = self.tree.remove_child(copy, leading.child_index);
            skip.extend(self.tree.node(removed).tokens());
            removed_label = self.removed_label(removed, alt_label.clone());
        }

        let threshold = match shape {
            AltShape::Binary(_) | AltShape::Ternary(_) => Some(next_precedence),
            AltShape::Prefix => Some(precedence),
            AltShape::Suffix(_) | AltShape::Other => None,
        };
        let injected = threshold.and_then(|value| {
            let target = self.rightmost_self_ref(copy)?;
            self.tree
                .set_option(target, self.precedence_option, OptionValue::Int(value));
            Some(value)
        });

        let text = alt_text(self.tree, self.sources, copy, &skip);
        self.tree.set_alt_label(copy, None);
        trace!("{} alt of `{}` rewritten to `{}`", shape.kind(), self.rule_name, text.text());

        RewrittenAlt {
            copy,
            text,
            removed_label,
            injected,
        }
    }

    fn removed_label(&self, element: NodeId, alt_label: Option<String>) -> Option<RemovedLabel> {
        let kind = self.tree.kind(element);
        if !kind.is_label() {
            return None;
        }
        let label = self.tree.child(element, 0)?;
        Some(RemovedLabel {
            text: self.tree.text(label).to_owned(),
            is_list: kind == NodeKind::PlusAssign,
            span: self.tree.span(label),
            alt_label,
        })
    }

    /// Rightmost top-level reference to the rule, labeled or not.
    fn rightmost_self_ref(&self, alt: NodeId) -> Option<NodeId> {
        elements(self.tree, alt)
            .into_iter()
            .rev()
            .find_map(|e| self_ref(self.tree, self.rule_name, e))
    }
}

/// Serializes an alternative from its token range, trivia included.
///
/// Token ranges in `skip` are left out, as are `<...>` option lists and a
/// trailing `# Label`. Options are re-emitted after each element's last token.
pub fn alt_text(
    tree: &GrammarTree,
    sources: &SourceMap,
    alt: NodeId,
    skip: &[(u32, u32)],
) -> Fragment {
    let node = tree.node(alt);
    let Some((start, mut stop)) = node.tokens() else {
        return Fragment::new();
    };
    let source = node.source();
    let tokens = sources.tokens(source);
    let content = sources.content(source);

    if node.alt_label().is_some()
        && let Some(pound) = (start..=stop).rev().find(|&i| tokens[i as usize].kind == SyntaxKind::Pound)
    {
        stop = pound.saturating_sub(1);
    }

    let mut skipped = skip.to_vec();
    let mut suffixes = BTreeMap::new();
    for n in tree.preorder(alt) {
        if tree.kind(n) == NodeKind::ElementOptions {
            skipped.extend(tree.node(n).tokens());
            continue;
        }
        if let Some((anchor, suffix)) = element_options(tree, tokens, n) {
            suffixes.insert(anchor, suffix);
        }
    }

    let mut out = Fragment::new();
    let mut i = start;
    while i <= stop {
        if let Some(&(_, end)) = skipped.iter().find(|&&(s, e)| s <= i && i <= e) {
            i = end + 1;
            continue;
        }
        let token = &tokens[i as usize];
        let text = token_text(content, token);
        let origin = (!token.kind.is_trivia()).then(|| TokenId::new(source, i));
        out.push_token(text, origin);
        if let Some(suffix) = suffixes.get(&i) {
            out.push_str(suffix);
        }
        i += 1;
    }
    out.trimmed()
}

/// `<tokenIndex=i,k=v,...>` for an element, with the token it follows.
fn element_options(
    tree: &GrammarTree,
    tokens: &[Token],
    id: NodeId,
) -> Option<(u32, String)> {
    let node = tree.node(id);
    let in_range = tree
        .parent(id)
        .is_some_and(|p| tree.kind(p) == NodeKind::Range);

    let mut rendered = Vec::new();
    if node.kind().records_token_index() && !in_range {
        rendered.push(render_option(
            TOKEN_INDEX_OPTION_NAME,
            &OptionValue::Int(node.token()?),
        ));
    } else if !node.kind().accepts_element_options() || node.options().is_empty() {
        return None;
    }
    rendered.extend(
        node.options()
            .iter()
            .filter(|(k, _)| k.as_str() != TOKEN_INDEX_OPTION_NAME)
            .map(|(k, v)| render_option(k, v)),
    );
    if rendered.is_empty() {
        return None;
    }

    let (start, stop) = node.tokens()?;
    let anchor = match tree.first_child_with_kind(id, NodeKind::ElementOptions) {
        Some(options) => {
            let (open, _) = tree.node(options).tokens()?;
            (start..open)
                .rev()
                .find(|&i| !tokens[i as usize].kind.is_trivia())?
        }
        None => stop,
    };
    Some((anchor, format!("<{}>", rendered.join(","))))
}
