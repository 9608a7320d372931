//! Rewriting every immediately left-recursive parser rule of a grammar.
//!
//! Failure is per rule: a rule whose rewrite goes wrong keeps its original
//! definition, gets a tool error, and the remaining rules are still processed.

use indexmap::IndexMap;
use log::{debug, warn};

use super::alt_info::{AltKind, LeftRecursiveAltInfo, LeftRecursiveRule};
use super::classify::{classify_alts, has_immediate_left_recursion};
use super::fragment::{Fragment, Provenance};
use super::precedence::{PrecedenceTable, declared_assoc};
use super::rewrite::AltRewriter;
use super::synthesize::synthesize_rule;
use super::{RuleOutcome, TransformSummary};
use crate::analyze::{BasicChecks, Rule, RuleTable, SymbolChecks};
use crate::config::{TOKEN_INDEX_OPTION_NAME, TransformConfig};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::parser::parse_rule;
use crate::source_map::{SourceId, SourceMap, TokenId};
use crate::tree::{GrammarTree, NodeId, NodeKind, OptionValue};

/// Internal failure while rewriting one rule.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransformError {
    #[error("rewritten rule `{rule}` does not parse: {reason}\n{text}")]
    Reparse {
        rule: String,
        reason: String,
        text: String,
    },

    #[error("rewritten rule `{rule}` has no {block} block")]
    MissingBlock { rule: String, block: &'static str },

    #[error("rewritten rule `{rule}` has {found} {block} alternatives, expected {expected}")]
    AltCountMismatch {
        rule: String,
        block: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("rule `{rule}` is not attached to a rule list")]
    Detached { rule: String },
}

pub struct LeftRecursionTransformer<'a> {
    tree: &'a mut GrammarTree,
    sources: &'a mut SourceMap,
    rules: &'a mut RuleTable,
    diagnostics: &'a mut Diagnostics,
    config: &'a TransformConfig,
}

impl<'a> LeftRecursionTransformer<'a> {
    pub fn new(
        tree: &'a mut GrammarTree,
        sources: &'a mut SourceMap,
        rules: &'a mut RuleTable,
        diagnostics: &'a mut Diagnostics,
        config: &'a TransformConfig,
    ) -> Self {
        Self {
            tree,
            sources,
            rules,
            diagnostics,
            config,
        }
    }

    /// Processes parser rules in grammar order.
    pub fn transform_all(mut self) -> TransformSummary {
        let names: Vec<String> = self
            .rules
            .values()
            .filter(|r| r.is_parser_rule())
            .map(|r| r.name.clone())
            .collect();

        let mut summary = TransformSummary::default();
        for name in names {
            let outcome = match self.transform_rule(&name) {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!("abandoning rewrite of `{name}`: {err}");
                    let span = self.rules[&name].name_span;
                    self.diagnostics
                        .report(DiagnosticKind::ToolError, span)
                        .message(err.to_string())
                        .emit();
                    RuleOutcome::Abandoned
                }
            };
            let flagged = self.rules[&name]
                .left_recursive
                .as_ref()
                .is_some_and(|lr| lr.flagged);
            summary.record(&name, outcome, flagged);
        }
        summary
    }

    pub fn transform_rule(&mut self, name: &str) -> Result<RuleOutcome, TransformError> {
        let rule = self.rules[name].clone();
        let alts = rule.alts(self.tree);
        if !has_immediate_left_recursion(self.tree, &rule.name, &alts) {
            return Ok(RuleOutcome::NotLeftRecursive);
        }
        let Some(shapes) = classify_alts(self.tree, &rule.name, &alts) else {
            debug!("`{name}` starts with itself but fits no operator form; left as written");
            return Ok(RuleOutcome::NotLeftRecursive);
        };

        let (table, flagged) = self.precedence_table(&rule, &alts);
        let alt_labels: Vec<Option<String>> = alts
            .iter()
            .map(|&alt| self.tree.node(alt).alt_label().map(str::to_owned))
            .collect();

        let mut infos = Vec::with_capacity(alts.len());
        let mut texts = Vec::with_capacity(alts.len());
        let mut removed_labels = Vec::new();
        let mut rewriter = AltRewriter::new(
            self.tree,
            self.sources,
            &rule.name,
            self.config.precedence_option(),
        );
        for (i, (&alt, shape)) in alts.iter().zip(&shapes).enumerate() {
            let index = i + 1;
            let precedence = table.precedence(index);
            let rewritten =
                rewriter.rewrite(alt, shape, precedence, table.next_precedence(index));

            infos.push(LeftRecursiveAltInfo {
                alt: index,
                kind: shape.kind(),
                precedence,
                next_precedence: rewritten.injected,
                assoc: table.assoc(index),
                left_label: rewritten.removed_label.as_ref().map(|l| l.text.clone()),
                is_list_label: rewritten.removed_label.as_ref().is_some_and(|l| l.is_list),
                alt_label: alt_labels[i].clone(),
                alt_text: rewritten.text.text().to_owned(),
                original_alt: alt,
                alt_ast: None,
            });
            removed_labels.extend(rewritten.removed_label);
            texts.push(rewritten.text);
        }

        let primary_order: Vec<usize> = (0..infos.len())
            .filter(|&i| !infos[i].kind.is_operator())
            .collect();
        let mut op_order = Vec::new();
        for kind in [AltKind::Binary, AltKind::Ternary, AltKind::Suffix] {
            op_order.extend((0..infos.len()).filter(|&i| infos[i].kind == kind));
        }

        let primaries: Vec<&Fragment> = primary_order.iter().map(|&i| &texts[i]).collect();
        let ops: Vec<(u32, &Fragment)> = op_order
            .iter()
            .map(|&i| (infos[i].precedence, &texts[i]))
            .collect();
        let (text, provenance) =
            synthesize_rule(self.tree, &rule, &primaries, &ops, self.config).into_parts();
        for info in &infos {
            debug!(
                "`{name}` alt {} is {}: precedence {}, next {:?}, {}",
                info.alt, info.kind, info.precedence, info.next_precedence, info.assoc
            );
        }
        debug!("`{name}` rewritten to\n{text}");

        let (new_ast, synthetic) = self.reparse(&rule, &text, &provenance)?;
        let (primary_block, op_block) = self.locate_blocks(name, new_ast)?;
        self.map_alts(name, "primary", primary_block, &primary_order, &mut infos)?;
        self.map_alts(name, "operator", op_block, &op_order, &mut infos)?;

        let rule_list = self.tree.parent(rule.ast).ok_or_else(|| TransformError::Detached {
            rule: name.to_owned(),
        })?;
        let index = self.tree.child_index(rule.ast).ok_or_else(|| TransformError::Detached {
            rule: name.to_owned(),
        })?;
        self.tree.replace_child(rule_list, index, new_ast);

        let left_recursive = LeftRecursiveRule {
            primary_alts: primary_order.iter().map(|&i| infos[i].clone()).collect(),
            op_alts: op_order
                .iter()
                .map(|&i| (infos[i].alt, infos[i].clone()))
                .collect::<IndexMap<_, _>>(),
            removed_labels,
            text,
            synthetic,
            original_ast: rule.ast,
            flagged,
        };
        if let Some(entry) = self.rules.get_mut(name) {
            entry.ast = new_ast;
            entry.left_recursive = Some(left_recursive);
        }

        self.revalidate(name);
        if primary_order.is_empty() {
            self.diagnostics
                .report(DiagnosticKind::NoNonLrAlts, rule.name_span)
                .message(name)
                .emit();
        }
        Ok(RuleOutcome::Transformed)
    }

    /// Levels and associativity; conflicting declarations are reported once per alternative.
    fn precedence_table(&mut self, rule: &Rule, alts: &[NodeId]) -> (PrecedenceTable, bool) {
        let mut table = PrecedenceTable::new(alts.len());
        let mut flagged = false;
        for (i, &alt) in alts.iter().enumerate() {
            let declared = declared_assoc(self.tree, alt);
            table.set_assoc(i + 1, declared.assoc);
            if let Some(span) = declared.conflict {
                flagged = true;
                self.diagnostics
                    .report(DiagnosticKind::ToolError, span)
                    .message(format!(
                        "alternative {} of left-recursive rule `{}` declares both left and right associativity",
                        i + 1,
                        rule.name
                    ))
                    .emit();
            }
        }
        (table, flagged)
    }

    /// Parses the generated text into the arena and points its nodes back at the user's tokens.
    fn reparse(
        &mut self,
        rule: &Rule,
        text: &str,
        provenance: &Provenance,
    ) -> Result<(NodeId, SourceId), TransformError> {
        let reparse_error = |reason: String| TransformError::Reparse {
            rule: rule.name.clone(),
            reason,
            text: text.to_owned(),
        };

        let synthetic = self.sources.add_synthesized(&rule.name, text);
        let (new_ast, diagnostics) =
            parse_rule(self.sources, synthetic, self.tree, self.config.limits())
                .map_err(|err| reparse_error(err.to_string()))?;
        if diagnostics.has_errors() {
            return Err(reparse_error(diagnostics.to_string()));
        }

        let original = self.tree.node(rule.ast).source();
        self.remap_origins(new_ast, original, provenance);
        if let Some(name) = rule.name_token {
            self.tree.set_origin(new_ast, name, rule.name_span);
        }
        Ok((new_ast, synthetic))
    }

    fn remap_origins(&mut self, root: NodeId, original: SourceId, provenance: &Provenance) {
        for id in self.tree.preorder(root) {
            let node = self.tree.node(id);
            let origin = match node
                .option(TOKEN_INDEX_OPTION_NAME)
                .and_then(OptionValue::as_int)
            {
                Some(index) => Some(TokenId::new(original, index)),
                None => node
                    .token()
                    .and_then(|t| self.sources.token_span(TokenId::new(node.source(), t)))
                    .and_then(|span| provenance.origin_at(span.range.start())),
            };
            let Some(origin) = origin else { continue };
            let Some(span) = self.sources.token_span(origin) else {
                continue;
            };
            self.tree.set_origin(id, origin, span);
        }
    }

    /// Primary block and loop block of a freshly parsed rule.
    fn locate_blocks(&self, name: &str, rule: NodeId) -> Result<(NodeId, NodeId), TransformError> {
        let tree = &*self.tree;
        let missing = |block| TransformError::MissingBlock {
            rule: name.to_owned(),
            block,
        };
        let body = tree
            .first_child_with_kind(rule, NodeKind::Block)
            .and_then(|block| tree.child(block, 0))
            .ok_or_else(|| missing("primary"))?;

        let primary = tree
            .child(body, 0)
            .filter(|&n| tree.kind(n) == NodeKind::Block)
            .ok_or_else(|| missing("primary"))?;
        let ops = tree
            .child(body, 1)
            .filter(|&n| tree.kind(n) == NodeKind::Closure)
            .and_then(|closure| tree.child(closure, 0))
            .filter(|&n| tree.kind(n) == NodeKind::Block)
            .ok_or_else(|| missing("operator"))?;
        Ok((primary, ops))
    }

    /// Attaches the i-th alternative of `block` to the i-th entry of `order`.
    fn map_alts(
        &self,
        name: &str,
        block_name: &'static str,
        block: NodeId,
        order: &[usize],
        infos: &mut [LeftRecursiveAltInfo],
    ) -> Result<(), TransformError> {
        let mut found = self.tree.children(block).to_vec();
        // an empty primary block parses as one empty alternative
        if order.is_empty()
            && let [alt] = found.as_slice()
            && self.is_empty_alt(*alt)
        {
            found.clear();
        }
        if found.len() != order.len() {
            return Err(TransformError::AltCountMismatch {
                rule: name.to_owned(),
                block: block_name,
                expected: order.len(),
                found: found.len(),
            });
        }
        for (&i, alt) in order.iter().zip(found) {
            infos[i].alt_ast = Some(alt);
        }
        Ok(())
    }

    fn is_empty_alt(&self, alt: NodeId) -> bool {
        matches!(self.tree.children(alt), [only] if self.tree.kind(*only) == NodeKind::Epsilon)
    }

    /// Option and symbol checks over the rewritten definition.
    fn revalidate(&mut self, name: &str) {
        let Some(rule) = self.rules.get(name) else {
            return;
        };
        let removed = rule
            .left_recursive
            .as_ref()
            .map(|lr| lr.removed_labels.as_slice())
            .unwrap_or_default();
        BasicChecks::new(self.tree, self.diagnostics, self.config.precedence_option())
            .without_assoc_check()
            .check_rule(rule, true);
        SymbolChecks::new(self.tree, self.rules, self.diagnostics).check_rule(rule, removed);
    }
}
