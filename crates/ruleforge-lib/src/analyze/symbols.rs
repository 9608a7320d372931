//! Per-rule label namespace and attribute-reference resolution.
//!
//! Labels are rule-wide: `x=ID` in one alternative and `x=ID` in another bind
//! the same name. Labels taken off a rewritten left-recursive reference are
//! passed in separately; they no longer appear in the tree but `$label` must
//! still resolve.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use rowan::{TextRange, TextSize};

use super::attributes::{AttributeDict, AttributeRef, attribute_refs};
use super::rules::{Rule, RuleKind, RuleTable};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::leftrec::RemovedLabel;
use crate::source_map::Span;
use crate::tree::{GrammarTree, NodeId, NodeKind};

/// Fields every token exposes.
pub const TOKEN_ATTRIBUTES: &[&str] = &["text", "type", "line", "index", "pos", "channel", "int"];
/// Fields every rule context exposes besides its return values.
pub const RULE_ATTRIBUTES: &[&str] = &["text", "start", "stop", "ctx"];
/// Bare attributes available inside any parser rule.
pub const PREDEFINED_RULE_ATTRIBUTES: &[&str] = &["text", "start", "stop", "ctx", "parser"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelType {
    Rule,
    RuleList,
    Token,
    TokenList,
}

impl LabelType {
    fn of(target: NodeKind, is_list: bool) -> Self {
        match (target, is_list) {
            (NodeKind::RuleRef, false) => LabelType::Rule,
            (NodeKind::RuleRef, true) => LabelType::RuleList,
            (_, false) => LabelType::Token,
            (_, true) => LabelType::TokenList,
        }
    }
}

impl fmt::Display for LabelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LabelType::Rule => "rule",
            LabelType::RuleList => "rule list",
            LabelType::Token => "token",
            LabelType::TokenList => "token list",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
struct Label {
    ty: LabelType,
    span: Span,
    /// Referenced rule, for rule labels.
    target: Option<String>,
}

pub struct SymbolChecks<'a> {
    tree: &'a GrammarTree,
    rules: &'a RuleTable,
    diagnostics: &'a mut Diagnostics,
    token_names: IndexSet<String>,
}

impl<'a> SymbolChecks<'a> {
    pub fn new(tree: &'a GrammarTree, rules: &'a RuleTable, diagnostics: &'a mut Diagnostics) -> Self {
        let mut token_names: IndexSet<String> = rules
            .values()
            .filter(|r| r.kind == RuleKind::Lexer)
            .map(|r| r.name.clone())
            .collect();
        for &root in tree.roots() {
            for node in tree.nodes_with_kind(root, &[NodeKind::TokenRef]) {
                token_names.insert(tree.text(node).to_owned());
            }
        }
        Self {
            tree,
            rules,
            diagnostics,
            token_names,
        }
    }

    pub fn check_rule(&mut self, rule: &Rule, removed_labels: &[RemovedLabel]) {
        let labels = self.collect_labels(rule, removed_labels);
        self.check_label_conflicts(rule, &labels);
        self.check_attribute_refs(rule, &labels);
    }

    fn collect_labels(&mut self, rule: &Rule, removed: &[RemovedLabel]) -> IndexMap<String, Label> {
        let tree = self.tree;
        let mut labels = IndexMap::new();

        for node in tree.nodes_with_kind(rule.ast, &[NodeKind::Assign, NodeKind::PlusAssign]) {
            let (Some(name), Some(target)) = (tree.child(node, 0), tree.child(node, 1)) else {
                continue;
            };
            let is_list = tree.kind(node) == NodeKind::PlusAssign;
            let target_kind = tree.kind(target);
            let label = Label {
                ty: LabelType::of(target_kind, is_list),
                span: tree.span(name),
                target: (target_kind == NodeKind::RuleRef).then(|| tree.text(target).to_owned()),
            };
            self.define_label(&mut labels, tree.text(name), label);
        }

        for removed in removed {
            let label = Label {
                ty: LabelType::of(NodeKind::RuleRef, removed.is_list),
                span: removed.span,
                target: Some(rule.name.clone()),
            };
            self.define_label(&mut labels, &removed.text, label);
        }
        labels
    }

    fn define_label(&mut self, labels: &mut IndexMap<String, Label>, name: &str, label: Label) {
        match labels.get(name) {
            None => {
                labels.insert(name.to_owned(), label);
            }
            Some(previous) if previous.ty != label.ty => {
                self.diagnostics
                    .report(DiagnosticKind::LabelTypeConflict, label.span)
                    .message(name)
                    .related_to("previous definition", previous.span)
                    .hint(format!("bound to a {} here, to a {} before", label.ty, previous.ty))
                    .emit();
            }
            Some(_) => {}
        }
    }

    fn check_label_conflicts(&mut self, rule: &Rule, labels: &IndexMap<String, Label>) {
        for (name, label) in labels {
            let clashes_with_rule = self
                .rules
                .get(name)
                .is_some_and(|r| r.kind == RuleKind::Parser);
            let checks = [
                (clashes_with_rule, DiagnosticKind::LabelConflictsWithRule),
                (self.token_names.contains(name), DiagnosticKind::LabelConflictsWithToken),
                (contains(&rule.args, name), DiagnosticKind::LabelConflictsWithArg),
                (contains(&rule.returns, name), DiagnosticKind::LabelConflictsWithRetval),
                (contains(&rule.locals, name), DiagnosticKind::LabelConflictsWithLocal),
            ];
            for (_, kind) in checks.into_iter().filter(|(clash, _)| *clash) {
                self.diagnostics.report(kind, label.span).message(name).emit();
            }
        }
    }

    fn check_attribute_refs(&mut self, rule: &Rule, labels: &IndexMap<String, Label>) {
        let tree = self.tree;
        let referenced: IndexSet<&str> = tree
            .nodes_with_kind(rule.ast, &[NodeKind::RuleRef, NodeKind::TokenRef])
            .into_iter()
            .map(|n| tree.text(n))
            .collect();

        for node in tree.nodes_with_kind(rule.ast, &[NodeKind::Action, NodeKind::SemPred]) {
            for r in attribute_refs(tree.text(node)) {
                let span = ref_span(tree, node, &r);
                match rule.kind {
                    RuleKind::Parser => self.resolve_in_parser_rule(rule, labels, &referenced, &r, span),
                    RuleKind::Lexer => self.resolve_in_lexer_rule(labels, &r, span),
                }
            }
        }
    }

    fn resolve_in_parser_rule(
        &mut self,
        rule: &Rule,
        labels: &IndexMap<String, Label>,
        referenced: &IndexSet<&str>,
        r: &AttributeRef<'_>,
        span: Span,
    ) {
        if let Some(label) = labels.get(r.name) {
            let Some(field) = r.field else { return };
            match (label.ty, &label.target) {
                (LabelType::Token, _) => self.check_token_field(r.name, field, span),
                (LabelType::Rule, Some(target)) => self.check_rule_field(target, r.name, field, span),
                _ => {}
            }
            return;
        }

        if r.name == rule.name {
            if let Some(field) = r.field
                && !rule_declares(rule, field)
                && !RULE_ATTRIBUTES.contains(&field)
            {
                self.report_rule_field(r.name, field, span);
            }
            return;
        }

        if rule_declares(rule, r.name) {
            return;
        }

        if referenced.contains(r.name) {
            let Some(field) = r.field else { return };
            match RuleKind::of(r.name) {
                RuleKind::Lexer => self.check_token_field(r.name, field, span),
                RuleKind::Parser => self.check_rule_field(r.name, r.name, field, span),
            }
            return;
        }

        if PREDEFINED_RULE_ATTRIBUTES.contains(&r.name) {
            return;
        }

        self.diagnostics
            .report(DiagnosticKind::UnknownSimpleAttribute, span)
            .message(r.name)
            .emit();
    }

    fn resolve_in_lexer_rule(&mut self, labels: &IndexMap<String, Label>, r: &AttributeRef<'_>, span: Span) {
        if labels.contains_key(r.name) || TOKEN_ATTRIBUTES.contains(&r.name) {
            return;
        }
        self.diagnostics
            .report(DiagnosticKind::UnknownSimpleAttribute, span)
            .message(r.name)
            .emit();
    }

    fn check_token_field(&mut self, name: &str, field: &str, span: Span) {
        if TOKEN_ATTRIBUTES.contains(&field) {
            return;
        }
        self.diagnostics
            .report(DiagnosticKind::UnknownAttributeInScope, span)
            .message(format!("{name}.{field}"))
            .emit();
    }

    /// `$x.field` where `x` stands for a call of rule `target`.
    fn check_rule_field(&mut self, target: &str, name: &str, field: &str, span: Span) {
        let Some(target_rule) = self.rules.get(target) else {
            return;
        };
        if RULE_ATTRIBUTES.contains(&field) || contains(&target_rule.returns, field) {
            return;
        }
        self.report_rule_field(name, field, span);
    }

    fn report_rule_field(&mut self, name: &str, field: &str, span: Span) {
        self.diagnostics
            .report(DiagnosticKind::UnknownRuleAttribute, span)
            .message(format!("{name}.{field}"))
            .emit();
    }
}

fn contains(dict: &Option<AttributeDict>, name: &str) -> bool {
    dict.as_ref().is_some_and(|d| d.contains(name))
}

fn rule_declares(rule: &Rule, name: &str) -> bool {
    contains(&rule.args, name) || contains(&rule.returns, name) || contains(&rule.locals, name)
}

/// Narrows an action's span to one reference inside it.
fn ref_span(tree: &GrammarTree, node: NodeId, r: &AttributeRef<'_>) -> Span {
    let span = tree.span(node);
    if usize::from(span.range.len()) != tree.text(node).len() {
        return span;
    }
    let start = span.range.start() + TextSize::from(r.offset as u32);
    Span::new(span.source, TextRange::at(start, TextSize::from(r.len as u32)))
}
