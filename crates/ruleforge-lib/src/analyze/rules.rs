//! Rule table: one entry per rule definition, in grammar order.

use indexmap::IndexMap;

use super::attributes::{AttributeDict, DictKind};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::leftrec::LeftRecursiveRule;
use crate::source_map::{Span, TokenId};
use crate::tree::{GrammarTree, NodeId, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Parser,
    Lexer,
}

impl RuleKind {
    /// Lexer rule names start with an uppercase letter.
    pub fn of(name: &str) -> Self {
        match name.chars().next() {
            Some(c) if c.is_uppercase() => RuleKind::Lexer,
            _ => RuleKind::Parser,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub kind: RuleKind,
    /// Current definition; replaced when the rule is rewritten.
    pub ast: NodeId,
    pub name_token: Option<TokenId>,
    pub name_span: Span,
    /// Alternatives of the definition as written.
    pub num_alts: usize,
    pub args: Option<AttributeDict>,
    pub returns: Option<AttributeDict>,
    pub locals: Option<AttributeDict>,
    /// Set once the rule has been rewritten.
    pub left_recursive: Option<LeftRecursiveRule>,
}

impl Rule {
    pub fn is_parser_rule(&self) -> bool {
        self.kind == RuleKind::Parser
    }

    pub fn is_left_recursive(&self) -> bool {
        self.left_recursive.is_some()
    }

    /// Top-level alternatives of the current definition.
    pub fn alts(&self, tree: &GrammarTree) -> Vec<NodeId> {
        body_alts(tree, self.ast)
    }

    pub fn dict(&self, kind: DictKind) -> Option<&AttributeDict> {
        match kind {
            DictKind::Args => self.args.as_ref(),
            DictKind::Returns => self.returns.as_ref(),
            DictKind::Locals => self.locals.as_ref(),
        }
    }
}

pub type RuleTable = IndexMap<String, Rule>;

/// Alternatives of a rule node's body block.
pub fn body_alts(tree: &GrammarTree, rule: NodeId) -> Vec<NodeId> {
    tree.first_child_with_kind(rule, NodeKind::Block)
        .map(|block| tree.children(block).to_vec())
        .unwrap_or_default()
}

/// Collects every rule under the grammar roots.
///
/// A redefinition is reported and ignored; the first definition wins.
pub fn collect_rules(tree: &GrammarTree, diagnostics: &mut Diagnostics) -> RuleTable {
    let mut rules = RuleTable::new();
    for &root in tree.roots() {
        let Some(list) = tree.first_child_with_kind(root, NodeKind::Rules) else {
            continue;
        };
        for &node in tree.children(list) {
            let Some(rule) = collect_rule(tree, node) else {
                continue;
            };
            if let Some(previous) = rules.get(&rule.name) {
                diagnostics
                    .report(DiagnosticKind::DuplicateRule, rule.name_span)
                    .message(&rule.name)
                    .related_to("first defined here", previous.name_span)
                    .emit();
                continue;
            }
            rules.insert(rule.name.clone(), rule);
        }
    }
    rules
}

/// Reads one `Rule` node; `None` when the definition has no name.
pub fn collect_rule(tree: &GrammarTree, node: NodeId) -> Option<Rule> {
    let name = tree.text(node);
    if name.is_empty() {
        return None;
    }

    let dict = |kind: NodeKind, dict_kind: DictKind| {
        tree.first_child_with_kind(node, kind)
            .map(|n| AttributeDict::parse(dict_kind, tree.text(n)))
    };

    Some(Rule {
        name: name.to_owned(),
        kind: RuleKind::of(name),
        ast: node,
        name_token: tree.node(node).origin(),
        name_span: tree.span(node),
        num_alts: body_alts(tree, node).len(),
        args: dict(NodeKind::ArgAction, DictKind::Args),
        returns: dict(NodeKind::Returns, DictKind::Returns),
        locals: dict(NodeKind::Locals, DictKind::Locals),
        left_recursive: None,
    })
}
