//! Element-option legality and `assoc` placement.

use crate::config::TOKEN_INDEX_OPTION_NAME;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::leftrec::Assoc;
use crate::tree::{GrammarTree, NodeId, NodeKind, OptionValue};

use super::rules::Rule;

pub const ASSOC_OPTION_NAME: &str = "assoc";
pub const FAIL_OPTION_NAME: &str = "fail";
pub const GREEDY_OPTION_NAME: &str = "greedy";
pub const FRAGMENT_OPTION_NAME: &str = "fragment";

pub struct BasicChecks<'a> {
    tree: &'a GrammarTree,
    diagnostics: &'a mut Diagnostics,
    precedence_option: &'a str,
    check_assoc: bool,
}

impl<'a> BasicChecks<'a> {
    pub fn new(
        tree: &'a GrammarTree,
        diagnostics: &'a mut Diagnostics,
        precedence_option: &'a str,
    ) -> Self {
        Self {
            tree,
            diagnostics,
            precedence_option,
            check_assoc: true,
        }
    }

    /// Skips the `assoc` placement check; a rewritten rule no longer looks left-recursive.
    pub fn without_assoc_check(mut self) -> Self {
        self.check_assoc = false;
        self
    }

    pub fn check_rule(&mut self, rule: &Rule, is_left_recursive: bool) {
        for node in self.tree.preorder(rule.ast) {
            self.check_options(rule, node, is_left_recursive);
        }
    }

    fn check_options(&mut self, rule: &Rule, node: NodeId, is_left_recursive: bool) {
        let tree = self.tree;
        let kind = tree.kind(node);
        let span = tree.span(node);
        for (key, value) in tree.node(node).options() {
            if !self.allows(kind, key) {
                self.diagnostics
                    .report(DiagnosticKind::IllegalOption, span)
                    .message(key)
                    .emit();
                continue;
            }
            if key != ASSOC_OPTION_NAME {
                continue;
            }
            if assoc_value(value).is_none() {
                self.diagnostics
                    .report(DiagnosticKind::IllegalOptionValue, span)
                    .message(format!("`{key}={value}`"))
                    .emit();
            } else if self.check_assoc && !is_left_recursive {
                self.diagnostics
                    .report(DiagnosticKind::UnrecognizedAssocOption, span)
                    .message(&rule.name)
                    .emit();
            }
        }
    }

    fn allows(&self, kind: NodeKind, key: &str) -> bool {
        match kind {
            NodeKind::RuleRef => key == self.precedence_option || key == TOKEN_INDEX_OPTION_NAME,
            NodeKind::TokenRef | NodeKind::StringLiteral => matches!(
                key,
                ASSOC_OPTION_NAME | TOKEN_INDEX_OPTION_NAME | FAIL_OPTION_NAME
            ),
            NodeKind::Wildcard => matches!(key, ASSOC_OPTION_NAME | TOKEN_INDEX_OPTION_NAME),
            NodeKind::SemPred => key == self.precedence_option || key == FAIL_OPTION_NAME,
            NodeKind::Alt => key == ASSOC_OPTION_NAME,
            NodeKind::Optional | NodeKind::Closure | NodeKind::PositiveClosure => {
                key == GREEDY_OPTION_NAME
            }
            NodeKind::Rule => key == FRAGMENT_OPTION_NAME,
            _ => false,
        }
    }
}

pub(crate) fn assoc_value(value: &OptionValue) -> Option<Assoc> {
    value.as_id().and_then(Assoc::parse)
}
