//! Left-recursion elimination.
//!
//! An immediately left-recursive rule such as
//!
//! ```text
//! e : e '*' e | e '+' e | INT ;
//! ```
//!
//! is rewritten into one block of primary alternatives followed by a loop of
//! predicate-guarded operator alternatives:
//!
//! ```text
//! e
//!     :   ( INT<tokenIndex=20>
//!         )
//!         (
//!           {precpred(_ctx, 3)}?<p=3> '*'<tokenIndex=6> e<tokenIndex=8,p=4>
//!         | {precpred(_ctx, 2)}?<p=2> '+'<tokenIndex=14> e<tokenIndex=16,p=3>
//!         )*
//!     ;
//! ```
//!
//! Stages, per rule: [`classify`] each alternative, assign levels in
//! [`precedence`], [`rewrite`] every alternative to text, [`synthesize`] the
//! new rule, then [`transform`] parses it back and splices it into the tree.
//! Once every rule is done, [`sites`] tags the remaining references.

pub mod alt_info;
pub mod classify;
pub mod fragment;
pub mod precedence;
pub mod rewrite;
pub mod sites;
pub mod synthesize;
pub mod transform;

#[cfg(test)]
mod precedence_tests;
#[cfg(test)]
mod sites_tests;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

pub use alt_info::{
    AltKind, AltShape, Assoc, LeadingRef, LeftRecursiveAltInfo, LeftRecursiveRule, RemovedLabel,
};
pub use classify::{classify_alt, classify_alts, has_immediate_left_recursion};
pub use fragment::{Fragment, Provenance};
pub use precedence::{DeclaredAssoc, PrecedenceTable, declared_assoc};
pub use rewrite::{AltRewriter, RewrittenAlt, alt_text};
pub use sites::update_call_sites;
pub use synthesize::synthesize_rule;
pub use transform::{LeftRecursionTransformer, TransformError};

/// What happened to one parser rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOutcome {
    Transformed,
    NotLeftRecursive,
    /// The rewrite failed; the rule keeps its original definition.
    Abandoned,
}

/// Result of running the transformer over a whole grammar.
///
/// The set of rewritten rules is only read once every rule has been
/// processed, by [`update_call_sites`].
#[derive(Debug, Clone, Default)]
pub struct TransformSummary {
    outcomes: IndexMap<String, RuleOutcome>,
    left_recursive: IndexSet<String>,
    flagged: IndexSet<String>,
}

impl TransformSummary {
    pub fn outcome(&self, rule: &str) -> Option<RuleOutcome> {
        self.outcomes.get(rule).copied()
    }

    pub fn outcomes(&self) -> impl Iterator<Item = (&str, RuleOutcome)> {
        self.outcomes.iter().map(|(name, &o)| (name.as_str(), o))
    }

    /// Rules that were rewritten, in grammar order.
    pub fn left_recursive_rules(&self) -> &IndexSet<String> {
        &self.left_recursive
    }

    pub fn is_left_recursive(&self, rule: &str) -> bool {
        self.left_recursive.contains(rule)
    }

    /// Rewritten rules with an associativity conflict.
    pub fn flagged(&self) -> &IndexSet<String> {
        &self.flagged
    }

    pub fn abandoned(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| **o == RuleOutcome::Abandoned)
            .map(|(name, _)| name.as_str())
    }

    pub(crate) fn record(&mut self, rule: &str, outcome: RuleOutcome, flagged: bool) {
        self.outcomes.insert(rule.to_owned(), outcome);
        if outcome == RuleOutcome::Transformed {
            self.left_recursive.insert(rule.to_owned());
        }
        if flagged {
            self.flagged.insert(rule.to_owned());
        }
    }
}
