//! Semantic analysis passes.
//!
//! - Rule collection and prequel attribute dictionaries (rules, attributes)
//! - Element-option legality (checks)
//! - Label namespace and `$attr` resolution (symbols)
//!
//! The checks run once before the left-recursion rewrite and again on every
//! rewritten rule, which is a new tree rather than a patched one.

pub mod attributes;
pub mod checks;
pub mod rules;
pub mod symbols;

#[cfg(test)]
mod attributes_tests;
#[cfg(test)]
mod checks_tests;
#[cfg(test)]
mod symbols_tests;

pub use attributes::{Attribute, AttributeDict, AttributeRef, DictKind, attribute_refs};
pub use checks::BasicChecks;
pub use rules::{Rule, RuleKind, RuleTable, body_alts, collect_rule, collect_rules};
pub use symbols::{LabelType, SymbolChecks};
