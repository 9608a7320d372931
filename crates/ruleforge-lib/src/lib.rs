//! Ruleforge: left-recursion elimination for ANTLR-style grammars.
//!
//! Immediately left-recursive parser rules are rewritten into the
//! precedence-climbing form: one block of primary alternatives followed by a
//! looping block of predicate-guarded operator alternatives. Every other
//! reference to a rewritten rule is tagged with precedence `0`.
//!
//! The pipeline:
//! - `parser` - lexer and recursive-descent grammar parser into an arena tree
//! - `tree` - the arena grammar tree and its printer
//! - `analyze` - rule collection, option checks, symbol and attribute checks
//! - `leftrec` - alt classification, precedence, rewriting, rule synthesis, call sites
//! - `diagnostics` - error reporting
//! - `grammar` - high-level `Grammar` facade
//!
//! # Example
//!
//! ```
//! use ruleforge_lib::GrammarBuilder;
//!
//! let grammar = GrammarBuilder::one_liner("e : e '*' e | e '+' e | INT ;")
//!     .parse()
//!     .expect("out of fuel")
//!     .analyze();
//!
//! assert!(grammar.is_valid());
//! assert!(grammar.left_recursive_rules().contains("e"));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analyze;
pub mod config;
pub mod diagnostics;
pub mod grammar;
pub mod leftrec;
pub mod parser;
pub mod source_map;
pub mod tree;

#[cfg(test)]
mod grammar_tests;

/// Result type for analysis passes that produce both output and diagnostics.
///
/// Each pass returns its typed output alongside any diagnostics it collected.
/// Fatal errors (like fuel exhaustion) use the outer `Result`.
pub type PassResult<T> = std::result::Result<(T, Diagnostics), Error>;

pub use config::TransformConfig;
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use grammar::{Grammar, GrammarBuilder, ParsedGrammar};
pub use leftrec::{RuleOutcome, TransformSummary};
pub use source_map::{SourceId, SourceKind, SourceMap, Span, TokenId};

/// Errors that can occur while parsing or analyzing a grammar.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Execution fuel exhausted (too many parser operations).
    #[error("execution limit exceeded")]
    ExecFuelExhausted,

    /// Recursion fuel exhausted (input nested too deeply).
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    #[error("grammar parsing failed with {} errors", .0.error_count())]
    GrammarParseError(Diagnostics),

    #[error("grammar analysis failed with {} errors", .0.error_count())]
    GrammarAnalyzeError(Diagnostics),
}

/// Result type for grammar operations.
pub type Result<T> = std::result::Result<T, Error>;
