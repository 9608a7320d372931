//! Parser infrastructure for the grammar notation.
//!
//! # Architecture
//!
//! The lexer runs when a source is added to the [`SourceMap`]; the parser
//! walks that token stream and builds nodes straight into a [`GrammarTree`].
//! Trivia is skipped by the parser but stays in the token stream, and every
//! node records the token range it covers.
//!
//! # Recovery Strategy
//!
//! The parser is resilient: it always produces a tree. Recovery follows these rules:
//!
//! - Unknown tokens inside an alternative are reported and skipped
//! - A missing `;` does not swallow the next rule: a name followed by `:` starts a new rule
//! - Unclosed blocks and option lists report the opening position
//!
//! # Module Organization
//!
//! - `syntax_kind`: token kinds and `TokenSet`
//! - `lexer`: splits source into tokens
//! - `core`: parser state machine and low-level operations
//! - `grammar`: productions for grammars, rules, alternatives and elements

mod core;
mod grammar;
pub mod lexer;
mod syntax_kind;


pub use lexer::{Token, lex, token_text};
pub use syntax_kind::{SyntaxKind, TokenSet, token_sets};

use crate::PassResult;
use crate::config::ParseLimits;
use crate::source_map::{SourceId, SourceMap};
use crate::tree::{GrammarTree, NodeId};

use self::core::Parser;

/// Parses a whole grammar source into `tree`; returns the `Grammar` node.
///
/// The root is not registered with the tree; the caller decides whether it is a grammar root.
pub fn parse_grammar(
    sources: &SourceMap,
    source: SourceId,
    tree: &mut GrammarTree,
    limits: ParseLimits,
) -> PassResult<NodeId> {
    let mut parser = Parser::new(sources, source, tree).with_limits(limits);
    let root = parser.parse_grammar();
    let diagnostics = parser.finish()?;
    Ok((root, diagnostics))
}

/// Parses a source holding exactly one rule definition; returns the `Rule` node.
///
/// Used to read back the text synthesized for a left-recursive rule.
pub fn parse_rule(
    sources: &SourceMap,
    source: SourceId,
    tree: &mut GrammarTree,
    limits: ParseLimits,
) -> PassResult<NodeId> {
    let mut parser = Parser::new(sources, source, tree).with_limits(limits);
    let rule = parser.parse_single_rule();
    let diagnostics = parser.finish()?;
    Ok((rule, diagnostics))
}
