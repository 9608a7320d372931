//! Precedence levels and associativity of alternatives.
//!
//! Alternatives are numbered from 1 in source order; the first one binds
//! tightest. With `n` alternatives, alternative `i` gets level `n - i + 1`.

use super::alt_info::Assoc;
use super::classify::elements;
use crate::analyze::checks::{ASSOC_OPTION_NAME, assoc_value};
use crate::source_map::Span;
use crate::tree::{GrammarTree, NodeId, NodeKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecedenceTable {
    assoc: Vec<Assoc>,
}

impl PrecedenceTable {
    /// All alternatives left-associative.
    pub fn new(num_alts: usize) -> Self {
        Self {
            assoc: vec![Assoc::Left; num_alts],
        }
    }

    pub fn num_alts(&self) -> usize {
        self.assoc.len()
    }

    pub fn precedence(&self, alt: usize) -> u32 {
        debug_assert!((1..=self.num_alts()).contains(&alt), "alt {alt} out of range");
        (self.num_alts() - alt + 1) as u32
    }

    /// Threshold for the recursive operand on the right of `alt`.
    pub fn next_precedence(&self, alt: usize) -> u32 {
        let p = self.precedence(alt);
        match self.assoc(alt) {
            Assoc::Right => p,
            Assoc::Left => p + 1,
        }
    }

    pub fn assoc(&self, alt: usize) -> Assoc {
        self.assoc[alt - 1]
    }

    pub fn set_assoc(&mut self, alt: usize, assoc: Assoc) {
        self.assoc[alt - 1] = assoc;
    }
}

/// Associativity an alternative declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredAssoc {
    /// First declaration, or `left` when there is none.
    pub assoc: Assoc,
    /// A later declaration disagreeing with the first.
    pub conflict: Option<Span>,
}

/// Reads `assoc` from the alternative's own options and from its top-level tokens.
///
/// Unparseable values are skipped; option checks report them.
pub fn declared_assoc(tree: &GrammarTree, alt: NodeId) -> DeclaredAssoc {
    let mut sites = vec![alt];
    sites.extend(elements(tree, alt).into_iter().filter(|&e| {
        matches!(
            tree.kind(e),
            NodeKind::TokenRef | NodeKind::StringLiteral | NodeKind::Wildcard
        )
    }));

    let mut first = None;
    let mut conflict = None;
    for site in sites {
        let Some(assoc) = tree
            .node(site)
            .option(ASSOC_OPTION_NAME)
            .and_then(assoc_value)
        else {
            continue;
        };
        match first {
            None => first = Some(assoc),
            Some(declared) if declared != assoc && conflict.is_none() => {
                conflict = Some(tree.span(site));
            }
            Some(_) => {}
        }
    }

    DeclaredAssoc {
        assoc: first.unwrap_or_default(),
        conflict,
    }
}
