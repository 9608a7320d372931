//! What the rewrite records about each alternative of a left-recursive rule.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::source_map::{SourceId, Span};
use crate::tree::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Assoc {
    #[default]
    Left,
    Right,
}

impl Assoc {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(Assoc::Left),
            "right" => Some(Assoc::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Assoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assoc::Left => f.write_str("left"),
            Assoc::Right => f.write_str("right"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AltKind {
    /// `e op e`
    Binary,
    /// `e op1 e op2 e`
    Ternary,
    /// `op e`
    Prefix,
    /// `e op`
    Suffix,
    /// No self reference at either edge.
    Other,
}

impl AltKind {
    /// Operator alternatives continue an already parsed left operand.
    pub fn is_operator(self) -> bool {
        matches!(self, AltKind::Binary | AltKind::Ternary | AltKind::Suffix)
    }
}

impl fmt::Display for AltKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AltKind::Binary => "binary",
            AltKind::Ternary => "ternary",
            AltKind::Prefix => "prefix",
            AltKind::Suffix => "suffix",
            AltKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// The self reference at the left edge of an operator alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadingRef {
    /// Position of the element among the alternative's children.
    pub child_index: usize,
    /// The element itself: the reference, or the `x=` / `x+=` wrapping it.
    pub element: NodeId,
    pub rule_ref: NodeId,
}

/// Classification of one alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltShape {
    Binary(LeadingRef),
    Ternary(LeadingRef),
    Suffix(LeadingRef),
    Prefix,
    Other,
}

impl AltShape {
    pub fn kind(&self) -> AltKind {
        match self {
            AltShape::Binary(_) => AltKind::Binary,
            AltShape::Ternary(_) => AltKind::Ternary,
            AltShape::Suffix(_) => AltKind::Suffix,
            AltShape::Prefix => AltKind::Prefix,
            AltShape::Other => AltKind::Other,
        }
    }

    pub fn leading_ref(&self) -> Option<&LeadingRef> {
        match self {
            AltShape::Binary(r) | AltShape::Ternary(r) | AltShape::Suffix(r) => Some(r),
            AltShape::Prefix | AltShape::Other => None,
        }
    }
}

/// Label that was bound to a removed left operand, e.g. `l` in `l=e '+' r=e`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedLabel {
    pub text: String,
    /// Bound with `+=`.
    pub is_list: bool,
    pub span: Span,
    /// `# Name` of the alternative the label came from.
    pub alt_label: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeftRecursiveAltInfo {
    /// 1-based index among the alternatives as written.
    pub alt: usize,
    pub kind: AltKind,
    pub precedence: u32,
    /// Threshold injected into the rightmost self reference. `None` for
    /// suffix alternatives and alternatives with no trailing self reference.
    pub next_precedence: Option<u32>,
    pub assoc: Assoc,
    pub left_label: Option<String>,
    pub is_list_label: bool,
    pub alt_label: Option<String>,
    /// The alternative in the rewritten rule's notation.
    pub alt_text: String,
    #[serde(skip)]
    pub original_alt: NodeId,
    /// Node of the alternative in the rewritten rule.
    #[serde(skip)]
    pub alt_ast: Option<NodeId>,
}

/// Outcome of rewriting one rule, kept on the rule for later passes.
#[derive(Debug, Clone, Serialize)]
pub struct LeftRecursiveRule {
    pub primary_alts: Vec<LeftRecursiveAltInfo>,
    /// Keyed by original alternative index, in loop order.
    pub op_alts: IndexMap<usize, LeftRecursiveAltInfo>,
    #[serde(skip)]
    pub removed_labels: Vec<RemovedLabel>,
    /// Text of the rewritten rule.
    pub text: String,
    #[serde(skip)]
    pub synthetic: SourceId,
    #[serde(skip)]
    pub original_ast: NodeId,
    /// An alternative declared conflicting associativities.
    pub flagged: bool,
}

impl LeftRecursiveRule {
    pub fn alt_count(&self) -> usize {
        self.primary_alts.len() + self.op_alts.len()
    }

    /// All alternatives, ordered by their original index.
    pub fn alts_by_index(&self) -> Vec<&LeftRecursiveAltInfo> {
        let mut alts: Vec<_> = self.primary_alts.iter().chain(self.op_alts.values()).collect();
        alts.sort_by_key(|a| a.alt);
        alts
    }
}
