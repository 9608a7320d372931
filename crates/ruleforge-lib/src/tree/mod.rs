//! Arena-allocated grammar tree.
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`]. Every node
//! knows its parent, so a rule subtree can be swapped for another one in
//! place: the parent's child list is patched and the old subtree becomes
//! detached (it stays in the arena and remains readable).
//!
//! A node records the token it was built from (`token`) and the inclusive
//! range of tokens it covers (`tokens`), both as indices into its source's
//! token stream. `origin` points at the token the node stands for in the
//! grammar the user wrote, when that differs from `token`.

mod printer;

#[cfg(test)]
mod tree_tests;

use indexmap::IndexMap;

pub use printer::TreePrinter;

use crate::source_map::{SourceId, Span, TokenId};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Node vocabulary of the grammar tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Grammar file; text is the declared grammar name, if any.
    Grammar,
    /// Ordered list of rule definitions.
    Rules,
    /// Rule definition; text is the rule name.
    Rule,
    /// Plain identifier: rule name, label, option value, lexer command.
    Id,
    /// Alternatives of a rule body or a parenthesized subrule.
    Block,
    /// One alternative.
    Alt,
    /// `x=element`
    Assign,
    /// `x+=element`
    PlusAssign,
    RuleRef,
    TokenRef,
    StringLiteral,
    Wildcard,
    /// `'a'..'z'`
    Range,
    /// `~set`
    Not,
    /// Lexer char set `[a-z]`.
    CharSet,
    /// Rule arguments `e[3]` or declared parameters `e[int x]`.
    ArgAction,
    Action,
    /// `{...}?`
    SemPred,
    Optional,
    Closure,
    PositiveClosure,
    /// `<k=v, ...>` following an element or opening an alternative.
    ElementOptions,
    /// One `k=v` entry; text is the option name.
    ElementOption,
    Int,
    Returns,
    Locals,
    /// `-> skip, channel(HIDDEN)`
    LexerCommands,
    /// Empty alternative.
    Epsilon,
}

impl NodeKind {
    /// Elements that may carry `<...>` options in the notation.
    pub fn accepts_element_options(self) -> bool {
        matches!(
            self,
            NodeKind::RuleRef
                | NodeKind::TokenRef
                | NodeKind::StringLiteral
                | NodeKind::Wildcard
                | NodeKind::SemPred
        )
    }

    /// Elements whose source position is recorded with a `tokenIndex` option
    /// when an alternative is serialized.
    pub fn records_token_index(self) -> bool {
        matches!(
            self,
            NodeKind::RuleRef | NodeKind::TokenRef | NodeKind::StringLiteral
        )
    }

    pub fn is_label(self) -> bool {
        matches!(self, NodeKind::Assign | NodeKind::PlusAssign)
    }

    /// Elements that match no input.
    pub fn is_epsilon(self) -> bool {
        matches!(self, NodeKind::Action | NodeKind::SemPred | NodeKind::Epsilon)
    }
}

/// Value of an element option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Id(String),
    Int(u32),
    /// Quoted literal, quotes included.
    Str(String),
    /// Option given without a value.
    Flag,
}

impl OptionValue {
    pub fn as_id(&self) -> Option<&str> {
        match self {
            OptionValue::Id(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<u32> {
        match self {
            OptionValue::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionValue::Id(s) | OptionValue::Str(s) => f.write_str(s),
            OptionValue::Int(n) => write!(f, "{n}"),
            OptionValue::Flag => Ok(()),
        }
    }
}

/// Renders `k=v` (or `k` for flags), the way options are written in the notation.
pub fn render_option(key: &str, value: &OptionValue) -> String {
    match value {
        OptionValue::Flag => key.to_owned(),
        value => format!("{key}={value}"),
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    source: SourceId,
    token: Option<u32>,
    tokens: Option<(u32, u32)>,
    span: Span,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    options: IndexMap<String, OptionValue>,
    alt_label: Option<String>,
    origin: Option<TokenId>,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    /// Index of the token this node was built from.
    pub fn token(&self) -> Option<u32> {
        self.token
    }

    /// Inclusive token index range covered by this node, `None` when empty.
    pub fn tokens(&self) -> Option<(u32, u32)> {
        self.tokens
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn options(&self) -> &IndexMap<String, OptionValue> {
        &self.options
    }

    pub fn option(&self, key: &str) -> Option<&OptionValue> {
        self.options.get(key)
    }

    /// Label of an alternative: `# Name`.
    pub fn alt_label(&self) -> Option<&str> {
        self.alt_label.as_deref()
    }

    /// Token in the user's grammar this node stands for.
    pub fn origin(&self) -> Option<TokenId> {
        self.origin
            .or_else(|| self.token.map(|index| TokenId::new(self.source, index)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct GrammarTree {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl GrammarTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Grammar roots, one per parsed source.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn add_root(&mut self, root: NodeId) {
        self.roots.push(root);
    }

    pub fn alloc(
        &mut self,
        kind: NodeKind,
        span: Span,
        token: Option<u32>,
        text: impl Into<String>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            source: span.source,
            token,
            tokens: token.map(|t| (t, t)),
            span,
            text: text.into(),
            parent: None,
            children: Vec::new(),
            options: IndexMap::new(),
            alt_label: None,
            origin: None,
        });
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn text(&self, id: NodeId) -> &str {
        &self.node(id).text
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.node(id).children.get(index).copied()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Position of `id` in its parent's child list.
    pub fn child_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    pub fn first_child_with_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| self.kind(c) == kind)
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.insert(index, child);
    }

    /// Detaches and returns the child at `index`.
    pub fn remove_child(&mut self, parent: NodeId, index: usize) -> NodeId {
        let child = self.node_mut(parent).children.remove(index);
        self.node_mut(child).parent = None;
        child
    }

    /// Puts `new` where the child at `index` was; returns the detached old child.
    pub fn replace_child(&mut self, parent: NodeId, index: usize, new: NodeId) -> NodeId {
        let old = std::mem::replace(&mut self.node_mut(parent).children[index], new);
        self.node_mut(old).parent = None;
        self.node_mut(new).parent = Some(parent);
        old
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.node_mut(id).text = text.into();
    }

    pub fn set_token(&mut self, id: NodeId, token: u32, span: Span) {
        let node = self.node_mut(id);
        node.token = Some(token);
        node.span = span;
    }

    pub fn set_tokens(&mut self, id: NodeId, tokens: Option<(u32, u32)>) {
        self.node_mut(id).tokens = tokens;
    }

    pub fn set_span(&mut self, id: NodeId, span: Span) {
        self.node_mut(id).span = span;
    }

    pub fn set_option(&mut self, id: NodeId, key: impl Into<String>, value: OptionValue) {
        self.node_mut(id).options.insert(key.into(), value);
    }

    pub fn set_alt_label(&mut self, id: NodeId, label: Option<String>) {
        self.node_mut(id).alt_label = label;
    }

    /// Points the node at a token of another source, taking over its span.
    pub fn set_origin(&mut self, id: NodeId, origin: TokenId, span: Span) {
        let node = self.node_mut(id);
        node.origin = Some(origin);
        node.span = span;
    }

    /// Nodes of the subtree rooted at `id`, in preorder.
    pub fn preorder(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Preorder nodes of the subtree whose kind is one of `kinds`.
    pub fn nodes_with_kind(&self, id: NodeId, kinds: &[NodeKind]) -> Vec<NodeId> {
        self.preorder(id)
            .into_iter()
            .filter(|&n| kinds.contains(&self.kind(n)))
            .collect()
    }

    /// Node of the subtree built from token `index` of its source.
    pub fn node_with_token_index(&self, id: NodeId, index: u32) -> Option<NodeId> {
        self.preorder(id)
            .into_iter()
            .find(|&n| self.node(n).token == Some(index))
    }

    /// Deep copy of a subtree. The copy is detached and shares the tokens of the original.
    pub fn dup_subtree(&mut self, id: NodeId) -> NodeId {
        let mut copy = self.node(id).clone();
        copy.parent = None;
        copy.children = Vec::new();
        let new_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(copy);

        let children = self.children(id).to_vec();
        for child in children {
            let child_copy = self.dup_subtree(child);
            self.add_child(new_id, child_copy);
        }
        new_id
    }

    pub fn dump(&self) -> String {
        TreePrinter::new(self).dump()
    }
}
