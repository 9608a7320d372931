//! Indented text dump of the grammar tree, for the CLI and tests.

use std::fmt::Write;

use super::{GrammarTree, NodeId, NodeKind, render_option};

pub struct TreePrinter<'t> {
    tree: &'t GrammarTree,
    root: Option<NodeId>,
    options: bool,
    spans: bool,
}

impl<'t> TreePrinter<'t> {
    pub fn new(tree: &'t GrammarTree) -> Self {
        Self {
            tree,
            root: None,
            options: false,
            spans: false,
        }
    }

    /// Dump only the subtree at `root` instead of every grammar root.
    pub fn root(mut self, root: NodeId) -> Self {
        self.root = Some(root);
        self
    }

    /// Show element options inline as `<k=v>` and hide the `ElementOptions` nodes.
    pub fn with_options(mut self, value: bool) -> Self {
        self.options = value;
        self
    }

    pub fn with_spans(mut self, value: bool) -> Self {
        self.spans = value;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        match self.root {
            Some(root) => self.format_node(w, root, 0),
            None => {
                for &root in self.tree.roots() {
                    self.format_node(w, root, 0)?;
                }
                Ok(())
            }
        }
    }

    fn format_node(&self, w: &mut impl Write, id: NodeId, depth: usize) -> std::fmt::Result {
        let node = self.tree.node(id);
        if self.options && node.kind() == NodeKind::ElementOptions {
            return Ok(());
        }

        write!(w, "{:indent$}{:?}", "", node.kind(), indent = depth * 2)?;
        if shows_text(node.kind()) && !node.text().is_empty() {
            write!(w, " {}", node.text())?;
        }
        if let Some(label) = node.alt_label() {
            write!(w, " #{label}")?;
        }
        if self.options && !node.options().is_empty() {
            let rendered: Vec<_> = node
                .options()
                .iter()
                .map(|(k, v)| render_option(k, v))
                .collect();
            write!(w, " <{}>", rendered.join(","))?;
        }
        if self.spans {
            let range = node.span().range;
            write!(w, " @{}..{}", u32::from(range.start()), u32::from(range.end()))?;
        }
        writeln!(w)?;

        for &child in node.children() {
            self.format_node(w, child, depth + 1)?;
        }
        Ok(())
    }
}

fn shows_text(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Grammar
            | NodeKind::Rule
            | NodeKind::Id
            | NodeKind::RuleRef
            | NodeKind::TokenRef
            | NodeKind::StringLiteral
            | NodeKind::CharSet
            | NodeKind::ArgAction
            | NodeKind::Action
            | NodeKind::SemPred
            | NodeKind::ElementOption
            | NodeKind::Int
            | NodeKind::Returns
            | NodeKind::Locals
    )
}
