//! Grammar facade: parse, then analyze and rewrite.
//!
//! ```
//! use ruleforge_lib::{GrammarBuilder, RuleOutcome};
//!
//! let grammar = GrammarBuilder::one_liner("e : e '^' e | ID ; s : e ;")
//!     .parse()
//!     .unwrap()
//!     .analyze();
//!
//! assert_eq!(grammar.summary().outcome("e"), Some(RuleOutcome::Transformed));
//! assert_eq!(grammar.summary().outcome("s"), Some(RuleOutcome::NotLeftRecursive));
//! ```

use indexmap::IndexSet;
use log::debug;

use crate::analyze::{BasicChecks, Rule, RuleTable, SymbolChecks, collect_rules};
use crate::config::TransformConfig;
use crate::leftrec::{
    LeftRecursionTransformer, TransformSummary, has_immediate_left_recursion, update_call_sites,
};
use crate::parser::parse_grammar;
use crate::source_map::SourceMap;
use crate::tree::GrammarTree;
use crate::{Diagnostics, Error, Result};

pub struct GrammarBuilder {
    sources: SourceMap,
    config: TransformConfig,
}

impl GrammarBuilder {
    pub fn new(sources: SourceMap) -> Self {
        Self {
            sources,
            config: TransformConfig::default(),
        }
    }

    /// Builder over a single inline grammar.
    pub fn one_liner(src: &str) -> Self {
        Self::new(SourceMap::one_liner(src))
    }

    pub fn with_config(mut self, config: TransformConfig) -> Self {
        self.config = config;
        self
    }

    /// Parses every user source into one tree, one root per source.
    ///
    /// Syntax errors are collected; only running out of fuel fails.
    pub fn parse(self) -> Result<ParsedGrammar> {
        let mut tree = GrammarTree::new();
        let mut diagnostics = Diagnostics::new();

        let ids: Vec<_> = self
            .sources
            .iter()
            .filter(|s| !s.kind.is_synthesized())
            .map(|s| s.id)
            .collect();
        for id in ids {
            let (root, diags) = parse_grammar(&self.sources, id, &mut tree, self.config.limits())?;
            tree.add_root(root);
            diagnostics.extend(diags);
        }

        Ok(ParsedGrammar {
            sources: self.sources,
            config: self.config,
            tree,
            diagnostics,
        })
    }
}

pub struct ParsedGrammar {
    sources: SourceMap,
    config: TransformConfig,
    tree: GrammarTree,
    diagnostics: Diagnostics,
}

impl ParsedGrammar {
    /// Collects rules, checks them, and rewrites left-recursive ones.
    ///
    /// Rewriting is skipped when the grammar has syntax errors.
    pub fn analyze(self) -> Grammar {
        let Self {
            mut sources,
            config,
            mut tree,
            mut diagnostics,
        } = self;

        let mut rules = collect_rules(&tree, &mut diagnostics);
        for rule in rules.values() {
            let is_left_recursive =
                has_immediate_left_recursion(&tree, &rule.name, &rule.alts(&tree));
            BasicChecks::new(&tree, &mut diagnostics, config.precedence_option())
                .check_rule(rule, is_left_recursive);
        }

        let summary = if diagnostics.has_errors() {
            debug!("grammar has errors; skipping left-recursion elimination");
            TransformSummary::default()
        } else {
            LeftRecursionTransformer::new(
                &mut tree,
                &mut sources,
                &mut rules,
                &mut diagnostics,
                &config,
            )
            .transform_all()
        };

        let tagged = update_call_sites(
            &mut tree,
            summary.left_recursive_rules(),
            config.precedence_option(),
        );
        debug!("tagged {tagged} references to rewritten rules");

        let mut symbols = SymbolChecks::new(&tree, &rules, &mut diagnostics);
        for rule in rules.values().filter(|r| !r.is_left_recursive()) {
            symbols.check_rule(rule, &[]);
        }

        Grammar {
            sources,
            config,
            tree,
            rules,
            summary,
            diagnostics,
        }
    }

    pub fn tree(&self) -> &GrammarTree {
        &self.tree
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.sources
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn is_valid(&self) -> bool {
        !self.diagnostics.has_errors()
    }

    pub fn into_valid(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(Error::GrammarParseError(self.diagnostics))
        }
    }
}

/// A parsed grammar with its left-recursive rules rewritten.
pub struct Grammar {
    sources: SourceMap,
    config: TransformConfig,
    tree: GrammarTree,
    rules: RuleTable,
    summary: TransformSummary,
    diagnostics: Diagnostics,
}

impl Grammar {
    pub fn tree(&self) -> &GrammarTree {
        &self.tree
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn left_recursive_rules(&self) -> &IndexSet<String> {
        self.summary.left_recursive_rules()
    }

    pub fn summary(&self) -> &TransformSummary {
        &self.summary
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn is_valid(&self) -> bool {
        !self.diagnostics.has_errors()
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.sources
    }

    /// Generated text of a rewritten rule.
    pub fn rule_text(&self, name: &str) -> Option<&str> {
        let lr = self.rules.get(name)?.left_recursive.as_ref()?;
        Some(lr.text.as_str())
    }

    pub fn into_valid(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(Error::GrammarAnalyzeError(self.diagnostics))
        }
    }
}
