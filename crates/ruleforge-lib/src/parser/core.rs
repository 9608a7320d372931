//! Parser state machine and low-level operations.

use rowan::{TextRange, TextSize};

use super::lexer::{Token, token_text};
use super::syntax_kind::{SyntaxKind, TokenSet};
use crate::Error;
use crate::config::ParseLimits;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::source_map::{SourceId, SourceMap, Span};
use crate::tree::{GrammarTree, NodeId, NodeKind};

/// Trivia is skipped, never attached: nodes only record token index ranges.
pub struct Parser<'a> {
    pub(super) source_id: SourceId,
    pub(super) source: &'a str,
    pub(super) tokens: &'a [Token],
    pub(super) pos: usize,
    pub(super) tree: &'a mut GrammarTree,
    pub(super) diagnostics: Diagnostics,
    pub(super) depth: u32,
    last_consumed: Option<usize>,
    last_diagnostic_pos: Option<TextSize>,
    exec_fuel_remaining: Option<u32>,
    recursion_fuel_limit: Option<u32>,
    fatal_error: Option<Error>,
}

impl<'a> Parser<'a> {
    pub fn new(sources: &'a SourceMap, source_id: SourceId, tree: &'a mut GrammarTree) -> Self {
        Self {
            source_id,
            source: sources.content(source_id),
            tokens: sources.tokens(source_id),
            pos: 0,
            tree,
            diagnostics: Diagnostics::new(),
            depth: 0,
            last_consumed: None,
            last_diagnostic_pos: None,
            exec_fuel_remaining: None,
            recursion_fuel_limit: None,
            fatal_error: None,
        }
    }

    pub fn with_limits(mut self, limits: ParseLimits) -> Self {
        self.exec_fuel_remaining = limits.exec_fuel;
        self.recursion_fuel_limit = limits.recursion_fuel;
        self
    }

    pub fn finish(self) -> Result<Diagnostics, Error> {
        if let Some(err) = self.fatal_error {
            return Err(err);
        }
        Ok(self.diagnostics)
    }

    pub(super) fn has_fatal_error(&self) -> bool {
        self.fatal_error.is_some()
    }

    fn skip_trivia(&mut self) {
        while self.pos < self.tokens.len() && self.tokens[self.pos].kind.is_trivia() {
            self.pos += 1;
        }
    }

    pub(super) fn current(&mut self) -> SyntaxKind {
        self.skip_trivia();
        self.tokens
            .get(self.pos)
            .map_or(SyntaxKind::Error, |t| t.kind)
    }

    /// Kind of the token right after the last consumed one, trivia not skipped.
    pub(super) fn raw_current(&self) -> SyntaxKind {
        self.tokens
            .get(self.pos)
            .map_or(SyntaxKind::Error, |t| t.kind)
    }

    /// LL(k) lookahead past trivia.
    pub(super) fn nth(&mut self, n: usize) -> SyntaxKind {
        self.skip_trivia();
        let mut count = 0;
        let mut pos = self.pos;
        while pos < self.tokens.len() {
            let kind = self.tokens[pos].kind;
            if !kind.is_trivia() {
                if count == n {
                    return kind;
                }
                count += 1;
            }
            pos += 1;
        }
        SyntaxKind::Error
    }

    pub(super) fn current_span(&mut self) -> TextRange {
        self.skip_trivia();
        self.tokens
            .get(self.pos)
            .map_or_else(|| TextRange::empty(self.eof_offset()), |t| t.span)
    }

    pub(super) fn current_text(&mut self) -> &'a str {
        self.skip_trivia();
        let source = self.source;
        self.tokens
            .get(self.pos)
            .map_or("", |t| token_text(source, t))
    }

    pub(super) fn eof_offset(&self) -> TextSize {
        TextSize::from(self.source.len() as u32)
    }

    pub(super) fn eof(&mut self) -> bool {
        self.skip_trivia();
        self.pos >= self.tokens.len()
    }

    pub(super) fn should_stop(&mut self) -> bool {
        self.eof() || self.has_fatal_error()
    }

    pub(super) fn at(&mut self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(super) fn at_any(&mut self, set: TokenSet) -> bool {
        set.contains(self.current())
    }

    /// Index of the next non-trivia token; marks where a node starts.
    pub(super) fn mark(&mut self) -> usize {
        self.skip_trivia();
        self.pos
    }

    fn consume_exec_fuel(&mut self) {
        if let Some(ref mut remaining) = self.exec_fuel_remaining {
            if *remaining == 0 {
                if self.fatal_error.is_none() {
                    self.fatal_error = Some(Error::ExecFuelExhausted);
                }
                return;
            }
            *remaining -= 1;
        }
    }

    /// Consumes the current non-trivia token and returns its index.
    pub(super) fn bump(&mut self) -> u32 {
        self.skip_trivia();
        assert!(self.pos < self.tokens.len(), "bump called at EOF");
        self.consume_exec_fuel();
        let index = self.pos;
        self.pos += 1;
        self.last_consumed = Some(index);
        index as u32
    }

    /// Consumes the token right after the last consumed one, trivia not skipped.
    pub(super) fn bump_raw(&mut self) -> u32 {
        assert!(self.pos < self.tokens.len(), "bump_raw called at EOF");
        self.consume_exec_fuel();
        let index = self.pos;
        self.pos += 1;
        self.last_consumed = Some(index);
        index as u32
    }

    pub(super) fn eat(&mut self, kind: SyntaxKind) -> Option<u32> {
        if self.at(kind) {
            Some(self.bump())
        } else {
            None
        }
    }

    /// On mismatch: emit diagnostic but don't consume.
    pub(super) fn expect(&mut self, kind: SyntaxKind, diagnostic: DiagnosticKind) -> Option<u32> {
        if let Some(index) = self.eat(kind) {
            return Some(index);
        }
        self.error(diagnostic);
        None
    }

    pub(super) fn token_span(&self, index: u32) -> Span {
        Span::new(self.source_id, self.tokens[index as usize].span)
    }

    pub(super) fn token_str(&self, index: u32) -> &'a str {
        token_text(self.source, &self.tokens[index as usize])
    }

    pub(super) fn span(&self, range: TextRange) -> Span {
        Span::new(self.source_id, range)
    }

    /// Allocates a node built from one consumed token.
    pub(super) fn token_node(&mut self, kind: NodeKind, token: u32) -> NodeId {
        let span = self.token_span(token);
        let text = self.token_str(token);
        self.tree.alloc(kind, span, Some(token), text)
    }

    /// Consumes the current token as a node of `kind`.
    pub(super) fn leaf(&mut self, kind: NodeKind) -> NodeId {
        let token = self.bump();
        self.token_node(kind, token)
    }

    /// Allocates a node without a token of its own; [`Parser::finish_node`] sets its range.
    pub(super) fn start_node(&mut self, kind: NodeKind) -> NodeId {
        let at = self.current_span();
        let span = self.span(TextRange::empty(at.start()));
        self.tree.alloc(kind, span, None, "")
    }

    /// Records the tokens consumed since `start` as the node's range.
    ///
    /// Nodes without their own token also take the covered text as their span.
    pub(super) fn finish_node(&mut self, id: NodeId, start: usize) {
        let Some(stop) = self.last_consumed.filter(|&stop| stop >= start) else {
            return;
        };
        self.tree.set_tokens(id, Some((start as u32, stop as u32)));
        if self.tree.node(id).token().is_none() {
            let range = TextRange::new(
                self.tokens[start].span.start(),
                self.tokens[stop].span.end(),
            );
            self.tree.set_span(id, self.span(range));
        }
    }

    fn should_report(&mut self, pos: TextSize) -> bool {
        if self.last_diagnostic_pos == Some(pos) {
            return false;
        }
        self.last_diagnostic_pos = Some(pos);
        true
    }

    pub(super) fn error(&mut self, kind: DiagnosticKind) {
        let range = self.current_span();
        if !self.should_report(range.start()) {
            return;
        }
        let span = self.span(range);
        self.diagnostics.report(kind, span).emit();
    }

    pub(super) fn error_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let range = self.current_span();
        if !self.should_report(range.start()) {
            return;
        }
        let span = self.span(range);
        self.diagnostics.report(kind, span).message(message).emit();
    }

    pub(super) fn error_and_bump(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.error_msg(kind, message);
        if !self.eof() {
            self.bump();
        }
    }

    /// Reports, then skips tokens until one in `recovery` (not consumed).
    pub(super) fn error_recover(&mut self, kind: DiagnosticKind, recovery: TokenSet) {
        self.error(kind);
        while !self.at_any(recovery) && !self.should_stop() {
            self.bump();
        }
    }

    pub(super) fn enter_recursion(&mut self) -> bool {
        if let Some(limit) = self.recursion_fuel_limit
            && self.depth >= limit
        {
            if self.fatal_error.is_none() {
                self.fatal_error = Some(Error::RecursionLimitExceeded);
            }
            return false;
        }
        self.depth += 1;
        true
    }

    pub(super) fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(super) fn error_unclosed_delimiter(
        &mut self,
        kind: DiagnosticKind,
        related_msg: impl Into<String>,
        open_range: TextRange,
    ) {
        let current = self.current_span();
        if !self.should_report(current.start()) {
            return;
        }
        // Use full range for easier downstream error suppression
        let full_range = TextRange::new(open_range.start(), current.end());
        let span = self.span(full_range);
        let open = self.span(open_range);
        self.diagnostics
            .report(kind, span)
            .related_to(related_msg, open)
            .emit();
    }
}
