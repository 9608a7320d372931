//! Source storage for a grammar session.
//!
//! Each source keeps its content and the token stream lexed from it. Tokens
//! are addressed by [`TokenId`], which stays valid for the whole session, so
//! tree nodes built from a rewritten rule can point back at the tokens of
//! the grammar the user wrote.

use rowan::TextRange;

use crate::parser::lexer::{Token, lex};

/// Lightweight handle to a source in a session.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct SourceId(pub(crate) u32);

impl SourceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Position of a token in a specific source's token stream.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct TokenId {
    pub source: SourceId,
    pub index: u32,
}

impl TokenId {
    pub fn new(source: SourceId, index: u32) -> Self {
        Self { source, index }
    }
}

/// A text range tied to the source it belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Span {
    pub source: SourceId,
    pub range: TextRange,
}

impl Span {
    pub fn new(source: SourceId, range: TextRange) -> Self {
        Self { source, range }
    }

    pub fn cover(self, other: Span) -> Span {
        debug_assert_eq!(self.source, other.source);
        Span::new(self.source, self.range.cover(other.range))
    }
}

/// Describes the origin of a source.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SourceKind {
    /// Grammar text passed directly (CLI `-g` argument, tests).
    OneLiner,
    /// Input read from stdin.
    Stdin,
    /// A file with its path.
    File(String),
    /// Rule text produced by the left-recursion rewrite, named by its rule.
    Synthesized(String),
}

impl SourceKind {
    /// Returns the display name for diagnostics.
    pub fn display_name(&self) -> String {
        match self {
            SourceKind::OneLiner => "<grammar>".to_owned(),
            SourceKind::Stdin => "<stdin>".to_owned(),
            SourceKind::File(path) => path.clone(),
            SourceKind::Synthesized(rule) => format!("<rewritten rule `{rule}`>"),
        }
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self, SourceKind::Synthesized(_))
    }
}

/// A borrowed view of a source: id, kind, content and tokens.
#[derive(Clone, Debug)]
pub struct Source<'s> {
    pub id: SourceId,
    pub kind: &'s SourceKind,
    pub content: &'s str,
    pub tokens: &'s [Token],
}

impl<'s> Source<'s> {
    pub fn as_str(&self) -> &'s str {
        self.content
    }
}

#[derive(Clone, Debug)]
struct SourceEntry {
    kind: SourceKind,
    content: String,
    tokens: Vec<Token>,
}

/// Registry of all sources of a session.
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    entries: Vec<SourceEntry>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a one-liner source (CLI `-g` argument, tests).
    pub fn add_one_liner(&mut self, content: &str) -> SourceId {
        self.push_entry(SourceKind::OneLiner, content)
    }

    /// Add a source read from stdin.
    pub fn add_stdin(&mut self, content: &str) -> SourceId {
        self.push_entry(SourceKind::Stdin, content)
    }

    /// Add a file source with its path.
    pub fn add_file(&mut self, path: &str, content: &str) -> SourceId {
        self.push_entry(SourceKind::File(path.to_owned()), content)
    }

    /// Add the generated text of a rewritten rule.
    pub fn add_synthesized(&mut self, rule: &str, content: &str) -> SourceId {
        self.push_entry(SourceKind::Synthesized(rule.to_owned()), content)
    }

    /// Create a SourceMap with a single one-liner source.
    pub fn one_liner(content: &str) -> Self {
        let mut map = Self::new();
        map.add_one_liner(content);
        map
    }

    /// Get the content of a source by ID.
    pub fn content(&self, id: SourceId) -> &str {
        self.entry(id).content.as_str()
    }

    /// Get the kind of a source by ID.
    pub fn kind(&self, id: SourceId) -> &SourceKind {
        &self.entry(id).kind
    }

    /// Get the file path if this source is a file, None otherwise.
    pub fn path(&self, id: SourceId) -> Option<&str> {
        match &self.entry(id).kind {
            SourceKind::File(path) => Some(path),
            _ => None,
        }
    }

    /// Token stream of a source, trivia included.
    pub fn tokens(&self, id: SourceId) -> &[Token] {
        &self.entry(id).tokens
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.entries
            .get(id.source.index())?
            .tokens
            .get(id.index as usize)
    }

    pub fn token_text(&self, id: TokenId) -> Option<&str> {
        let token = self.token(id)?;
        Some(&self.content(id.source)[std::ops::Range::<usize>::from(token.span)])
    }

    pub fn token_span(&self, id: TokenId) -> Option<Span> {
        self.token(id).map(|t| Span::new(id.source, t.span))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: SourceId) -> Source<'_> {
        let entry = self.entry(id);
        Source {
            id,
            kind: &entry.kind,
            content: &entry.content,
            tokens: &entry.tokens,
        }
    }

    /// Iterate over all sources as `Source` views.
    pub fn iter(&self) -> impl Iterator<Item = Source<'_>> {
        self.entries.iter().enumerate().map(|(idx, entry)| Source {
            id: SourceId(idx as u32),
            kind: &entry.kind,
            content: &entry.content,
            tokens: &entry.tokens,
        })
    }

    fn entry(&self, id: SourceId) -> &SourceEntry {
        self.entries.get(id.index()).expect("invalid SourceId")
    }

    fn push_entry(&mut self, kind: SourceKind, content: &str) -> SourceId {
        let id = SourceId(self.entries.len() as u32);
        self.entries.push(SourceEntry {
            kind,
            content: content.to_owned(),
            tokens: lex(content),
        });
        id
    }
}

#[cfg(test)]
#[path = "source_map_tests.rs"]
mod tests;
