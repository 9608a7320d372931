//! Generated grammar text that remembers where its tokens came from.
//!
//! Every token copied out of the user's grammar is recorded with its
//! [`TokenId`], so nodes parsed back from the generated text can point at
//! the original positions.

use rowan::{TextRange, TextSize};

use crate::source_map::TokenId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    /// Sorted by range start.
    entries: Vec<(TextRange, TokenId)>,
}

impl Provenance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(TextRange, TokenId)> {
        self.entries.iter()
    }

    /// Original token of the generated token starting at `offset`.
    pub fn origin_at(&self, offset: TextSize) -> Option<TokenId> {
        self.entries
            .binary_search_by_key(&offset, |(range, _)| range.start())
            .ok()
            .map(|i| self.entries[i].1)
    }

    fn record(&mut self, range: TextRange, origin: TokenId) {
        self.entries.push((range, origin));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    text: String,
    provenance: Provenance,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    pub fn into_parts(self) -> (String, Provenance) {
        (self.text, self.provenance)
    }

    fn end(&self) -> TextSize {
        TextSize::of(self.text.as_str())
    }

    /// Appends generated text with no origin.
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Appends a token's text, recording where it came from.
    pub fn push_token(&mut self, text: &str, origin: Option<TokenId>) {
        if let Some(origin) = origin {
            let range = TextRange::at(self.end(), TextSize::of(text));
            self.provenance.record(range, origin);
        }
        self.text.push_str(text);
    }

    pub fn push_fragment(&mut self, other: &Fragment) {
        let offset = self.end();
        for &(range, origin) in other.provenance.iter() {
            self.provenance.record(range + offset, origin);
        }
        self.text.push_str(&other.text);
    }

    /// Drops surrounding whitespace, keeping recorded ranges aligned.
    pub fn trimmed(self) -> Self {
        let lead = TextSize::of(self.text.as_str()) - TextSize::of(self.text.trim_start());
        let text = self.text.trim().to_owned();
        let entries = self
            .provenance
            .entries
            .into_iter()
            .map(|(range, origin)| (range - lead, origin))
            .collect();
        Self {
            text,
            provenance: Provenance { entries },
        }
    }
}
