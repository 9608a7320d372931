//! Token kinds for the grammar notation.
//!
//! Logos derives token recognition. Actions `{...}` and bracketed argument
//! lists `[...]` nest, so they are scanned by callbacks instead of regexes.

use logos::Logos;

/// All token kinds, followed by the `__LAST` sentinel.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("(")]
    ParenOpen = 0,

    #[token(")")]
    ParenClose,

    #[token("<")]
    AngleOpen,

    #[token(">")]
    AngleClose,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token("|")]
    Pipe,

    #[token("=")]
    Equals,

    #[token("+=")]
    PlusEquals,

    /// Alternative label marker: `# Name`
    #[token("#")]
    Pound,

    #[token(",")]
    Comma,

    #[token("?")]
    Question,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    /// Non-greedy `??` suffix
    #[token("??")]
    QuestionQuestion,

    /// Non-greedy `*?` suffix
    #[token("*?")]
    StarQuestion,

    /// Non-greedy `+?` suffix
    #[token("+?")]
    PlusQuestion,

    #[token("~")]
    Tilde,

    /// Character range in lexer rules: `'a'..'z'`
    #[token("..")]
    DotDot,

    /// Wildcard
    #[token(".")]
    Dot,

    /// Lexer command arrow: `-> skip`
    #[token("->")]
    Arrow,

    #[regex(r"'(?:[^'\\\n]|\\.)*'")]
    StringLiteral,

    #[regex(r"[0-9]+")]
    Int,

    /// Embedded action `{...}`; a directly following `?` makes it a predicate.
    #[token("{", lex_action)]
    Action,

    /// Argument, return or local declarations `[...]`, or a lexer char set.
    #[token("[", lex_bracket)]
    BracketAction,

    #[token("grammar")]
    KwGrammar,

    #[token("parser")]
    KwParser,

    #[token("lexer")]
    KwLexer,

    #[token("fragment")]
    KwFragment,

    #[token("returns")]
    KwReturns,

    #[token("locals")]
    KwLocals,

    /// Parser rule name: starts lowercase.
    #[regex(r"[a-z][a-zA-Z0-9_]*")]
    RuleRefId,

    /// Token or lexer rule name: starts uppercase.
    #[regex(r"[A-Z][a-zA-Z0-9_]*")]
    TokenRefId,

    #[regex(r"[ \t]+")]
    Whitespace,

    #[token("\n")]
    #[token("\r\n")]
    Newline,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*(?:[^*]|\*[^/])*\*/")]
    BlockComment,

    /// Consecutive unrecognized characters coalesced into one token.
    Garbage,
    /// Lookahead past the end of input.
    Error,

    // Must be last - used for bounds checking
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Newline | LineComment | BlockComment)
    }

    /// Identifier tokens, keywords included.
    #[inline]
    pub fn is_identifier(self) -> bool {
        matches!(
            self,
            RuleRefId
                | TokenRefId
                | KwGrammar
                | KwParser
                | KwLexer
                | KwFragment
                | KwReturns
                | KwLocals
        )
    }
}

/// Scans a balanced `{...}` body. Quoted strings and escapes may contain braces.
fn lex_action(lex: &mut logos::Lexer<'_, SyntaxKind>) -> bool {
    match balanced_len(lex.remainder(), '{', '}') {
        Some(len) => {
            lex.bump(len);
            true
        }
        None => false,
    }
}

/// Scans a balanced `[...]` body.
fn lex_bracket(lex: &mut logos::Lexer<'_, SyntaxKind>) -> bool {
    match balanced_len(lex.remainder(), '[', ']') {
        Some(len) => {
            lex.bump(len);
            true
        }
        None => false,
    }
}

/// Length of the text up to and including the delimiter closing an already opened one.
fn balanced_len(rest: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 1usize;
    let mut chars = rest.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' | '\'' if open == '{' => {
                // Unterminated quotes fall through to the closing brace search.
                let mut lookahead = chars.clone();
                let mut closed = false;
                while let Some((_, q)) = lookahead.next() {
                    if q == '\\' {
                        lookahead.next();
                    } else if q == c {
                        closed = true;
                        break;
                    } else if q == '\n' {
                        break;
                    }
                }
                if closed {
                    chars = lookahead;
                }
            }
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

/// 64-bit bitset of `SyntaxKind`s for O(1) membership testing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TokenSet(u64);

impl TokenSet {
    /// Creates an empty token set.
    pub const EMPTY: TokenSet = TokenSet(0);

    /// Panics at compile time if any kind's discriminant >= 64.
    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 64, "SyntaxKind value exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        if kind >= 64 {
            return false;
        }
        self.0 & (1 << kind) != 0
    }

    #[inline]
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }
}

/// Pre-defined token sets for the parser.
pub mod token_sets {
    use super::*;

    /// FIRST set of an element, label included.
    pub const ELEMENT_FIRST: TokenSet = TokenSet::new(&[
        RuleRefId,
        TokenRefId,
        StringLiteral,
        Dot,
        Tilde,
        ParenOpen,
        Action,
        BracketAction,
    ]);

    pub const SUFFIXES: TokenSet = TokenSet::new(&[
        Question,
        Star,
        Plus,
        QuestionQuestion,
        StarQuestion,
        PlusQuestion,
    ]);

    /// Tokens that close an alternative.
    pub const ALT_END: TokenSet = TokenSet::new(&[Pipe, Semicolon, ParenClose]);

    /// Where a broken rule header resumes.
    pub const RULE_RECOVERY: TokenSet = TokenSet::new(&[Colon, Semicolon]);

    /// Rule names: parser rules are lowercase, lexer rules uppercase.
    pub const RULE_NAME: TokenSet = TokenSet::new(&[RuleRefId, TokenRefId]);

    pub const OPTION_VALUE: TokenSet =
        TokenSet::new(&[RuleRefId, TokenRefId, Int, StringLiteral]);
}
