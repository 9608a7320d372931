//! Typed attribute declarations and `$name.field` references.
//!
//! Declarations come from rule prequels: `e[int a, List<String> b = null]`,
//! `returns [int v]`, `locals [Map<K, V> m]`. Both `Type name` and `name: Type`
//! spellings are accepted.

use indexmap::IndexMap;

/// Which prequel clause a dictionary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DictKind {
    Args,
    Returns,
    Locals,
}

impl DictKind {
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            DictKind::Args => None,
            DictKind::Returns => Some("returns"),
            DictKind::Locals => Some("locals"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub ty: Option<String>,
    pub init: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDict {
    kind: DictKind,
    raw: String,
    attributes: IndexMap<String, Attribute>,
}

impl AttributeDict {
    /// Parses a declaration list; surrounding `[` `]` are optional.
    pub fn parse(kind: DictKind, text: &str) -> Self {
        let raw = text
            .trim()
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .unwrap_or(text.trim())
            .to_owned();

        let mut attributes = IndexMap::new();
        for decl in split_top_level(&raw, ',') {
            if let Some(attr) = parse_declaration(decl) {
                attributes.entry(attr.name.clone()).or_insert(attr);
            }
        }
        Self {
            kind,
            raw,
            attributes,
        }
    }

    pub fn kind(&self) -> DictKind {
        self.kind
    }

    /// Declaration text without brackets.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

fn parse_declaration(decl: &str) -> Option<Attribute> {
    let decl = decl.trim();
    if decl.is_empty() {
        return None;
    }

    let (decl, init) = match split_once_top_level(decl, '=') {
        Some((decl, init)) => (decl.trim(), Some(init.trim().to_owned())),
        None => (decl, None),
    };

    if let Some((name, ty)) = split_once_top_level(decl, ':') {
        let name = name.trim();
        if is_identifier(name) {
            let ty = ty.trim();
            return Some(Attribute {
                name: name.to_owned(),
                ty: (!ty.is_empty()).then(|| ty.to_owned()),
                init,
            });
        }
    }

    let name_start = decl
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphanumeric() || *c == '_')
        .last()
        .map(|(i, _)| i)?;
    let name = &decl[name_start..];
    let ty = decl[..name_start].trim();
    Some(Attribute {
        name: name.to_owned(),
        ty: (!ty.is_empty()).then(|| ty.to_owned()),
        init,
    })
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Splits on `sep` outside of `<>`, `()`, `[]`, `{}` and quotes.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = text;
    while let Some((head, tail)) = split_once_top_level(rest, sep) {
        parts.push(head);
        rest = tail;
    }
    parts.push(rest);
    parts
}

fn split_once_top_level(text: &str, sep: char) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    let mut quote = None;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                _ if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '<' | '(' | '[' | '{' => depth += 1,
            // `->` inside a type is not a closing bracket
            '>' if text[..i].ends_with('-') => {}
            '>' | ')' | ']' | '}' => depth = depth.saturating_sub(1),
            // `::` is a path separator, never a `name: Type` split
            ':' if text[..i].ends_with(':') || text[i + 1..].starts_with(':') => {}
            _ if c == sep && depth == 0 => {
                return Some((&text[..i], &text[i + c.len_utf8()..]));
            }
            _ => {}
        }
    }
    None
}

/// `$name` or `$name.field` inside action text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeRef<'a> {
    pub name: &'a str,
    pub field: Option<&'a str>,
    /// Byte offset of `$` within the scanned text.
    pub offset: usize,
    /// Byte length of the whole reference, `$` included.
    pub len: usize,
}

/// Attribute references in `text`, skipping quoted strings and `\$` escapes.
pub fn attribute_refs(text: &str) -> Vec<AttributeRef<'_>> {
    let bytes = text.as_bytes();
    let mut refs = Vec::new();
    let mut i = 0;
    let mut quote = None;
    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'\\' => i += 2,
            b'"' => {
                quote = Some(b);
                i += 1;
            }
            b'$' => {
                let name_end = ident_end(bytes, i + 1);
                if name_end == i + 1 {
                    i += 1;
                    continue;
                }
                let name = &text[i + 1..name_end];
                let mut end = name_end;
                let mut field = None;
                if bytes.get(name_end) == Some(&b'.') {
                    let field_end = ident_end(bytes, name_end + 1);
                    if field_end > name_end + 1 {
                        field = Some(&text[name_end + 1..field_end]);
                        end = field_end;
                    }
                }
                refs.push(AttributeRef {
                    name,
                    field,
                    offset: i,
                    len: end - i,
                });
                i = end;
            }
            _ => i += 1,
        }
    }
    refs
}

fn ident_end(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
        if end == start && bytes[end].is_ascii_digit() {
            break;
        }
        end += 1;
    }
    end
}
