use std::fmt;

/// A range of source positions, counted in Unicode scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Token classification for Uni source.
///
/// The set is closed: every kind has a fixed display name in [`TOKEN_NAMES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A bare run of unreserved characters or a quoted literal.
    NameOrValue,
    /// `=`
    Separator,
    /// `~`
    Continuation,
    /// Start of a logical line, carrying its tab count.
    Indent,
    /// `(`
    OpenList,
    /// `)`
    CloseList,
}

const TOKEN_NAMES: [&str; 6] = ["name or value", "=", "~", "indentation", "(", ")"];

impl TokenKind {
    /// Human-readable name used in diagnostics.
    pub fn name(self) -> &'static str {
        TOKEN_NAMES[self as usize]
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload attached to a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValue {
    Missing,
    Text(String),
    Count(usize),
}

/// A token produced by the Uni tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, value: TokenValue, span: Span) -> Self {
        Self { kind, value, span }
    }

    /// A punctuation token without payload.
    pub fn punct(kind: TokenKind, span: Span) -> Self {
        Self::new(kind, TokenValue::Missing, span)
    }

    pub fn text(text: String, span: Span) -> Self {
        Self::new(TokenKind::NameOrValue, TokenValue::Text(text), span)
    }

    pub fn indent(level: usize, span: Span) -> Self {
        Self::new(TokenKind::Indent, TokenValue::Count(level), span)
    }

    /// Text carried by a `NameOrValue` token.
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Level carried by an `Indent` token.
    pub fn as_count(&self) -> Option<usize> {
        match self.value {
            TokenValue::Count(count) => Some(count),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self.value {
            TokenValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            TokenValue::Missing => write!(f, "{}", self.kind),
            TokenValue::Text(text) => write!(f, "{} {text:?}", self.kind),
            TokenValue::Count(count) => write!(f, "{} {count}", self.kind),
        }
    }
}

/// Characters that end a bare name/value and force quoting on output.
pub const RESERVED_CHARS: &[char] = &[
    ' ', '\t', '\r', '\n', '(', ')', '=', '\'', '`', '~', '#',
];

/// Check if a character belongs to the reserved set.
pub fn is_reserved(c: char) -> bool {
    RESERVED_CHARS.contains(&c)
}
