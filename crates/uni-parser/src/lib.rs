//! Uni Parser
//!
//! Parses Uni source into a forest of elements.
//! The token stream comes from `uni-lexer`; nesting is reconstructed from
//! the indentation level carried by each line's `Indent` token.
//!
//! ```
//! let forest = uni_parser::parse("node a=1\r\n\tchild").unwrap();
//! assert_eq!(forest.len(), 1);
//! assert_eq!(forest[0].children.len(), 1);
//! ```

pub mod ast;
pub mod parser;
pub mod reader;

pub use ast::{Attribute, AttributeValue, Element, Forest};
pub use parser::{Parser, ParserConfig, DEFAULT_MAX_DEPTH};
pub use reader::TokenReader;
pub use uni_lexer::TokenKind;

use uni_lexer::{LexErrorKind, LexerError, SourceContext};

/// Parse source text into a forest using the default configuration.
pub fn parse(source: &str) -> Result<Forest, ParseError> {
    Parser::parse(source)
}

/// Parse source text into a forest.
pub fn parse_with_config(source: &str, config: ParserConfig) -> Result<Forest, ParseError> {
    Parser::with_config(source, config)?.parse_document()
}

/// Classification of parse failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnterminatedString,
    InvalidEscapeSequence,
    InvalidHexDigits,
    LexicalError,
    /// A required token was absent.
    ExpectedToken(TokenKind),
    /// Tokens remain after the document was parsed.
    UnexpectedToken,
    /// Elements nest deeper than [`ParserConfig::max_depth`].
    NestingTooDeep,
}

impl From<LexErrorKind> for ParseErrorKind {
    fn from(kind: LexErrorKind) -> Self {
        match kind {
            LexErrorKind::UnterminatedString => Self::UnterminatedString,
            LexErrorKind::InvalidEscapeSequence => Self::InvalidEscapeSequence,
            LexErrorKind::InvalidHexDigits => Self::InvalidHexDigits,
            LexErrorKind::LexicalError => Self::LexicalError,
        }
    }
}

/// Parser error with position information.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Parse error at line {line}, column {column}: {message}\n  here: {excerpt}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub excerpt: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, context: SourceContext) -> Self {
        Self {
            kind,
            message: message.into(),
            line: context.line,
            column: context.column,
            excerpt: context.excerpt,
        }
    }
}

impl From<LexerError> for ParseError {
    fn from(e: LexerError) -> Self {
        Self {
            kind: e.kind.into(),
            message: e.message,
            line: e.line,
            column: e.column,
            excerpt: e.excerpt,
        }
    }
}
