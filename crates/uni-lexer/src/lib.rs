//! Uni Lexer
//!
//! Turns `.uni` source text into a stream of tokens.
//! Handles tab-based indentation, line comments, attribute punctuation
//! (`=`, `~`, `(`, `)`) and both string literal syntaxes
//! (escaped single-quoted and doubled back-quoted).
//!
//! # Example
//!
//! ```
//! use uni_lexer::{TokenKind, Tokenizer};
//!
//! let tokens = Tokenizer::tokenize("a=b").unwrap();
//! assert_eq!(tokens[0].kind, TokenKind::Indent);
//! assert_eq!(tokens.len(), 4);
//! ```

pub mod scanner;
pub mod token;
pub mod tokenizer;

pub use scanner::{Scanner, SourceContext};
pub use token::{is_reserved, Span, Token, TokenKind, TokenValue, RESERVED_CHARS};
pub use tokenizer::{LineState, Tokenizer};

/// Classification of lexer failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    /// A single- or back-quoted literal was not closed before the end of input.
    UnterminatedString,
    /// `\` inside a single-quoted literal was followed by an unknown character.
    InvalidEscapeSequence,
    /// `\xHH` or `\uHHHH` with a non-hex character or cut short by the end of input.
    InvalidHexDigits,
    /// No token can start at the current position although input remains.
    LexicalError,
}

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Lexer error at line {line}, column {column}: {message}\n  here: {excerpt}")]
pub struct LexerError {
    pub kind: LexErrorKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
    /// The offending source line with a marker at the error position.
    pub excerpt: String,
}

impl LexerError {
    pub fn new(kind: LexErrorKind, message: impl Into<String>, context: SourceContext) -> Self {
        Self {
            kind,
            message: message.into(),
            line: context.line,
            column: context.column,
            excerpt: context.excerpt,
        }
    }
}
