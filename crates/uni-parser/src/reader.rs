//! One-token lookahead over the tokenizer.

use crate::{ParseError, ParseErrorKind};
use tracing::trace;
use uni_lexer::{SourceContext, Token, TokenKind, Tokenizer};

/// Cursor over the token stream with a single token of lookahead.
///
/// Tokens are pulled from the [`Tokenizer`] on demand; the reader never
/// holds more than the current token and the last consumed one.
pub struct TokenReader {
    tokenizer: Tokenizer,
    current: Option<Token>,
    passed: Option<Token>,
}

impl TokenReader {
    /// Create a reader positioned at the first token of `source`.
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut reader = Self {
            tokenizer: Tokenizer::new(source),
            current: None,
            passed: None,
        };
        reader.advance()?;
        Ok(reader)
    }

    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    pub fn has_current(&self) -> bool {
        self.current.is_some()
    }

    /// The token most recently consumed by [`TokenReader::try_consume`].
    pub fn passed(&self) -> Option<&Token> {
        self.passed.as_ref()
    }

    /// Take the text of the last consumed token, leaving nothing behind.
    pub fn take_passed_text(&mut self) -> String {
        self.passed
            .take()
            .and_then(Token::into_text)
            .unwrap_or_default()
    }

    /// Check whether the current token has the given kind.
    pub fn at(&self, kind: TokenKind) -> bool {
        self.current.as_ref().is_some_and(|t| t.kind == kind)
    }

    /// Consume the current token if it has the given kind.
    pub fn try_consume(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        if !self.at(kind) {
            return Ok(false);
        }
        self.passed = self.current.take();
        self.advance()?;
        Ok(true)
    }

    /// Consume the current token, failing unless it has the given kind.
    pub fn require_consume(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.try_consume(kind)? {
            return Ok(());
        }
        let found = match &self.current {
            Some(token) => token.to_string(),
            None => "end of input".to_string(),
        };
        Err(self.error(
            ParseErrorKind::ExpectedToken(kind),
            format!("Expected '{kind}', found {found}"),
        ))
    }

    /// Pull the next token from the tokenizer.
    ///
    /// Running out of input moves the reader into the exhausted state; input
    /// that cannot start any token is a lexical error.
    pub fn advance(&mut self) -> Result<(), ParseError> {
        self.current = self.tokenizer.next_token()?;
        match &self.current {
            Some(token) => trace!(token = %token, start = token.span.start, "advance"),
            None if self.tokenizer.is_exhausted() => trace!("end of input"),
            None => return Err(self.tokenizer.lexical_error().into()),
        }
        Ok(())
    }

    /// Diagnostic context for the current token, or for the end of input.
    pub fn current_context(&self) -> SourceContext {
        let scanner = self.tokenizer.scanner();
        match &self.current {
            Some(token) => scanner.context_at(token.span.start),
            None => scanner.current_context(),
        }
    }

    pub fn error(&self, kind: ParseErrorKind, message: impl Into<String>) -> ParseError {
        ParseError::new(kind, message, self.current_context())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_source_is_exhausted() {
        let reader = TokenReader::new("").unwrap();
        assert!(!reader.has_current());
    }

    #[test]
    fn test_try_consume_matching_kind() {
        let mut reader = TokenReader::new("a=b").unwrap();
        assert!(reader.try_consume(TokenKind::Indent).unwrap());
        assert_eq!(reader.passed().and_then(Token::as_count), Some(0));
        assert!(reader.try_consume(TokenKind::NameOrValue).unwrap());
        assert_eq!(reader.take_passed_text(), "a");
        assert!(reader.at(TokenKind::Separator));
    }

    #[test]
    fn test_try_consume_mismatch_has_no_effect() {
        let mut reader = TokenReader::new("a").unwrap();
        assert!(!reader.try_consume(TokenKind::NameOrValue).unwrap());
        assert!(reader.at(TokenKind::Indent));
        assert!(reader.passed().is_none());
    }

    #[test]
    fn test_try_consume_when_exhausted() {
        let mut reader = TokenReader::new("").unwrap();
        assert!(!reader.try_consume(TokenKind::Indent).unwrap());
    }

    #[test]
    fn test_require_consume_reports_expected_kind() {
        let mut reader = TokenReader::new("a").unwrap();
        let err = reader.require_consume(TokenKind::CloseList).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedToken(TokenKind::CloseList));
        assert!(err.message.contains("Expected ')'"), "{}", err.message);
        assert!(err.message.contains("indentation 0"), "{}", err.message);
    }

    #[test]
    fn test_require_consume_at_end_of_input() {
        let mut reader = TokenReader::new("a").unwrap();
        reader.require_consume(TokenKind::Indent).unwrap();
        reader.require_consume(TokenKind::NameOrValue).unwrap();
        let err = reader.require_consume(TokenKind::Separator).unwrap_err();
        assert!(err.message.ends_with("end of input"));
        assert_eq!((err.line, err.column), (1, 2));
    }

    #[test]
    fn test_lexer_errors_propagate_on_advance() {
        let mut reader = TokenReader::new("a 'open").unwrap();
        reader.try_consume(TokenKind::Indent).unwrap();
        let err = reader.try_consume(TokenKind::NameOrValue).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedString);
    }

    #[test]
    fn test_lexer_error_after_first_indent() {
        let mut reader = TokenReader::new("`x").unwrap();
        let err = reader.try_consume(TokenKind::Indent).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedString);
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_context_points_at_current_token() {
        let mut reader = TokenReader::new("a\r\n\tbc").unwrap();
        reader.try_consume(TokenKind::Indent).unwrap();
        reader.try_consume(TokenKind::NameOrValue).unwrap();
        reader.try_consume(TokenKind::Indent).unwrap();
        let context = reader.current_context();
        assert_eq!((context.line, context.column), (2, 2));
        assert_eq!(context.excerpt, "\t👉bc");
    }
}
