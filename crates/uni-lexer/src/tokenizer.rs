use crate::scanner::Scanner;
use crate::token::{is_reserved, Span, Token, TokenKind};
use crate::{LexErrorKind, LexerError};
use tracing::trace;

/// Whether the tokenizer has looked at the first line yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    /// Nothing examined; the next scan starts at the first line without
    /// requiring a line terminator.
    BeforeFirstLine,
    /// Inside a line; a new logical line starts only after a terminator.
    InLine,
}

/// Uni tokenizer.
///
/// Produces one token per call to [`Tokenizer::next_token`]. Every logical
/// line (not blank, not comment-only) starts with an `Indent` token carrying
/// its count of leading tabs.
pub struct Tokenizer {
    scanner: Scanner,
    state: LineState,
}

impl Tokenizer {
    pub fn new(source: &str) -> Self {
        Self {
            scanner: Scanner::new(source),
            state: LineState::BeforeFirstLine,
        }
    }

    /// Tokenize the entire source into a vector of tokens.
    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexerError> {
        let mut tokenizer = Tokenizer::new(source);
        let mut tokens = Vec::new();
        while let Some(token) = tokenizer.next_token()? {
            tokens.push(token);
        }
        if !tokenizer.is_exhausted() {
            return Err(tokenizer.lexical_error());
        }
        Ok(tokens)
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    pub fn state(&self) -> LineState {
        self.state
    }

    /// True once every character has been consumed.
    pub fn is_exhausted(&self) -> bool {
        !self.scanner.has_current()
    }

    /// Error for a position where no token can start.
    pub fn lexical_error(&self) -> LexerError {
        let message = match self.scanner.current() {
            Some(c) => format!("No token can start with {c:?}"),
            None => "No token can start here".to_string(),
        };
        LexerError::new(
            LexErrorKind::LexicalError,
            message,
            self.scanner.current_context(),
        )
    }

    /// Scan the next token.
    ///
    /// `Ok(None)` means no token could be formed. That is the normal end of
    /// the stream when [`Tokenizer::is_exhausted`] holds, and a lexical error
    /// otherwise.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexerError> {
        if let Some(indent) = self.scan_indentation() {
            return Ok(Some(indent));
        }
        if self.is_exhausted() {
            return Ok(None);
        }

        let start = self.scanner.position();
        let token = if self.scanner.pass_char('=') {
            Token::punct(TokenKind::Separator, self.span_from(start))
        } else if self.scanner.pass_char('~') {
            Token::punct(TokenKind::Continuation, self.span_from(start))
        } else if self.scanner.pass_char('(') {
            Token::punct(TokenKind::OpenList, self.span_from(start))
        } else if self.scanner.pass_char(')') {
            Token::punct(TokenKind::CloseList, self.span_from(start))
        } else if self.scanner.pass_char('\'') {
            let text = self.scan_single_quoted()?;
            Token::text(text, self.span_from(start))
        } else if self.scanner.pass_char('`') {
            let text = self.scan_back_quoted()?;
            Token::text(text, self.span_from(start))
        } else if let Some(run) = self.scanner.pass_while(|c| !is_reserved(c)) {
            let text = run.iter().collect();
            Token::text(text, self.span_from(start))
        } else {
            return Ok(None);
        };

        self.scanner.pass_while(is_whitespace);
        Ok(Some(token))
    }

    // --- Indentation ---

    /// Advance to the content of the next logical line.
    ///
    /// Blank and comment-only lines are skipped without producing a token.
    /// Returns `None` when the scanner is not at a line boundary, or when
    /// input ends before another logical line starts.
    fn scan_indentation(&mut self) -> Option<Token> {
        loop {
            match self.state {
                LineState::BeforeFirstLine => self.state = LineState::InLine,
                LineState::InLine => {
                    if !self.pass_line_end() {
                        return None;
                    }
                }
            }

            let start = self.scanner.position();
            let level = self.scanner.pass_while(|c| c == '\t').map_or(0, <[char]>::len);
            self.scanner.pass_while(is_whitespace);

            match self.scanner.current() {
                None | Some('\r' | '\n' | '#') => continue,
                Some(_) => {
                    trace!(level, position = start, "indentation");
                    return Some(Token::indent(level, self.span_from(start)));
                }
            }
        }
    }

    /// Consume an optional comment followed by CR, CR+LF or LF.
    fn pass_line_end(&mut self) -> bool {
        if self.scanner.current() == Some('#') {
            self.scanner.pass_while(|c| c != '\r' && c != '\n');
        }
        if self.scanner.pass_char('\r') {
            self.scanner.pass_char('\n');
            return true;
        }
        self.scanner.pass_char('\n')
    }

    // --- String literals ---

    /// Scan the body of a `'...'` literal; the opening quote is consumed.
    fn scan_single_quoted(&mut self) -> Result<String, LexerError> {
        let start = self.scanner.position();
        let mut value = String::new();

        while let Some(c) = self.scanner.current() {
            if self.scanner.pass_char('\'') {
                return Ok(value);
            }
            if !self.scanner.pass_char('\\') {
                value.push(c);
                self.scanner.advance();
                continue;
            }

            let Some(escaped) = self.scanner.current() else {
                break;
            };
            if let Some(unescaped) = unescape(escaped) {
                value.push(unescaped);
                self.scanner.advance();
            } else if self.scanner.pass_char('x') {
                value.push(self.scan_code_point(2)?);
            } else if self.scanner.pass_char('u') {
                value.push(self.scan_code_point(4)?);
            } else {
                return Err(LexerError::new(
                    LexErrorKind::InvalidEscapeSequence,
                    format!("Invalid escape sequence: '\\{escaped}'"),
                    self.scanner.current_context(),
                ));
            }
        }

        Err(LexerError::new(
            LexErrorKind::UnterminatedString,
            "Unterminated string",
            self.scanner.context_at(start),
        ))
    }

    /// Read exactly `digits` hex digits and convert them to a character.
    fn scan_code_point(&mut self, digits: usize) -> Result<char, LexerError> {
        let start = self.scanner.position();
        let mut code = 0u32;

        for _ in 0..digits {
            let Some(digit) = self.scanner.current().and_then(|c| c.to_digit(16)) else {
                return Err(LexerError::new(
                    LexErrorKind::InvalidHexDigits,
                    format!("Expected {digits} hex digits"),
                    self.scanner.current_context(),
                ));
            };
            code = code * 16 + digit;
            self.scanner.advance();
        }

        char::from_u32(code).ok_or_else(|| {
            LexerError::new(
                LexErrorKind::InvalidEscapeSequence,
                format!("U+{code:04X} is not a Unicode scalar value"),
                self.scanner.context_at(start),
            )
        })
    }

    /// Scan the body of a `` `...` `` literal; the opening quote is consumed.
    /// A doubled back-quote stands for one back-quote.
    fn scan_back_quoted(&mut self) -> Result<String, LexerError> {
        let start = self.scanner.position();
        let mut value = String::new();

        loop {
            if let Some(run) = self.scanner.pass_while(|c| c != '`') {
                value.extend(run);
            }
            if !self.scanner.pass_char('`') {
                return Err(LexerError::new(
                    LexErrorKind::UnterminatedString,
                    "Unterminated back-quoted string",
                    self.scanner.context_at(start),
                ));
            }
            if !self.scanner.pass_char('`') {
                return Ok(value);
            }
            value.push('`');
        }
    }

    // --- Helpers ---

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.scanner.position())
    }
}

fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Single-character escapes of `'...'` literals.
fn unescape(c: char) -> Option<char> {
    match c {
        '0' => Some('\0'),
        '\'' => Some('\''),
        '\\' => Some('\\'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        'v' => Some('\u{0B}'),
        't' => Some('\t'),
        'b' => Some('\u{08}'),
        'f' => Some('\u{0C}'),
        _ => None,
    }
}
