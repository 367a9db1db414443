//! Document parser for Uni.
//!
//! Recursive descent over the token stream:
//!
//! ```text
//! Document    := [ Indent(0) Elements(0) ]
//! Elements(n) := Element(n) { Indent(n) Element(n) }
//! Element(n)  := Attributes { Indent(n+1) ( '~' Attributes | Elements(n+1) BREAK ) }
//! Attributes  := { Name [ '=' ( '(' { Value } ')' | Value ) ] }
//! ```
//!
//! Indentation only ever steps one level deeper; a line indented further
//! than its parent allows is left unconsumed and fails the parse.

use crate::ast::{Attribute, AttributeValue, Element, Forest};
use crate::reader::TokenReader;
use crate::{ParseError, ParseErrorKind};
use tracing::debug;
use uni_lexer::TokenKind;

/// Default limit on how many levels elements may nest below the root.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Deepest indentation level accepted; root elements sit at level 0.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Uni document parser.
pub struct Parser {
    reader: TokenReader,
    config: ParserConfig,
}

impl Parser {
    /// Create a parser with the default configuration.
    pub fn new(source: &str) -> Result<Self, ParseError> {
        Self::with_config(source, ParserConfig::default())
    }

    pub fn with_config(source: &str, config: ParserConfig) -> Result<Self, ParseError> {
        Ok(Self {
            reader: TokenReader::new(source)?,
            config,
        })
    }

    /// Parse source code into a forest.
    pub fn parse(source: &str) -> Result<Forest, ParseError> {
        Parser::new(source)?.parse_document()
    }

    /// Parse a full document. The whole token stream must be consumed.
    pub fn parse_document(mut self) -> Result<Forest, ParseError> {
        debug!(max_depth = self.config.max_depth, "parsing document");
        let mut elements = Vec::new();

        if self.pass_indentation(0)? {
            self.parse_elements(0, &mut elements)?;
        }

        if let Some(token) = self.reader.current() {
            let message = format!("Unexpected {token}");
            return Err(self.reader.error(ParseErrorKind::UnexpectedToken, message));
        }

        debug!(elements = elements.len(), "parsed document");
        Ok(elements)
    }

    // =========================================================================
    // Elements
    // =========================================================================

    /// Parse sibling elements at `level`. The caller has consumed the
    /// `Indent(level)` in front of the first one.
    fn parse_elements(
        &mut self,
        level: usize,
        elements: &mut Vec<Element>,
    ) -> Result<(), ParseError> {
        if level > self.config.max_depth {
            return Err(self.reader.error(
                ParseErrorKind::NestingTooDeep,
                format!(
                    "Elements nest {level} levels deep, the limit is {}",
                    self.config.max_depth
                ),
            ));
        }

        loop {
            elements.push(self.parse_element(level)?);
            if !self.pass_indentation(level)? {
                return Ok(());
            }
        }
    }

    /// Parse one element: its attribute runs, continued by `~` lines, and at
    /// most one child block.
    fn parse_element(&mut self, level: usize) -> Result<Element, ParseError> {
        let mut element = Element::default();
        self.parse_attributes(&mut element.attributes)?;

        while self.pass_indentation(level + 1)? {
            if self.reader.try_consume(TokenKind::Continuation)? {
                self.parse_attributes(&mut element.attributes)?;
            } else {
                self.parse_elements(level + 1, &mut element.children)?;
                break;
            }
        }

        Ok(element)
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Parse `name`, `name=value` and `name=(value ...)` pairs until the next
    /// token cannot start an attribute.
    fn parse_attributes(&mut self, attributes: &mut Vec<Attribute>) -> Result<(), ParseError> {
        while self.reader.try_consume(TokenKind::NameOrValue)? {
            let name = self.reader.take_passed_text();
            let value = if self.reader.try_consume(TokenKind::Separator)? {
                self.parse_value()?
            } else {
                AttributeValue::Missing
            };
            attributes.push(Attribute { name, value });
        }
        Ok(())
    }

    /// Parse the value after `=`.
    fn parse_value(&mut self) -> Result<AttributeValue, ParseError> {
        if self.reader.try_consume(TokenKind::OpenList)? {
            let mut items = Vec::new();
            while self.reader.try_consume(TokenKind::NameOrValue)? {
                items.push(self.reader.take_passed_text());
            }
            self.reader.require_consume(TokenKind::CloseList)?;
            return Ok(AttributeValue::List(items));
        }

        self.reader.require_consume(TokenKind::NameOrValue)?;
        Ok(AttributeValue::Scalar(self.reader.take_passed_text()))
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    /// Consume an `Indent` token only if it carries exactly `level`.
    fn pass_indentation(&mut self, level: usize) -> Result<bool, ParseError> {
        let matches = self
            .reader
            .current()
            .is_some_and(|t| t.kind == TokenKind::Indent && t.as_count() == Some(level));
        if matches {
            self.reader.advance()?;
        }
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Forest {
        Parser::parse(source).unwrap()
    }

    fn parse_err(source: &str) -> ParseError {
        Parser::parse(source).unwrap_err()
    }

    // =========================================================================
    // Empty / simple
    // =========================================================================

    #[test]
    fn test_empty_document() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_blank_and_comment_document() {
        assert!(parse("\r\n  \r\n# comment\r\n\t\r\n").is_empty());
    }

    #[test]
    fn test_single_name() {
        assert_eq!(parse("a"), vec![Element::new(vec![Attribute::missing("a")])]);
    }

    #[test]
    fn test_multiple_attributes() {
        assert_eq!(
            parse("element a=A  b=B\tc=C"),
            vec![Element::new(vec![
                Attribute::missing("element"),
                Attribute::scalar("a", "A"),
                Attribute::scalar("b", "B"),
                Attribute::scalar("c", "C"),
            ])]
        );
    }

    #[test]
    fn test_duplicate_names_kept_in_order() {
        let forest = parse("x=1 x=2 x");
        assert_eq!(
            forest[0].attributes,
            vec![
                Attribute::scalar("x", "1"),
                Attribute::scalar("x", "2"),
                Attribute::missing("x"),
            ]
        );
    }

    #[test]
    fn test_siblings() {
        let forest = parse("a\r\nb\nc");
        assert_eq!(forest.len(), 3);
        assert!(forest.iter().all(|e| e.children.is_empty()));
    }

    // =========================================================================
    // Values
    // =========================================================================

    #[test]
    fn test_list_value() {
        let forest = parse("a=(1 2 3)");
        assert_eq!(forest[0].attributes, vec![Attribute::list("a", ["1", "2", "3"])]);
    }

    #[test]
    fn test_empty_list_value() {
        let forest = parse("a=() b");
        assert_eq!(
            forest[0].attributes,
            vec![Attribute::list("a", Vec::<String>::new()), Attribute::missing("b")]
        );
    }

    #[test]
    fn test_quoted_values() {
        let forest = parse("'a b'=`c``d` e=('x y' `(`)");
        assert_eq!(
            forest[0].attributes,
            vec![Attribute::scalar("a b", "c`d"), Attribute::list("e", ["x y", "("])]
        );
    }

    #[test]
    fn test_escape_decoding() {
        let forest = parse("a='A\\r\\n\\t\\\\B'");
        assert_eq!(forest[0].attributes, vec![Attribute::scalar("a", "A\r\n\t\\B")]);
    }

    #[test]
    fn test_list_items_across_lines_are_not_allowed() {
        let err = parse_err("a=(1\r\n2)");
        assert_eq!(err.kind, ParseErrorKind::ExpectedToken(TokenKind::CloseList));
        assert_eq!(err.line, 2);
    }

    // =========================================================================
    // Nesting and continuation
    // =========================================================================

    #[test]
    fn test_children() {
        assert_eq!(
            parse("a\r\n\tb\r\n\tc\r\n\t\td\r\ne"),
            vec![
                Element::with_children(
                    vec![Attribute::missing("a")],
                    vec![
                        Element::new(vec![Attribute::missing("b")]),
                        Element::with_children(
                            vec![Attribute::missing("c")],
                            vec![Element::new(vec![Attribute::missing("d")])],
                        ),
                    ],
                ),
                Element::new(vec![Attribute::missing("e")]),
            ]
        );
    }

    #[test]
    fn test_dedent_by_several_levels() {
        let forest = parse("a\n\tb\n\t\tc\n\t\t\td\ne");
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].children[0].children[0].children.len(), 1);
    }

    #[test]
    fn test_continuation() {
        assert_eq!(
            parse("a=A\r\n\t~ b=B\r\n\tc=C\r\nd=D"),
            vec![
                Element::with_children(
                    vec![Attribute::scalar("a", "A"), Attribute::scalar("b", "B")],
                    vec![Element::new(vec![Attribute::scalar("c", "C")])],
                ),
                Element::new(vec![Attribute::scalar("d", "D")]),
            ]
        );
    }

    #[test]
    fn test_several_continuation_lines() {
        let forest = parse("a\r\n\t~ b\r\n\t~\r\n\t~ c=(1 2)");
        assert_eq!(
            forest[0].attributes,
            vec![
                Attribute::missing("a"),
                Attribute::missing("b"),
                Attribute::list("c", ["1", "2"]),
            ]
        );
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn test_continuation_of_nested_element() {
        let forest = parse("a\r\n\tb\r\n\t\t~ c\r\n\t\td");
        let b = &forest[0].children[0];
        assert_eq!(b.attributes, vec![Attribute::missing("b"), Attribute::missing("c")]);
        assert_eq!(b.children, vec![Element::new(vec![Attribute::missing("d")])]);
    }

    #[test]
    fn test_continuation_after_children_is_rejected() {
        let err = parse_err("a\r\n\tb\r\n\t~ c");
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_comments_between_children() {
        let forest = parse("a # root\r\n\t# about b\r\n\tb\r\n\r\n\tc");
        assert_eq!(forest[0].children.len(), 2);
    }

    // =========================================================================
    // Errors
    // =========================================================================

    #[test]
    fn test_missing_close_list() {
        let err = parse_err("a=(1 2 3");
        assert_eq!(err.kind, ParseErrorKind::ExpectedToken(TokenKind::CloseList));
        assert_eq!((err.line, err.column), (1, 9));
    }

    #[test]
    fn test_missing_scalar_value() {
        let err = parse_err("a=");
        assert_eq!(err.kind, ParseErrorKind::ExpectedToken(TokenKind::NameOrValue));
    }

    #[test]
    fn test_unterminated_back_quote() {
        let err = parse_err("`abc");
        assert_eq!(err.kind, ParseErrorKind::UnterminatedString);
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_skipped_level_is_rejected() {
        let err = parse_err("a\r\n\t\tb");
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
        assert_eq!((err.line, err.column), (2, 1));
        assert!(err.message.contains("indentation 2"), "{}", err.message);
    }

    #[test]
    fn test_indented_first_line_is_rejected() {
        let err = parse_err("\ta");
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_stray_punctuation() {
        let err = parse_err("a ) b");
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
        assert_eq!(err.column, 3);
        assert_eq!(err.excerpt, "a 👉) b");
    }

    #[test]
    fn test_continuation_on_root_line_is_rejected() {
        let err = parse_err("a ~ b");
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_error_display() {
        let err = parse_err("a=(1");
        assert_eq!(
            err.to_string(),
            "Parse error at line 1, column 5: Expected ')', found end of input\n  here: a=(1👉"
        );
    }

    // =========================================================================
    // Nesting limit
    // =========================================================================

    fn nested(depth: usize) -> String {
        (0..=depth)
            .map(|level| format!("{}e{level}", "\t".repeat(level)))
            .collect::<Vec<_>>()
            .join("\r\n")
    }

    #[test]
    fn test_nesting_within_limit() {
        let config = ParserConfig::default().with_max_depth(3);
        let forest = Parser::with_config(&nested(3), config)
            .unwrap()
            .parse_document()
            .unwrap();
        assert_eq!(forest[0].children[0].children[0].children.len(), 1);
    }

    #[test]
    fn test_nesting_too_deep() {
        let config = ParserConfig::default().with_max_depth(3);
        let err = Parser::with_config(&nested(4), config)
            .unwrap()
            .parse_document()
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NestingTooDeep);
        assert_eq!(err.line, 5);
    }

    #[test]
    fn test_default_limit_allows_deep_documents() {
        let forest = parse(&nested(100));
        let mut depth = 0;
        let mut element = &forest[0];
        while let Some(child) = element.children.first() {
            element = child;
            depth += 1;
        }
        assert_eq!(depth, 100);
    }
}
