/// Marker inserted into diagnostic excerpts at the reported position.
pub const POSITION_MARKER: &str = "👉";

/// Line/column description of a source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in Unicode scalars.
    pub column: usize,
    /// The source line with [`POSITION_MARKER`] inserted at the position.
    pub excerpt: String,
}

/// Character scanner over Uni source.
///
/// Holds the source as a `Vec<char>` for index-based navigation.
/// Running out of input is never an error here: callers check
/// [`Scanner::has_current`].
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    /// Create a new scanner positioned at the first character.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    /// Index of the current character.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn has_current(&self) -> bool {
        self.pos < self.chars.len()
    }

    pub fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub fn advance(&mut self) {
        if self.has_current() {
            self.pos += 1;
        }
    }

    /// Consume the current character if it equals `expected`.
    pub fn pass_char(&mut self, expected: char) -> bool {
        if self.current() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the maximal run of characters satisfying `test`.
    ///
    /// Returns `None` when nothing was consumed.
    pub fn pass_while(&mut self, test: impl Fn(char) -> bool) -> Option<&[char]> {
        let start = self.pos;
        while self.current().is_some_and(&test) {
            self.pos += 1;
        }
        if self.pos == start {
            None
        } else {
            Some(&self.chars[start..self.pos])
        }
    }

    /// Describe the current position.
    pub fn current_context(&self) -> SourceContext {
        self.context_at(self.pos)
    }

    /// Describe `pos` as a line, a column and an annotated excerpt.
    ///
    /// Line terminators are CR, LF and CR+LF. A position on a terminator
    /// belongs to the line it ends.
    pub fn context_at(&self, pos: usize) -> SourceContext {
        let len = self.chars.len();
        let pos = pos.min(len);
        let mut line = 0;
        let mut line_start = 0;
        let mut line_end = len;
        let mut i = 0;

        while i < len {
            let c = self.chars[i];
            if c != '\r' && c != '\n' {
                i += 1;
                continue;
            }
            if pos <= i {
                line_end = i;
                break;
            }
            i += 1;
            if c == '\r' && self.chars.get(i) == Some(&'\n') {
                i += 1;
            }
            if pos < i {
                // Inside a CR+LF pair.
                line_end = i - 2;
                break;
            }
            line += 1;
            line_start = i;
        }

        let index = pos.min(line_end);
        let mut excerpt: String = self.chars[line_start..index].iter().collect();
        excerpt.push_str(POSITION_MARKER);
        excerpt.extend(&self.chars[index..line_end]);

        SourceContext {
            line: line + 1,
            column: index - line_start + 1,
            excerpt,
        }
    }
}
