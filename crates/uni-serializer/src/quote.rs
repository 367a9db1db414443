//! Quoting of names and values.

use std::borrow::Cow;
use uni_lexer::is_reserved;

/// Render a name or value so that it lexes back to exactly `s`.
///
/// Non-empty strings without reserved characters are emitted as-is.
/// Anything else is back-quoted with embedded back-quotes doubled, so the
/// empty string becomes ``` `` ```.
pub fn quote(s: &str) -> Cow<'_, str> {
    if s.is_empty() {
        Cow::Borrowed("``")
    } else if s.chars().any(is_reserved) {
        Cow::Owned(format!("`{}`", s.replace('`', "``")))
    } else {
        Cow::Borrowed(s)
    }
}
