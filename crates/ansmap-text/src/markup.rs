//! Inline style markup — `{` followed by a one-character marker.
//!
//! Rich text embeds style changes directly in the string:
//!
//! ```text
//! {rError{x: file not found
//! ```
//!
//! draws `Error` in red and the rest in the default foreground. Markers are
//! the same characters the document format uses (see
//! [`Style::from_marker`]). `{{` is a literal `{`. Markup occupies no
//! columns.
//!
//! | Marker | Effect |
//! |--------|--------|
//! | color (`r`, `R`, …) | replaces the foreground / background |
//! | `e` / `E` | clears the foreground / background |
//! | decoration (`_`, `/`, …) | added to the current style |
//! | `x` | keeps only the background |
//! | `X` | clears everything |

use ansmap_term::Style;

/// One unit of laid-out text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A single code point, one column wide.
    Glyph(&'a str),
    /// A zero-width style change.
    Markup(Style),
}

impl Token<'_> {
    /// Columns this token occupies.
    #[inline]
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Glyph(_) => 1,
            Self::Markup(_) => 0,
        }
    }

    /// Whether this is a space glyph.
    #[inline]
    #[must_use]
    pub fn is_space(self) -> bool {
        matches!(self, Self::Glyph(" "))
    }
}

/// Tokens of `text` with every code point as a glyph.
pub fn plain(text: &str) -> impl Iterator<Item = Token<'_>> {
    text.char_indices()
        .map(|(i, ch)| Token::Glyph(&text[i..i + ch.len_utf8()]))
}

/// Tokens of `text` with `{c` markup decoded.
///
/// # Panics
///
/// The returned iterator panics on an unknown marker character or a `{` at
/// the very end of `text`.
///
/// ```
/// use ansmap_term::Style;
/// use ansmap_text::markup::{rich, Token};
///
/// let tokens: Vec<_> = rich("{ra{{").collect();
/// assert_eq!(tokens, [Token::Markup(Style::FG_RED), Token::Glyph("a"), Token::Glyph("{")]);
/// ```
pub fn rich(text: &str) -> Rich<'_> {
    Rich { text, pos: 0 }
}

/// Iterator returned by [`rich`].
#[derive(Debug, Clone)]
pub struct Rich<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Rich<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.text[self.pos..];
        let mut chars = rest.chars();
        let ch = chars.next()?;

        if ch != '{' {
            self.pos += ch.len_utf8();
            return Some(Token::Glyph(&rest[..ch.len_utf8()]));
        }

        let Some(marker) = chars.next() else {
            panic!("unterminated markup: `{{` at end of text");
        };
        self.pos += 1 + marker.len_utf8();

        if marker == '{' {
            return Some(Token::Glyph(&rest[..1]));
        }
        match Style::from_marker(marker) {
            Some(style) => Some(Token::Markup(style)),
            None => panic!("unknown markup marker {marker:?}"),
        }
    }
}

/// Columns occupied by `tokens`.
#[must_use]
pub fn width(tokens: &[Token<'_>]) -> usize {
    tokens.iter().map(|t| t.width()).sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
