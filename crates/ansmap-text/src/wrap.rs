//! Line splitting and greedy word wrap over token runs.
//!
//! Wrapping works on *runs*: a run is any leading spaces followed by one
//! word (everything up to the next space). Runs are added to a line while
//! they fit. A first run that alone is too wide is hard-split at the width
//! limit. Markup tokens are zero-width and travel with the run they sit in.

use crate::markup::Token;

// ---------------------------------------------------------------------------
// Lines
// ---------------------------------------------------------------------------

/// Split `text` on `\n`, `\r`, `\r\n` and `\n\r`.
///
/// A trailing line break does not start an extra empty line; empty text has
/// no lines at all.
///
/// ```
/// let lines: Vec<_> = ansmap_text::wrap::lines("a\r\nb\n\rc\n").collect();
/// assert_eq!(lines, ["a", "b", "c"]);
/// ```
pub fn lines(text: &str) -> Lines<'_> {
    Lines { rest: text }
}

/// Iterator returned by [`lines`].
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let Some(end) = self.rest.find(['\n', '\r']) else {
            return Some(std::mem::take(&mut self.rest));
        };

        let line = &self.rest[..end];
        let bytes = self.rest.as_bytes();
        let pair = if bytes[end] == b'\n' { b'\r' } else { b'\n' };
        let skip = if bytes.get(end + 1) == Some(&pair) { 2 } else { 1 };
        self.rest = &self.rest[end + skip..];
        Some(line)
    }
}

// ---------------------------------------------------------------------------
// Runs
// ---------------------------------------------------------------------------

/// Index just past the spaces (and markup) starting at `from`.
#[must_use]
pub fn skip_spaces(tokens: &[Token<'_>], from: usize) -> usize {
    let mut pos = from;
    while tokens
        .get(pos)
        .is_some_and(|t| t.is_space() || matches!(t, Token::Markup(_)))
    {
        pos += 1;
    }
    pos
}

/// Index just past the word starting at `from`.
fn skip_word(tokens: &[Token<'_>], from: usize) -> usize {
    let mut pos = from;
    while tokens.get(pos).is_some_and(|t| !t.is_space()) {
        pos += 1;
    }
    pos
}

/// Index just past the first `max_width` glyphs, with at least one glyph
/// consumed.
fn skip_width(tokens: &[Token<'_>], max_width: usize) -> usize {
    let mut width = 0;
    let mut pos = 0;
    while let Some(token) = tokens.get(pos) {
        if width + token.width() > max_width.max(1) {
            break;
        }
        width += token.width();
        pos += 1;
    }
    pos
}

/// Where the first wrapped line of `tokens` ends.
///
/// Always consumes at least one glyph of a non-empty line, so callers that
/// loop on the remainder make progress.
#[must_use]
pub fn wrap_end(tokens: &[Token<'_>], max_width: usize) -> usize {
    let mut pos = 0;
    let mut width = 0;

    while pos < tokens.len() {
        let next = skip_word(tokens, skip_spaces(tokens, pos));
        let run: usize = tokens[pos..next].iter().map(|t| t.width()).sum();

        if width + run > max_width {
            if width == 0 {
                return skip_width(tokens, max_width);
            }
            break;
        }

        width += run;
        pos = next;
    }

    pos
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
