//! Drawing text onto a canvas — glyphs, aligned lines, wrapped paragraphs.

use std::fmt;

use ansmap_term::style::Style;
use ansmap_term::{Canvas, Mode, utf8};

use crate::markup::{self, Token};
use crate::wrap;

/// Horizontal placement of a line relative to its anchor column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Align {
    /// The first glyph lands on the anchor.
    #[default]
    Left,
    /// The line is shifted left by half its width.
    Center,
    /// The last glyph lands on the anchor.
    Right,
}

impl Align {
    /// Column of the first glyph for a line `width` wide anchored at `x`.
    #[must_use]
    pub fn start(self, x: i64, width: usize) -> i64 {
        let width = i64::try_from(width).unwrap_or(i64::MAX);
        match self {
            Self::Left => x,
            Self::Center => x.saturating_sub(width / 2),
            Self::Right => x.saturating_sub(width).saturating_add(1),
        }
    }
}

/// Text drawing on top of a [`Canvas`].
///
/// Coordinates are signed: text may start left of or above the canvas and
/// only the visible part is drawn. Widths count code points.
pub trait TextLayout {
    /// Draw the first code point of `glyph` at `(x, y)`.
    ///
    /// A single-byte control character is drawn as `?`. The cell's
    /// background is kept unless `style` names a background.
    fn draw_glyph(&mut self, style: Style, x: i64, y: i64, glyph: &str);

    /// Draw `text` as one line. Line breaks are not interpreted.
    fn draw_text(&mut self, style: Style, x: i64, y: i64, align: Align, text: &str);

    /// Draw `text` line by line, wrapping lines wider than `max_width`
    /// (`0` disables wrapping). Returns the number of lines drawn.
    fn draw_multiline_text(
        &mut self,
        style: Style,
        x: i64,
        y: i64,
        max_width: u32,
        align: Align,
        text: &str,
    ) -> usize;

    /// Like [`draw_multiline_text`](Self::draw_multiline_text), with inline
    /// `{c` markup. The style changes carry across lines.
    ///
    /// # Panics
    ///
    /// Panics on unknown markup or a trailing `{`.
    fn draw_rich_text(
        &mut self,
        style: Style,
        x: i64,
        y: i64,
        max_width: u32,
        align: Align,
        text: &str,
    ) -> usize;

    /// Format `args` and draw the result as rich text.
    ///
    /// ```
    /// use ansmap_term::{Canvas, Style};
    /// use ansmap_text::{Align, TextLayout};
    ///
    /// let mut canvas = Canvas::new(8, 1);
    /// canvas.draw_rich_text_fmt(Style::empty(), 0, 0, 0, Align::Left, format_args!("{{r{}%", 42));
    /// assert_eq!(canvas.row_text(0).as_deref(), Some("42%     "));
    /// ```
    ///
    /// # Panics
    ///
    /// Panics on unknown markup or a trailing `{` in the formatted text.
    fn draw_rich_text_fmt(
        &mut self,
        style: Style,
        x: i64,
        y: i64,
        max_width: u32,
        align: Align,
        args: fmt::Arguments<'_>,
    ) -> usize;
}

impl<S: AsRef<[u8]> + AsMut<[u8]>> TextLayout for Canvas<S> {
    fn draw_glyph(&mut self, style: Style, x: i64, y: i64, glyph: &str) {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };

        let glyph = match utf8::first_code_point(glyph.as_bytes()) {
            Some(g) if g.len() == 1 && !utf8::is_printable(g.as_bytes()) => "?",
            Some(g) => g,
            None => "",
        };
        if self.put_glyph(x, y, glyph).is_none() {
            return;
        }

        let mut mode = Mode::from(style);
        if !style.intersects(Style::BG_COLORS) {
            mode = mode.with_background(self.mode(x, y).background());
        }
        self.put_mode(x, y, mode);
    }

    fn draw_text(&mut self, style: Style, x: i64, y: i64, align: Align, text: &str) {
        let tokens: Vec<_> = markup::plain(text).collect();
        draw_tokens(self, style, x, y, align, &tokens);
    }

    fn draw_multiline_text(
        &mut self,
        style: Style,
        x: i64,
        y: i64,
        max_width: u32,
        align: Align,
        text: &str,
    ) -> usize {
        let mut printer = Printer::new(self, style, x, y, max_width, align);
        for line in wrap::lines(text) {
            printer.line(&markup::plain(line).collect::<Vec<_>>());
        }
        printer.lines
    }

    fn draw_rich_text(
        &mut self,
        style: Style,
        x: i64,
        y: i64,
        max_width: u32,
        align: Align,
        text: &str,
    ) -> usize {
        let mut printer = Printer::new(self, style, x, y, max_width, align);
        for line in wrap::lines(text) {
            printer.line(&markup::rich(line).collect::<Vec<_>>());
        }
        printer.lines
    }

    fn draw_rich_text_fmt(
        &mut self,
        style: Style,
        x: i64,
        y: i64,
        max_width: u32,
        align: Align,
        args: fmt::Arguments<'_>,
    ) -> usize {
        match args.as_str() {
            Some(text) => self.draw_rich_text(style, x, y, max_width, align, text),
            None => self.draw_rich_text(style, x, y, max_width, align, &args.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

/// Draw one line of tokens, applying markup as it goes. Returns the style in
/// effect after the last token.
fn draw_tokens<S: AsRef<[u8]> + AsMut<[u8]>>(
    canvas: &mut Canvas<S>,
    mut style: Style,
    x: i64,
    y: i64,
    align: Align,
    tokens: &[Token<'_>],
) -> Style {
    let mut x = align.start(x, markup::width(tokens));
    for token in tokens {
        match *token {
            Token::Markup(m) => style = style.then(m),
            Token::Glyph(g) => {
                canvas.draw_glyph(style, x, y, g);
                x = x.saturating_add(1);
            }
        }
    }
    style
}

/// Apply the markup among `tokens` without drawing anything.
fn skip_tokens(mut style: Style, tokens: &[Token<'_>]) -> Style {
    for token in tokens {
        if let Token::Markup(m) = *token {
            style = style.then(m);
        }
    }
    style
}

/// Paragraph state: the running style and how many lines went out.
struct Printer<'c, S> {
    canvas: &'c mut Canvas<S>,
    style: Style,
    x: i64,
    y: i64,
    max_width: usize,
    align: Align,
    lines: usize,
}

impl<'c, S: AsRef<[u8]> + AsMut<[u8]>> Printer<'c, S> {
    fn new(
        canvas: &'c mut Canvas<S>,
        style: Style,
        x: i64,
        y: i64,
        max_width: u32,
        align: Align,
    ) -> Self {
        Self {
            canvas,
            style,
            x,
            y,
            max_width: max_width as usize,
            align,
            lines: 0,
        }
    }

    /// Draw one source line, wrapping as needed.
    fn line(&mut self, tokens: &[Token<'_>]) {
        let mut rest = tokens;
        loop {
            let end = if self.max_width == 0 || markup::width(rest) <= self.max_width {
                rest.len()
            } else {
                wrap::wrap_end(rest, self.max_width)
            };
            self.emit(&rest[..end]);

            let next = wrap::skip_spaces(rest, end);
            self.style = skip_tokens(self.style, &rest[end..next]);
            rest = &rest[next..];
            if rest.is_empty() {
                break;
            }
        }
    }

    fn emit(&mut self, tokens: &[Token<'_>]) {
        let y = self
            .y
            .saturating_add(i64::try_from(self.lines).unwrap_or(i64::MAX));
        self.style = draw_tokens(self.canvas, self.style, self.x, y, self.align, tokens);
        self.lines += 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ansmap_term::Rgb;
    use pretty_assertions::assert_eq;

    fn rows(canvas: &Canvas) -> Vec<String> {
        (0..canvas.height())
            .filter_map(|y| canvas.row_text(y))
            .collect()
    }

    // -- draw_glyph ----------------------------------------------------------

    #[test]
    fn glyph_outside_is_ignored() {
        let mut canvas = Canvas::new(2, 2);
        canvas.draw_glyph(Style::FG_RED, -1, 0, "a");
        canvas.draw_glyph(Style::FG_RED, 0, 2, "a");
        canvas.draw_glyph(Style::FG_RED, i64::MAX, 0, "a");
        assert_eq!(rows(&canvas), ["  ", "  "]);
    }

    #[test]
    fn glyph_keeps_first_code_point() {
        let mut canvas = Canvas::new(1, 1);
        canvas.draw_glyph(Style::empty(), 0, 0, "日本");
        assert_eq!(canvas.glyph(0, 0), Some("日"));
    }

    #[test]
    fn control_glyph_becomes_question_mark() {
        let mut canvas = Canvas::new(1, 1);
        canvas.draw_glyph(Style::empty(), 0, 0, "\x07");
        assert_eq!(canvas.glyph(0, 0), Some("?"));
    }

    #[test]
    fn glyph_keeps_background() {
        let mut canvas = Canvas::new(1, 1);
        canvas.put_style(0, 0, Style::BG_NAVY);
        canvas.draw_glyph(Style::FG_WHITE, 0, 0, "x");
        assert_eq!(canvas.style(0, 0), Style::FG_WHITE | Style::BG_NAVY);
    }

    #[test]
    fn explicit_background_replaces() {
        let mut canvas = Canvas::new(1, 1);
        canvas.put_style(0, 0, Style::BG_NAVY);
        canvas.draw_glyph(Style::BG_NONE, 0, 0, "x");
        assert_eq!(canvas.mode(0, 0).background(), None);

        canvas.draw_glyph(Style::BG_LIME, 0, 0, "x");
        assert_eq!(canvas.mode(0, 0).background(), Some(Rgb::new(0, 255, 0)));
    }

    // -- draw_text -----------------------------------------------------------

    #[test]
    fn left_aligned() {
        let mut canvas = Canvas::new(5, 1);
        canvas.draw_text(Style::empty(), 1, 0, Align::Left, "abc");
        assert_eq!(rows(&canvas), [" abc "]);
    }

    #[test]
    fn right_alignment_ends_at_anchor() {
        let mut canvas = Canvas::new(5, 1);
        canvas.draw_text(Style::empty(), 3, 0, Align::Right, "abc");
        assert_eq!(rows(&canvas), [" abc "]);
    }

    #[test]
    fn center_alignment() {
        let mut canvas = Canvas::new(7, 1);
        canvas.draw_text(Style::empty(), 3, 0, Align::Center, "abcd");
        assert_eq!(rows(&canvas), [" abcd  "]);
    }

    #[test]
    fn width_counts_code_points() {
        let mut canvas = Canvas::new(4, 1);
        canvas.draw_text(Style::empty(), 3, 0, Align::Right, "日本");
        assert_eq!(rows(&canvas), ["  日本"]);
    }

    #[test]
    fn text_is_clipped() {
        let mut canvas = Canvas::new(3, 1);
        canvas.draw_text(Style::empty(), -2, 0, Align::Left, "hello");
        assert_eq!(rows(&canvas), ["llo"]);
    }

    #[test]
    fn text_is_styled() {
        let mut canvas = Canvas::new(2, 1);
        canvas.draw_text(Style::UNDERLINE, 0, 0, Align::Left, "ab");
        assert_eq!(canvas.style(1, 0), Style::UNDERLINE);
    }

    // -- draw_multiline_text -------------------------------------------------

    #[test]
    fn wraps_long_word() {
        let mut canvas = Canvas::new(4, 3);
        let n = canvas.draw_multiline_text(Style::empty(), 0, 0, 4, Align::Left, "aaaaaaaaaa");
        assert_eq!(n, 3);
        assert_eq!(rows(&canvas), ["aaaa", "aaaa", "aa  "]);
    }

    #[test]
    fn explicit_lines() {
        let mut canvas = Canvas::new(3, 3);
        let n = canvas.draw_multiline_text(Style::empty(), 0, 0, 0, Align::Left, "ab\r\n\ncd");
        assert_eq!(n, 3);
        assert_eq!(rows(&canvas), ["ab ", "   ", "cd "]);
    }

    #[test]
    fn zero_width_does_not_wrap() {
        let mut canvas = Canvas::new(3, 2);
        let n = canvas.draw_multiline_text(Style::empty(), 0, 0, 0, Align::Left, "a b c d");
        assert_eq!(n, 1);
        assert_eq!(rows(&canvas), ["a b", "   "]);
    }

    #[test]
    fn wrapped_lines_are_aligned() {
        let mut canvas = Canvas::new(5, 2);
        canvas.draw_multiline_text(Style::empty(), 4, 0, 5, Align::Right, "ab cdef");
        assert_eq!(rows(&canvas), ["   ab", " cdef"]);
    }

    #[test]
    fn line_count_includes_offscreen_lines() {
        let mut canvas = Canvas::new(2, 1);
        let n = canvas.draw_multiline_text(Style::empty(), 0, 0, 2, Align::Left, "aa bb cc");
        assert_eq!(n, 3);
        assert_eq!(rows(&canvas), ["aa"]);
    }

    #[test]
    fn empty_text_draws_nothing() {
        let mut canvas = Canvas::new(1, 1);
        assert_eq!(canvas.draw_multiline_text(Style::empty(), 0, 0, 1, Align::Left, ""), 0);
    }

    // -- draw_rich_text ------------------------------------------------------

    #[test]
    fn markup_styles_following_glyphs() {
        let mut canvas = Canvas::new(3, 1);
        canvas.draw_rich_text(Style::empty(), 0, 0, 0, Align::Left, "a{rb{xc");
        assert_eq!(rows(&canvas), ["abc"]);
        assert_eq!(canvas.style(0, 0), Style::empty());
        assert_eq!(canvas.style(1, 0), Style::FG_RED);
        assert_eq!(canvas.style(2, 0), Style::empty());
    }

    #[test]
    fn soft_reset_keeps_background() {
        let mut canvas = Canvas::new(2, 1);
        canvas.draw_rich_text(Style::empty(), 0, 0, 0, Align::Left, "{B{y{_a{xb");
        assert_eq!(canvas.style(0, 0), Style::FG_YELLOW | Style::BG_BLUE | Style::UNDERLINE);
        assert_eq!(canvas.style(1, 0), Style::BG_BLUE);
    }

    #[test]
    fn hard_reset_clears_background() {
        let mut canvas = Canvas::new(2, 1);
        canvas.draw_rich_text(Style::BG_MAROON, 0, 0, 0, Align::Left, "a{Xb");
        assert_eq!(canvas.style(0, 0), Style::BG_MAROON);
        assert_eq!(canvas.style(1, 0), Style::empty());
    }

    #[test]
    fn escaped_brace_is_one_column() {
        let mut canvas = Canvas::new(3, 1);
        canvas.draw_rich_text(Style::empty(), 2, 0, 0, Align::Right, "{{{r}");
        assert_eq!(rows(&canvas), [" {}"]);
        assert_eq!(canvas.style(2, 0), Style::FG_RED);
    }

    #[test]
    fn style_carries_across_lines() {
        let mut canvas = Canvas::new(3, 2);
        let n = canvas.draw_rich_text(Style::empty(), 0, 0, 3, Align::Left, "{gab cd");
        assert_eq!(n, 2);
        assert_eq!(rows(&canvas), ["ab ", "cd "]);
        assert_eq!(canvas.style(0, 1), Style::FG_GREEN);
    }

    #[test]
    fn markup_in_dropped_spaces_still_applies() {
        let mut canvas = Canvas::new(2, 2);
        canvas.draw_rich_text(Style::empty(), 0, 0, 2, Align::Left, "ab {_ cd");
        assert_eq!(rows(&canvas), ["ab", "cd"]);
        assert_eq!(canvas.style(0, 1), Style::UNDERLINE);
    }

    #[test]
    #[should_panic(expected = "unknown markup marker")]
    fn unknown_markup_panics() {
        let mut canvas = Canvas::new(4, 1);
        canvas.draw_rich_text(Style::empty(), 0, 0, 0, Align::Left, "{q");
    }

    #[test]
    fn formatted_rich_text() {
        let mut canvas = Canvas::new(6, 1);
        let n = canvas.draw_rich_text_fmt(
            Style::empty(),
            0,
            0,
            0,
            Align::Left,
            format_args!("{{m{}/{}", 3, 4),
        );
        assert_eq!(n, 1);
        assert_eq!(rows(&canvas), ["3/4   "]);
        assert_eq!(canvas.style(0, 0), Style::FG_MAGENTA);
    }

    // -- Align ---------------------------------------------------------------

    #[test]
    fn align_start() {
        assert_eq!(Align::Left.start(5, 3), 5);
        assert_eq!(Align::Right.start(5, 3), 3);
        assert_eq!(Align::Center.start(5, 3), 4);
        assert_eq!(Align::Right.start(0, 0), 1);
    }
}
