// SPDX-License-Identifier: MIT
//
// Canvas → document.
//
// Layer 0 carries every glyph row. Styles are split into groups (foreground
// colors, background colors, then each decoration on its own) and every group
// is written as few layers as a greedy cover allows: within one layer, the
// bit shared by the most still-free cells is placed first, ties going to the
// higher bit, until no remaining bit fits. A cell whose style uses several
// bits of one group (an averaged color) spreads them over several layers.

use std::io;

use ansmap_term::{Canvas, Output, Style, utf8};

use crate::EncodeFlags;
use crate::parse::{
    BOTTOM_LEFT, BOTTOM_RIGHT, RULE, SEP_LEFT, SEP_RIGHT, TOP_LEFT, TOP_RIGHT, WALL,
};

/// Write `canvas` as a document.
///
/// Returns the document length in bytes; see [`Output::deliver`] for buffers
/// that are too small.
///
/// # Errors
///
/// Propagates write errors from a stream destination.
///
/// # Panics
///
/// Panics if a buffer destination overlaps the canvas storage.
///
/// ```
/// use ansmap_doc::{EncodeFlags, encode};
/// use ansmap_term::{Canvas, Output, Style};
///
/// let mut canvas = Canvas::new(2, 1);
/// canvas.put_glyph(0, 0, "a");
/// canvas.put_style(0, 0, Style::FG_RED);
///
/// let mut doc = Vec::new();
/// encode(&canvas, EncodeFlags::empty(), Output::Stream(&mut doc)).unwrap();
/// assert_eq!(String::from_utf8(doc).unwrap(), "╔══╗\n║a ║\n╠══╣\n║r ║\n╚══╝");
/// ```
#[tracing::instrument(skip_all, fields(width = canvas.width(), height = canvas.height()))]
pub fn encode<S: AsRef<[u8]> + AsMut<[u8]>>(
    canvas: &Canvas<S>,
    flags: EncodeFlags,
    out: Output<'_>,
) -> io::Result<usize> {
    let doc = Document::build(canvas, flags);
    tracing::debug!(layers = doc.layers, bytes = doc.text.len(), "document encoded");
    out.deliver(doc.text.as_bytes(), canvas.storage())
}

// ─── Document builder ────────────────────────────────────────────────────────

struct Document {
    text: String,
    width: usize,
    height: usize,
    /// Layers written so far, layer 0 included.
    layers: usize,
}

impl Document {
    fn build<S: AsRef<[u8]> + AsMut<[u8]>>(canvas: &Canvas<S>, flags: EncodeFlags) -> Self {
        let mut doc = Self {
            text: String::new(),
            width: canvas.width() as usize,
            height: canvas.height() as usize,
            layers: 0,
        };
        doc.rule(TOP_LEFT, TOP_RIGHT);
        doc.glyph_layer(canvas);

        let styles: Vec<Style> = (0..canvas.height())
            .flat_map(|y| (0..canvas.width()).map(move |x| canvas.style(x, y)))
            .collect();
        for group in groups(flags) {
            let mut pending: Vec<Style> = styles.iter().map(|&s| s & group.mask).collect();
            while pending.iter().any(|s| !s.is_empty()) {
                let markers = cover(&group, &mut pending);
                doc.style_layer(&markers, flags.contains(EncodeFlags::DEFLATE));
            }
        }

        doc.rule(BOTTOM_LEFT, BOTTOM_RIGHT);
        doc
    }

    fn rule(&mut self, left: char, right: char) {
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push(left);
        self.text.extend(std::iter::repeat_n(RULE, self.width));
        self.text.push(right);
    }

    fn row(&mut self, cells: impl Iterator<Item = char>) {
        self.text.push('\n');
        self.text.push(WALL);
        self.text.extend(cells);
        self.text.push(WALL);
    }

    fn glyph_layer<S: AsRef<[u8]> + AsMut<[u8]>>(&mut self, canvas: &Canvas<S>) {
        for y in 0..canvas.height() {
            let glyphs = (0..canvas.width()).map(|x| {
                canvas
                    .glyph(x, y)
                    .filter(|g| utf8::is_printable(g.as_bytes()))
                    .and_then(|g| g.chars().next())
                    .unwrap_or(' ')
            });
            self.row(glyphs);
        }
        self.layers += 1;
    }

    fn style_layer(&mut self, markers: &[char], deflate: bool) {
        self.rule(SEP_LEFT, SEP_RIGHT);
        let rows = if deflate {
            markers
                .chunks(self.width.max(1))
                .rposition(|row| row.iter().any(|&m| m != ' '))
                .map_or(0, |last| last + 1)
        } else {
            self.height
        };
        for y in 0..rows {
            let start = y * self.width;
            self.row(markers[start..start + self.width].iter().copied());
        }
        self.layers += 1;
    }
}

// ─── Greedy cover ────────────────────────────────────────────────────────────

/// A set of style bits that share layers.
struct Group {
    mask: Style,
    /// Single bits with their markers, ascending.
    bits: Vec<(Style, char)>,
}

impl Group {
    fn new(candidates: Style) -> Self {
        let bits: Vec<(Style, char)> = (0..u64::BITS)
            .map(|i| Style::from_bits_retain(1 << i))
            .filter(|&bit| candidates.contains(bit))
            .filter_map(|bit| bit.marker().map(|m| (bit, m)))
            .collect();
        let mask = bits.iter().fold(Style::empty(), |acc, &(bit, _)| acc | bit);
        Self { mask, bits }
    }
}

fn groups(flags: EncodeFlags) -> Vec<Group> {
    if flags.contains(EncodeFlags::FLATTEN) {
        return vec![Group::new(Style::all())];
    }
    let rest = Style::all() - Style::FG_COLORS - Style::BG_COLORS;
    let mut groups = vec![Group::new(Style::FG_COLORS), Group::new(Style::BG_COLORS)];
    groups.extend(
        (0..u64::BITS)
            .map(|i| Style::from_bits_retain(1 << i))
            .filter(|&bit| rest.contains(bit))
            .map(Group::new),
    );
    groups
}

/// Fill one layer from `pending`, removing every placed bit.
fn cover(group: &Group, pending: &mut [Style]) -> Vec<char> {
    let mut markers = vec![' '; pending.len()];
    loop {
        let best = group
            .bits
            .iter()
            .map(|&(bit, marker)| {
                let free = pending
                    .iter()
                    .zip(&markers)
                    .filter(|&(s, &m)| m == ' ' && s.contains(bit))
                    .count();
                (free, bit, marker)
            })
            .filter(|&(free, ..)| free > 0)
            .max_by_key(|&(free, bit, _)| (free, bit.bits()));
        let Some((_, bit, marker)) = best else {
            break;
        };
        for (s, m) in pending.iter_mut().zip(markers.iter_mut()) {
            if *m == ' ' && s.contains(bit) {
                *m = marker;
                s.remove(bit);
            }
        }
    }
    markers
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode, probe};
    use pretty_assertions::assert_eq;

    fn encoded<S: AsRef<[u8]> + AsMut<[u8]>>(canvas: &Canvas<S>, flags: EncodeFlags) -> String {
        let mut out = Vec::new();
        let n = encode(canvas, flags, Output::Stream(&mut out)).unwrap();
        assert_eq!(n, out.len());
        String::from_utf8(out).unwrap()
    }

    /// Three cells: italic red, italic, red.
    fn mixed() -> Canvas {
        let mut canvas = Canvas::new(3, 1);
        canvas.put_style(0, 0, Style::ITALIC | Style::FG_RED);
        canvas.put_style(1, 0, Style::ITALIC);
        canvas.put_style(2, 0, Style::FG_RED);
        canvas
    }

    // ── Layout ──────────────────────────────────────────────────────────

    #[test]
    fn plain_canvas_has_only_layer_zero() {
        let mut canvas = Canvas::new(3, 2);
        canvas.put_glyph(0, 0, "h");
        canvas.put_glyph(2, 1, "é");
        assert_eq!(
            encoded(&canvas, EncodeFlags::empty()),
            "╔═══╗\n║h  ║\n║  é║\n╚═══╝"
        );
    }

    #[test]
    fn unprintable_glyphs_become_spaces() {
        let mut canvas = Canvas::new(2, 1);
        canvas.put_glyph(0, 0, "\x07");
        canvas.put_glyph(1, 0, "k");
        assert_eq!(encoded(&canvas, EncodeFlags::empty()), "╔══╗\n║ k║\n╚══╝");
    }

    #[test]
    fn groups_get_their_own_layers() {
        assert_eq!(
            encoded(&mixed(), EncodeFlags::empty()),
            "╔═══╗\n║   ║\n╠═══╣\n║r r║\n╠═══╣\n║// ║\n╚═══╝"
        );
    }

    #[test]
    fn flatten_shares_layers_and_ties_go_high() {
        // Italic and red both cover two cells; red is the higher bit.
        assert_eq!(
            encoded(&mixed(), EncodeFlags::FLATTEN),
            "╔═══╗\n║   ║\n╠═══╣\n║r/r║\n╠═══╣\n║/  ║\n╚═══╝"
        );
    }

    #[test]
    fn most_cells_first() {
        let mut canvas = Canvas::new(3, 1);
        canvas.put_style(0, 0, Style::UNDERLINE | Style::FG_BLUE);
        canvas.put_style(1, 0, Style::UNDERLINE);
        canvas.put_style(2, 0, Style::UNDERLINE);
        assert_eq!(
            encoded(&canvas, EncodeFlags::FLATTEN),
            "╔═══╗\n║   ║\n╠═══╣\n║___║\n╠═══╣\n║b  ║\n╚═══╝"
        );
    }

    #[test]
    fn deflate_trims_style_rows_only() {
        let mut canvas = Canvas::new(1, 3);
        canvas.put_style(0, 0, Style::BG_GREEN);
        assert_eq!(
            encoded(&canvas, EncodeFlags::empty()),
            "╔═╗\n║ ║\n║ ║\n║ ║\n╠═╣\n║G║\n║ ║\n║ ║\n╚═╝"
        );
        assert_eq!(
            encoded(&canvas, EncodeFlags::DEFLATE),
            "╔═╗\n║ ║\n║ ║\n║ ║\n╠═╣\n║G║\n╚═╝"
        );
    }

    // ── Round trips ─────────────────────────────────────────────────────

    #[test]
    fn two_cells_round_trip() {
        let mut canvas = Canvas::new(2, 1);
        canvas.put_glyph(0, 0, "a");
        canvas.put_style(0, 0, Style::FG_RED | Style::UNDERLINE);
        let doc = encoded(&canvas, EncodeFlags::empty());
        assert_eq!(doc, "╔══╗\n║a ║\n╠══╣\n║r ║\n╠══╣\n║_ ║\n╚══╝");

        let size = probe(doc.as_bytes()).unwrap();
        let mut back = Canvas::new(size.width, size.height);
        decode(&mut back, doc.as_bytes()).unwrap();
        assert_eq!(back.glyph(0, 0), Some("a"));
        assert_eq!(back.glyph(1, 0), Some(""));
        assert_eq!(back.style(0, 0), Style::FG_RED | Style::UNDERLINE);
        assert_eq!(back.style(1, 0), Style::empty());
    }

    #[test]
    fn averaged_colors_survive_a_round_trip() {
        let mut canvas = Canvas::new(1, 1);
        canvas.put_style(0, 0, Style::FG_BLACK | Style::FG_WHITE);
        let before = canvas.mode(0, 0);

        let doc = encoded(&canvas, EncodeFlags::DEFLATE);
        let mut back = Canvas::new(1, 1);
        decode(&mut back, doc.as_bytes()).unwrap();
        assert_eq!(back.mode(0, 0).foreground(), before.foreground());
    }

    #[test]
    fn style_only_document_encodes_its_empty_glyph_layer() {
        let doc = "╔══╗\n╠══╣\n║ Y║\n╚══╝";
        let size = probe(doc.as_bytes()).unwrap();
        let mut canvas = Canvas::new(size.width, size.height);
        decode(&mut canvas, doc.as_bytes()).unwrap();
        assert_eq!(
            encoded(&canvas, EncodeFlags::empty()),
            "╔══╗\n║  ║\n╠══╣\n║ Y║\n╚══╝"
        );
    }

    // ── Output ──────────────────────────────────────────────────────────

    #[test]
    fn short_buffer_reports_size() {
        let canvas = mixed();
        let mut buf = [0xAA; 8];
        let needed = encode(&canvas, EncodeFlags::empty(), Output::Buffer(&mut buf)).unwrap();
        assert_eq!(needed, encoded(&canvas, EncodeFlags::empty()).len());
        assert_eq!(buf[0], 0);
        assert_eq!(buf[1], 0xAA);
    }

    #[test]
    fn buffer_receives_the_document() {
        let mut canvas = Canvas::new(1, 1);
        canvas.put_glyph(0, 0, "z");
        let mut buf = [0u8; 64];
        let n = encode(&canvas, EncodeFlags::empty(), Output::Buffer(&mut buf)).unwrap();
        assert_eq!(std::str::from_utf8(&buf[..n]).unwrap(), "╔═╗\n║z║\n╚═╝");
    }
}
