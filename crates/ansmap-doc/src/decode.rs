// SPDX-License-Identifier: MIT
//
// Document → canvas.
//
// Decoding runs in two passes over the parsed layers. The first unions the
// style markers of every layer per cell and resolves each union once with
// `put_style`; the second writes the layer 0 glyphs. A space in layer 0 is
// an empty cell, a space in a style layer contributes nothing.

use ansmap_term::{Canvas, Style, canvas};

use crate::DocumentSize;
use crate::error::DecodeError;
use crate::parse::{self, Parsed};

/// Measure a document without decoding it.
///
/// The returned [`DocumentSize::bytes`] is the canvas storage that
/// [`decode`] needs to hold the whole document.
///
/// # Errors
///
/// Returns the same error [`decode`] would for a malformed document.
///
/// ```
/// let size = ansmap_doc::probe("╔═══╗\n║hey║\n╚═══╝".as_bytes()).unwrap();
/// assert_eq!((size.width, size.height), (3, 1));
/// ```
#[tracing::instrument(skip_all, fields(len = doc.len()))]
pub fn probe(doc: &[u8]) -> Result<DocumentSize, DecodeError> {
    parse::parse(doc)
        .map(|parsed| size_of(&parsed))
        .inspect_err(|error| tracing::debug!(%error, "document rejected"))
}

/// Clear `canvas` and draw the document onto it.
///
/// Cells outside the canvas are dropped; size the canvas with [`probe`] to
/// keep everything.
///
/// # Errors
///
/// Returns a [`DecodeError`] for malformed documents. The canvas is left
/// cleared.
#[tracing::instrument(skip_all, fields(len = doc.len()))]
pub fn decode<S: AsRef<[u8]> + AsMut<[u8]>>(
    canvas: &mut Canvas<S>,
    doc: &[u8],
) -> Result<DocumentSize, DecodeError> {
    canvas.clear();
    let parsed =
        parse::parse(doc).inspect_err(|error| tracing::debug!(%error, "document rejected"))?;

    let width = parsed.width.min(canvas.width()) as usize;
    let height = parsed.height.min(canvas.height()) as usize;

    // Pass one: styles.
    let mut styles = vec![Style::empty(); width * height];
    let mut touched = Touched::default();
    for layer in parsed.layers.iter().skip(1) {
        for (y, row) in layer.iter().take(height).enumerate() {
            for (x, marker) in row.chars().take(width).enumerate() {
                if let Some(style) = Style::from_marker(marker) {
                    styles[y * width + x] |= style;
                    touched.add(x, y);
                }
            }
        }
    }
    if let Some((x0, y0, x1, y1)) = touched.bounds {
        for y in y0..=y1 {
            for x in x0..=x1 {
                let style = styles[y * width + x];
                if !style.is_empty() {
                    put(canvas, x, y, |c, x, y| c.put_style(x, y, resolve_resets(style)));
                }
            }
        }
    }

    // Pass two: glyphs.
    if let Some(glyphs) = parsed.layers.first() {
        for (y, row) in glyphs.iter().take(height).enumerate() {
            for (x, ch) in row.chars().take(width).enumerate() {
                if ch != ' ' {
                    let mut buf = [0u8; 4];
                    put(canvas, x, y, |c, x, y| {
                        c.put_glyph(x, y, ch.encode_utf8(&mut buf)).is_some()
                    });
                }
            }
        }
    }

    let size = size_of(&parsed);
    tracing::debug!(
        width = size.width,
        height = size.height,
        layers = parsed.layers.len(),
        "document decoded"
    );
    Ok(size)
}

/// Bounding box of the cells that received a marker, inclusive.
#[derive(Default)]
struct Touched {
    bounds: Option<(usize, usize, usize, usize)>,
}

impl Touched {
    fn add(&mut self, x: usize, y: usize) {
        self.bounds = Some(match self.bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
}

fn size_of(parsed: &Parsed<'_>) -> DocumentSize {
    DocumentSize {
        width: parsed.width,
        height: parsed.height,
        bytes: canvas::required_size(parsed.width, parsed.height),
    }
}

/// Reset markers act on the union they belong to: `X` drops it, `x` keeps
/// only the background.
fn resolve_resets(style: Style) -> Style {
    let base = style - Style::RESETS;
    if style.contains(Style::HARD_RESET) {
        Style::empty()
    } else if style.contains(Style::SOFT_RESET) {
        base & Style::BG_COLORS
    } else {
        base
    }
}

/// Run a cell write with `usize` coordinates already clipped to the canvas.
fn put<S, F>(canvas: &mut Canvas<S>, x: usize, y: usize, write: F) -> bool
where
    F: FnOnce(&mut Canvas<S>, u32, u32) -> bool,
{
    match (u32::try_from(x), u32::try_from(y)) {
        (Ok(x), Ok(y)) => write(canvas, x, y),
        _ => false,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
