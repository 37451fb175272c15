// SPDX-License-Identifier: MIT
//
// Canvas — a fixed-capacity grid of cells over a flat byte buffer.
//
// The canvas owns no memory of its own. It is handed a storage buffer (a
// borrowed slice, a Vec, a fixed array) and splits it into two regions:
//
//   ┌──────────────────────────────┬──────────────────────────────┐
//   │ glyph slots (5 bytes / cell) │ mode slots (8 bytes / cell)  │
//   └──────────────────────────────┴──────────────────────────────┘
//
// Both regions are indexed row-major by `y * width + x`. A glyph slot holds
// at most one UTF-8 code point followed by NUL padding; an all-zero slot is
// an empty cell. The mode layout is described in `cell.rs`.
//
// Storage that is too small does not fail: the canvas keeps as many whole
// cells as fit and reports the size it wanted through `required_size()`.
// Cells past the usable count behave like coordinates outside the canvas.

use crate::cell::{MODE_STRIDE, Mode};
use crate::color::Palette;
use crate::utf8;

/// Bytes per glyph slot: up to four UTF-8 bytes plus a terminator.
pub const GLYPH_STRIDE: usize = 5;

/// Bytes of storage per cell.
pub const CELL_SIZE: usize = GLYPH_STRIDE + MODE_STRIDE;

/// Storage bytes needed for a `width × height` canvas. Saturates instead of
/// overflowing.
///
/// ```
/// assert_eq!(ansmap_term::canvas::required_size(80, 24), 80 * 24 * 13);
/// ```
#[inline]
#[must_use]
pub const fn required_size(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(CELL_SIZE)
}

// ─── Canvas ──────────────────────────────────────────────────────────────────

/// A grid of styled glyph cells backed by caller-chosen storage.
///
/// ```
/// use ansmap_term::canvas::{self, Canvas};
///
/// let mut storage = [0u8; canvas::required_size(4, 2)];
/// let mut canvas = Canvas::init(4, 2, &mut storage[..]);
/// canvas.put_glyph(1, 0, "é");
/// assert_eq!(canvas.glyph(1, 0), Some("é"));
/// assert_eq!(canvas.glyph(9, 0), None);
/// ```
#[derive(Debug, Clone)]
pub struct Canvas<S = Vec<u8>> {
    width: u32,
    height: u32,
    cells: usize,
    storage: S,
    palette: Palette,
}

impl Canvas<Vec<u8>> {
    /// A canvas over a freshly allocated, exactly sized buffer.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::init(width, height, vec![0; required_size(width, height)])
    }
}

impl<S: AsRef<[u8]> + AsMut<[u8]>> Canvas<S> {
    /// Wrap `storage` as a `width × height` canvas and clear every cell.
    ///
    /// When `storage` holds fewer than [`required_size`] bytes, only the
    /// leading cells that fit are usable. Compare
    /// [`Canvas::required_size`] with the storage length to detect this.
    ///
    /// ```
    /// use ansmap_term::canvas::{CELL_SIZE, Canvas};
    ///
    /// let canvas = Canvas::init(4, 4, vec![0u8; CELL_SIZE * 5]);
    /// if canvas.storage().len() < canvas.required_size() {
    ///     assert_eq!(canvas.usable_cells(), 5);
    /// }
    /// assert_eq!(canvas.required_size(), 4 * 4 * CELL_SIZE);
    /// ```
    pub fn init(width: u32, height: u32, storage: S) -> Self {
        let wanted = (width as usize).saturating_mul(height as usize);
        let fits = storage.as_ref().len() / CELL_SIZE;
        let cells = wanted.min(fits);

        if cells < wanted {
            tracing::debug!(
                width,
                height,
                usable = cells,
                wanted,
                "canvas storage too small, truncating"
            );
        }

        let mut canvas = Self {
            width,
            height,
            cells,
            storage,
            palette: Palette::default(),
        };
        canvas.clear();
        canvas
    }

    // ─── Geometry ─────────────────────────────────────────────────────────

    /// Width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells backed by storage.
    #[inline]
    #[must_use]
    pub const fn usable_cells(&self) -> usize {
        self.cells
    }

    /// Storage bytes the full canvas needs, regardless of what was provided.
    #[inline]
    #[must_use]
    pub const fn required_size(&self) -> usize {
        required_size(self.width, self.height)
    }

    /// The raw storage buffer.
    #[inline]
    #[must_use]
    pub fn storage(&self) -> &[u8] {
        self.storage.as_ref()
    }

    /// Give the storage back.
    #[inline]
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    // ─── Configuration ────────────────────────────────────────────────────

    /// Palette used when rendering escape sequences.
    #[inline]
    #[must_use]
    pub const fn palette(&self) -> Palette {
        self.palette
    }

    /// Change the rendering palette. Stored colors are unaffected.
    #[inline]
    pub const fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    // ─── Cells ────────────────────────────────────────────────────────────

    /// Zero every usable glyph and mode slot.
    pub fn clear(&mut self) {
        let (glyphs, modes) = self.regions_mut();
        glyphs.fill(0);
        modes.fill(0);
    }

    /// The glyph at `(x, y)`: `None` outside the canvas, `Some("")` for an
    /// empty cell.
    #[must_use]
    pub fn glyph(&self, x: u32, y: u32) -> Option<&str> {
        let idx = self.index(x, y)?;
        let (glyphs, _) = self.regions();
        let slot = &glyphs[idx * GLYPH_STRIDE..(idx + 1) * GLYPH_STRIDE];
        Some(utf8::first_code_point(slot).unwrap_or(""))
    }

    /// Store the first code point of `glyph` at `(x, y)`.
    ///
    /// Returns the stored glyph, or `None` (writing nothing) when the
    /// coordinates are outside the canvas or `glyph` does not start with a
    /// valid code point. Empty input clears the cell's glyph.
    pub fn put_glyph(&mut self, x: u32, y: u32, glyph: impl AsRef<[u8]>) -> Option<&str> {
        let bytes = glyph.as_ref();
        let len = utf8::code_point_len(bytes)?;
        let idx = self.index(x, y)?;

        let (glyphs, _) = self.regions_mut();
        let slot = &mut glyphs[idx * GLYPH_STRIDE..(idx + 1) * GLYPH_STRIDE];
        slot.fill(0);
        slot[..len].copy_from_slice(&bytes[..len]);
        std::str::from_utf8(&slot[..len]).ok()
    }

    /// The mode at `(x, y)`, or [`Mode::BROKEN`] outside the canvas.
    #[must_use]
    pub fn mode(&self, x: u32, y: u32) -> Mode {
        let Some(idx) = self.index(x, y) else {
            return Mode::BROKEN;
        };
        let (_, modes) = self.regions();
        <&[u8; MODE_STRIDE]>::try_from(&modes[idx * MODE_STRIDE..(idx + 1) * MODE_STRIDE])
            .map_or(Mode::BROKEN, Mode::from_bytes)
    }

    /// Store `mode` at `(x, y)`. Returns `false` outside the canvas.
    pub fn put_mode(&mut self, x: u32, y: u32, mode: Mode) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        let (_, modes) = self.regions_mut();
        modes[idx * MODE_STRIDE..(idx + 1) * MODE_STRIDE].copy_from_slice(&mode.to_bytes());
        true
    }

    // ─── Sprites ──────────────────────────────────────────────────────────

    /// Overlay `sprite` with its top-left corner at `(x, y)`.
    ///
    /// Sprite cells with an empty glyph and a plain mode are transparent;
    /// every other cell replaces both glyph and mode underneath. Parts that
    /// land outside this canvas are clipped.
    pub fn draw_sprite<T: AsRef<[u8]> + AsMut<[u8]>>(&mut self, x: i64, y: i64, sprite: &Canvas<T>) {
        for sy in 0..sprite.height() {
            let Ok(ty) = u32::try_from(y.saturating_add(i64::from(sy))) else {
                continue;
            };
            for sx in 0..sprite.width() {
                let Ok(tx) = u32::try_from(x.saturating_add(i64::from(sx))) else {
                    continue;
                };
                let (Some(glyph), mode) = (sprite.glyph(sx, sy), sprite.mode(sx, sy)) else {
                    continue;
                };
                if glyph.is_empty() && mode.is_plain() {
                    continue;
                }
                if self.put_mode(tx, ty, mode) {
                    self.put_glyph(tx, ty, glyph);
                }
            }
        }
    }

    // ─── Internals ────────────────────────────────────────────────────────

    /// Row-major cell index, if `(x, y)` is a usable cell.
    #[inline]
    pub(crate) fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize)
            .checked_mul(self.width as usize)?
            .checked_add(x as usize)?;
        (idx < self.cells).then_some(idx)
    }

    fn regions(&self) -> (&[u8], &[u8]) {
        let used = &self.storage.as_ref()[..self.cells * CELL_SIZE];
        used.split_at(self.cells * GLYPH_STRIDE)
    }

    fn regions_mut(&mut self) -> (&mut [u8], &mut [u8]) {
        let split = self.cells * GLYPH_STRIDE;
        let used = &mut self.storage.as_mut()[..self.cells * CELL_SIZE];
        used.split_at_mut(split)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
