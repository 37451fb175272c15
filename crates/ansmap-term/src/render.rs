// SPDX-License-Identifier: MIT
//
// Escape-sequence rendering of a canvas.
//
// A region is one row or a horizontal cut of one. Each region starts from
// terminal defaults, emits the SGR transition in front of every cell whose
// projected codes differ from the previous cell's, and ends with a reset if
// it changed anything. Regions are independent, so any row can be redrawn
// on its own without knowing what was printed before it.
//
// The renderer never moves the cursor. A full render joins rows with CR LF
// and leaves placement to the caller.

use std::io::{self, Write};

use crate::ansi::{self, ModeCode};
use crate::canvas::Canvas;
use crate::output::Output;
use crate::utf8;

/// Printed in place of empty or unprintable glyphs.
const BLANK: &str = " ";

/// Rough bytes per cell for buffer preallocation.
const BYTES_PER_CELL: usize = 4;

impl<S: AsRef<[u8]> + AsMut<[u8]>> Canvas<S> {
    /// Render every row, joined by `\r\n`.
    ///
    /// Returns the number of bytes the output needs; see [`Output::deliver`]
    /// for buffers that are too small.
    ///
    /// # Errors
    ///
    /// Propagates write errors from a stream destination.
    ///
    /// # Panics
    ///
    /// Panics if a buffer destination overlaps this canvas's storage.
    pub fn render(&self, out: Output<'_>) -> io::Result<usize> {
        let rows = self.usable_rows();
        let mut buf = Vec::with_capacity(self.usable_cells().saturating_mul(BYTES_PER_CELL));
        for y in 0..rows {
            if y > 0 {
                buf.extend_from_slice(b"\r\n");
            }
            self.render_region(0, y, self.usable_width(y), &mut buf)?;
        }
        out.deliver(&buf, self.storage())
    }

    /// Render row `y`. Rows outside the canvas or past the usable cells
    /// produce nothing.
    ///
    /// # Errors
    ///
    /// Propagates write errors from a stream destination.
    ///
    /// # Panics
    ///
    /// Panics if a buffer destination overlaps this canvas's storage.
    pub fn render_row(&self, y: u32, out: Output<'_>) -> io::Result<usize> {
        self.render_row_cut(0, y, 0, out)
    }

    /// Render `width` cells of row `y` starting at column `x`. A `width` of
    /// zero means "to the end of the row"; cuts are clipped to the usable
    /// cells.
    ///
    /// # Errors
    ///
    /// Propagates write errors from a stream destination.
    ///
    /// # Panics
    ///
    /// Panics if a buffer destination overlaps this canvas's storage.
    pub fn render_row_cut(&self, x: u32, y: u32, width: u32, out: Output<'_>) -> io::Result<usize> {
        let mut buf = Vec::new();
        let row = self.usable_width(y);
        if x < row {
            let avail = row - x;
            let width = if width == 0 { avail } else { width.min(avail) };
            buf.reserve((width as usize).saturating_mul(BYTES_PER_CELL));
            self.render_region(x, y, width, &mut buf)?;
        }
        out.deliver(&buf, self.storage())
    }

    /// The glyphs of row `y` as plain text, with a space for every empty or
    /// unprintable cell. `None` outside the canvas; cells past the usable
    /// count are left out.
    #[must_use]
    pub fn row_text(&self, y: u32) -> Option<String> {
        if y >= self.height() {
            return None;
        }
        Some((0..self.usable_width(y)).map(|x| self.printable_glyph(x, y)).collect())
    }

    /// Cells of row `y` backed by storage.
    fn usable_width(&self, y: u32) -> u32 {
        if y >= self.height() {
            return 0;
        }
        let start = (y as usize).saturating_mul(self.width() as usize);
        let left = self.usable_cells().saturating_sub(start);
        u32::try_from(left).map_or(self.width(), |left| left.min(self.width()))
    }

    /// Rows holding at least one usable cell.
    fn usable_rows(&self) -> u32 {
        let width = self.width() as usize;
        if width == 0 {
            return 0;
        }
        let rows = self.usable_cells().div_ceil(width);
        u32::try_from(rows).map_or(self.height(), |rows| rows.min(self.height()))
    }

    fn printable_glyph(&self, x: u32, y: u32) -> &str {
        self.glyph(x, y)
            .filter(|g| utf8::is_printable(g.as_bytes()))
            .unwrap_or(BLANK)
    }

    fn render_region(&self, x: u32, y: u32, width: u32, w: &mut impl Write) -> io::Result<()> {
        let palette = self.palette();
        let mut prev = ModeCode::EMPTY;
        let mut styled = false;

        for x in x..x + width {
            let next = ModeCode::new(self.mode(x, y), palette);
            ansi::transition(w, &prev, &next)?;
            styled |= !next.is_empty();
            prev = next;

            w.write_all(self.printable_glyph(x, y).as_bytes())?;
        }

        if styled {
            ansi::reset(w)?;
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
