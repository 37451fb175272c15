// SPDX-License-Identifier: MIT

//! # ansmap — a terminal styled-text canvas
//!
//! One dependency for the whole workspace:
//!
//! - **[`term`]** — canvas, colors and styles, diffing SGR renderer
//! - **[`text`]** — aligned, wrapped and marked-up text on a canvas
//! - **[`doc`]** — canvas ↔ bordered layered plaintext documents
//!
//! ```text
//! decode / draw_* ──► canvas cells ──► render ──► Output (buffer or stream)
//! ```
//!
//! ```
//! use ansmap::{Align, Canvas, Output, Style, TextLayout};
//!
//! let mut canvas = Canvas::new(8, 1);
//! canvas.draw_rich_text(Style::empty(), 4, 0, 0, Align::Center, "{gok");
//!
//! let mut out = Vec::new();
//! canvas.render(Output::Stream(&mut out)).unwrap();
//! assert_eq!(out, b"   \x1b[32mok\x1b[0m   \x1b[0m");
//! ```

pub use ansmap_doc as doc;
pub use ansmap_term as term;
pub use ansmap_text as text;

pub use ansmap_doc::{DecodeError, DocumentSize, EncodeFlags, decode, encode, probe};
pub use ansmap_term::{Canvas, Mode, ModeFlags, NamedColor, Output, Palette, Rgb, Style};
pub use ansmap_text::{Align, TextLayout};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn centered_rich_text_renders() {
        let mut canvas = Canvas::new(8, 1);
        canvas.draw_rich_text(Style::empty(), 4, 0, 0, Align::Center, "{gok");

        let mut out = Vec::new();
        canvas.render(Output::Stream(&mut out)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "   \x1b[32mok\x1b[0m   \x1b[0m");
    }

    #[test]
    fn layout_then_document_round_trip() {
        let mut canvas = Canvas::new(5, 2);
        canvas.draw_multiline_text(Style::UNDERLINE, 0, 0, 5, Align::Left, "hi all");

        let mut doc = Vec::new();
        encode(&canvas, EncodeFlags::DEFLATE, Output::Stream(&mut doc)).unwrap();

        let size = probe(&doc).unwrap();
        let mut back = Canvas::new(size.width, size.height);
        decode(&mut back, &doc).unwrap();
        assert_eq!(back.row_text(0), canvas.row_text(0));
        assert_eq!(back.row_text(1), canvas.row_text(1));
        assert_eq!(back.style(0, 1), Style::UNDERLINE);
    }
}
