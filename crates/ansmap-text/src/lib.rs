//! # ansmap-text — text layout for ansmap canvases
//!
//! Extends [`Canvas`](ansmap_term::Canvas) with the [`TextLayout`] trait:
//! single glyphs, aligned lines, word-wrapped paragraphs and rich text with
//! inline style markup.
//!
//! ```
//! use ansmap_term::{Canvas, Style};
//! use ansmap_text::{Align, TextLayout};
//!
//! let mut canvas = Canvas::new(10, 2);
//! let lines = canvas.draw_rich_text(
//!     Style::empty(), 0, 0, 6, Align::Left,
//!     "{rhello{x world",
//! );
//! assert_eq!(lines, 2);
//! assert_eq!(canvas.style(0, 0), Style::FG_RED);
//! ```
//!
//! # Architecture
//!
//! ```text
//! text ──► wrap::lines ──► markup::{plain, rich} ──► wrap::wrap_end ──► draw_glyph
//!          split on CR/LF   tokens: glyph | markup    greedy runs        canvas cell
//! ```
//!
//! Widths are counted in code points; every glyph takes one column.

pub mod markup;
pub mod wrap;

mod layout;

pub use layout::{Align, TextLayout};
