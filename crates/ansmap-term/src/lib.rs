// SPDX-License-Identifier: MIT
//
// ansmap-term — the canvas and its terminal renderer.
//
// A canvas is a fixed grid of cells laid over a flat byte buffer the caller
// chooses: a Vec, a borrowed slice, a static array. Each cell holds one
// code point and a concrete mode (RGB colors plus decorations). Styles,
// the public flag vocabulary of 16 named colors, are resolved into modes on
// write and recovered from them on read.
//
// Rendering projects every mode onto the chosen palette (16 colors or true
// color) and diffs consecutive cells so each SGR parameter is sent only when
// the terminal would otherwise show something different. The crate never
// touches a terminal itself: bytes go to an explicit `Output`.

pub mod ansi;
pub mod canvas;
pub mod cell;
pub mod color;
pub mod output;
mod render;
pub mod style;
pub mod utf8;

pub use canvas::Canvas;
pub use cell::{Mode, ModeFlags};
pub use color::{NamedColor, Palette, Rgb};
pub use output::Output;
pub use style::Style;
