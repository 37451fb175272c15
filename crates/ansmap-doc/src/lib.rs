// SPDX-License-Identifier: MIT
//
// ansmap-doc — canvases as bordered plaintext documents.
//
// A document is a box-drawn frame holding stacked layers of equal width.
// Layer 0 is the glyph grid; every later layer is a grid of one-character
// style markers that combine per cell. The format is meant to be written by
// hand in a text editor and diffed in version control:
//
//   ╔═════╗
//   ║hello║
//   ╠═════╣
//   ║rrrrr║
//   ╠═════╣
//   ║____ ║
//   ╚═════╝
//
// `probe` measures a document, `decode` draws it onto a canvas and `encode`
// writes a canvas back out with the fewest layers a greedy cover finds.

pub mod decode;
pub mod encode;
pub mod error;
mod parse;

pub use decode::{decode, probe};
pub use encode::encode;
pub use error::DecodeError;

bitflags::bitflags! {
    /// Encoder options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EncodeFlags: u8 {
        /// Let colors and decorations share style layers.
        const FLATTEN = 1 << 0;
        /// Drop blank trailing rows from style layers.
        const DEFLATE = 1 << 1;
    }
}

/// Dimensions of a document and the canvas storage that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSize {
    pub width: u32,
    pub height: u32,
    /// Bytes of canvas storage for `width × height` cells.
    pub bytes: usize,
}
