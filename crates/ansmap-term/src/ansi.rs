// SPDX-License-Identifier: MIT
//
// SGR generation — projecting modes into escape codes and diffing them.
//
// A `ModeCode` is the exact list of SGR parameters one cell needs on a given
// palette. The renderer never compares stored modes directly: two different
// RGB values can quantize to the same 16-color code, and a bright 16-color
// background changes the foreground through reverse video. Comparing the
// projected codes keeps output minimal for whatever the terminal will
// actually see.
//
// Transition rule between consecutive cells:
//
//   - a decoration disappears, or a color channel drops or changes its code
//     count (bold can only be cleared by a reset)
//       → `0` followed by every code of the next cell
//   - otherwise
//       → the newly added decorations, then each color channel whose codes
//         changed
//
// All codes for one cell go into a single `ESC [ … m` sequence.

use std::io::{self, Write};

use crate::cell::{Mode, ModeFlags};
use crate::color::{NamedColor, Palette, Rgb};

// ─── Code Lists ──────────────────────────────────────────────────────────────

/// A short, fixed-capacity list of SGR parameters.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Codes<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> Codes<N> {
    const EMPTY: Self = Self {
        buf: [0; N],
        len: 0,
    };

    fn push(&mut self, code: u8) {
        if let Some(slot) = self.buf.get_mut(self.len) {
            *slot = code;
            self.len += 1;
        }
    }

    /// The parameters in emission order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Whether the list holds no parameters.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of parameters.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    fn contains(&self, code: u8) -> bool {
        self.as_slice().contains(&code)
    }
}

impl<const N: usize> std::fmt::Debug for Codes<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

// ─── ModeCode ────────────────────────────────────────────────────────────────

/// SGR 7: swap foreground and background.
const REVERSE: u8 = 7;

/// Decoration flags in emission order with their SGR codes.
const DECORATION_CODES: [(ModeFlags, u8); 6] = [
    (ModeFlags::HIDDEN, 8),
    (ModeFlags::FAINT, 2),
    (ModeFlags::ITALIC, 3),
    (ModeFlags::UNDERLINE, 4),
    (ModeFlags::BLINK, 5),
    (ModeFlags::STRIKETHROUGH, 9),
];

/// The SGR parameters one cell needs on one palette.
///
/// ```
/// use ansmap_term::ansi::ModeCode;
/// use ansmap_term::cell::Mode;
/// use ansmap_term::color::{Palette, Rgb};
///
/// let mode = Mode::EMPTY.with_foreground(Some(Rgb::new(255, 0, 0)));
/// let code = ModeCode::new(mode, Palette::Ansi16);
/// assert_eq!(code.fg().as_slice(), &[1, 31]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModeCode {
    decorations: Codes<7>,
    fg: Codes<5>,
    bg: Codes<5>,
}

impl ModeCode {
    /// Terminal defaults: no parameters at all.
    pub const EMPTY: Self = Self {
        decorations: Codes::EMPTY,
        fg: Codes::EMPTY,
        bg: Codes::EMPTY,
    };

    /// Project `mode` onto `palette`.
    #[must_use]
    pub fn new(mode: Mode, palette: Palette) -> Self {
        let mut code = Self::EMPTY;
        for (flag, sgr) in DECORATION_CODES {
            if mode.flags.contains(flag) {
                code.decorations.push(sgr);
            }
        }

        match palette {
            Palette::TrueColor => {
                if let Some(fg) = mode.foreground() {
                    code.fg = truecolor(38, fg);
                }
                if let Some(bg) = mode.background() {
                    code.bg = truecolor(48, bg);
                }
            }
            Palette::Ansi16 => {
                let mut fg = mode.foreground().map(NamedColor::quantize);
                let mut bg = mode.background().map(NamedColor::quantize);

                // No bright backgrounds in 16 colors: draw it as a bright
                // foreground under reverse video.
                if let Some(bright) = bg.filter(|c| c.is_bright()) {
                    bg = fg;
                    fg = Some(bright);
                    code.decorations.push(REVERSE);
                }

                if let Some(fg) = fg {
                    if fg.is_bright() {
                        code.fg.push(1);
                    }
                    code.fg.push(fg.fg_code());
                }
                if let Some(bg) = bg {
                    code.bg.push(bg.bg_code());
                }
            }
        }

        code
    }

    /// Decoration parameters, reverse video last.
    #[inline]
    #[must_use]
    pub const fn decorations(&self) -> &Codes<7> {
        &self.decorations
    }

    /// Foreground parameters.
    #[inline]
    #[must_use]
    pub const fn fg(&self) -> &Codes<5> {
        &self.fg
    }

    /// Background parameters.
    #[inline]
    #[must_use]
    pub const fn bg(&self) -> &Codes<5> {
        &self.bg
    }

    /// Whether this renders as terminal defaults.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.decorations.is_empty() && self.fg.is_empty() && self.bg.is_empty()
    }

    /// Whether moving from `self` to `next` needs SGR 0.
    #[must_use]
    pub fn needs_reset(&self, next: &Self) -> bool {
        let dropped_decoration = self
            .decorations
            .as_slice()
            .iter()
            .any(|&c| !next.decorations.contains(c));

        let channel_shrinks = |prev: &Codes<5>, next: &Codes<5>| {
            !prev.is_empty() && prev.len() != next.len()
        };

        dropped_decoration || channel_shrinks(&self.fg, &next.fg) || channel_shrinks(&self.bg, &next.bg)
    }

    fn all(&self) -> impl Iterator<Item = u8> + '_ {
        self.decorations
            .as_slice()
            .iter()
            .chain(self.fg.as_slice())
            .chain(self.bg.as_slice())
            .copied()
    }
}

fn truecolor(selector: u8, rgb: Rgb) -> Codes<5> {
    let mut codes = Codes::EMPTY;
    for c in [selector, 2, rgb.r, rgb.g, rgb.b] {
        codes.push(c);
    }
    codes
}

// ─── Sequences ───────────────────────────────────────────────────────────────

/// Reset all SGR attributes (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// Write one `ESC [ p;p;… m` sequence. Nothing for an empty list.
pub fn sgr(w: &mut impl Write, params: impl IntoIterator<Item = u8>) -> io::Result<()> {
    let mut params = params.into_iter();
    let Some(first) = params.next() else {
        return Ok(());
    };
    write!(w, "\x1b[{first}")?;
    for p in params {
        write!(w, ";{p}")?;
    }
    w.write_all(b"m")
}

/// Write the minimal SGR sequence that turns `prev` into `next`.
///
/// Writes nothing when the two need the same parameters.
pub fn transition(w: &mut impl Write, prev: &ModeCode, next: &ModeCode) -> io::Result<()> {
    if prev.needs_reset(next) {
        return sgr(w, std::iter::once(0).chain(next.all()));
    }

    let added = next
        .decorations
        .as_slice()
        .iter()
        .copied()
        .filter(|&c| !prev.decorations.contains(c));
    let fg: &[u8] = if prev.fg == next.fg { &[] } else { next.fg.as_slice() };
    let bg: &[u8] = if prev.bg == next.bg { &[] } else { next.bg.as_slice() };

    sgr(w, added.chain(fg.iter().copied()).chain(bg.iter().copied()))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
