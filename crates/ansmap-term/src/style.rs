// SPDX-License-Identifier: MIT
//
// Style — the public flag vocabulary for colors and decorations.
//
// A `Style` names what a cell should look like: decorations plus zero or
// more named colors per channel. Cells never store a style. Writing one
// resolves every named color to RGB (averaging when a channel names several)
// and reading one back goes through the combination table in `color.rs`.
//
// Bit layout (u64):
//
//   0–5    decorations: hidden, faint, italic, underline, blink, strikethrough
//   6      FG_NONE
//   7–22   foreground colors in palette order
//   24     BG_NONE
//   25–40  background colors in palette order
//   41–42  SOFT_RESET, HARD_RESET (markup only, never stored)
//
// Every single-bit style has a one-character marker, shared by inline text
// markup and the document format. Foreground markers are lowercase letters,
// background markers the matching uppercase ones.

use crate::canvas::Canvas;
use crate::cell::{Mode, ModeFlags};
use crate::color::{ColorSet, NamedColor, Rgb};

// ─── Flags ───────────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Colors and decorations for one cell, as named flags.
    ///
    /// ```
    /// use ansmap_term::style::Style;
    ///
    /// let warn = Style::FG_YELLOW | Style::BG_NAVY | Style::UNDERLINE;
    /// assert!(warn.contains(Style::UNDERLINE));
    /// assert_eq!(Style::from_marker('y'), Some(Style::FG_YELLOW));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Style: u64 {
        const HIDDEN        = 1 << 0;
        const FAINT         = 1 << 1;
        const ITALIC        = 1 << 2;
        const UNDERLINE     = 1 << 3;
        const BLINK         = 1 << 4;
        const STRIKETHROUGH = 1 << 5;

        const FG_NONE       = 1 << 6;
        const FG_BLACK      = 1 << 7;
        const FG_MAROON     = 1 << 8;
        const FG_GREEN      = 1 << 9;
        const FG_OLIVE      = 1 << 10;
        const FG_NAVY       = 1 << 11;
        const FG_PURPLE     = 1 << 12;
        const FG_TEAL       = 1 << 13;
        const FG_SILVER     = 1 << 14;
        const FG_GRAY       = 1 << 15;
        const FG_RED        = 1 << 16;
        const FG_LIME       = 1 << 17;
        const FG_YELLOW     = 1 << 18;
        const FG_BLUE       = 1 << 19;
        const FG_MAGENTA    = 1 << 20;
        const FG_CYAN       = 1 << 21;
        const FG_WHITE      = 1 << 22;

        const BG_NONE       = 1 << 24;
        const BG_BLACK      = 1 << 25;
        const BG_MAROON     = 1 << 26;
        const BG_GREEN      = 1 << 27;
        const BG_OLIVE      = 1 << 28;
        const BG_NAVY       = 1 << 29;
        const BG_PURPLE     = 1 << 30;
        const BG_TEAL       = 1 << 31;
        const BG_SILVER     = 1 << 32;
        const BG_GRAY       = 1 << 33;
        const BG_RED        = 1 << 34;
        const BG_LIME       = 1 << 35;
        const BG_YELLOW     = 1 << 36;
        const BG_BLUE       = 1 << 37;
        const BG_MAGENTA    = 1 << 38;
        const BG_CYAN       = 1 << 39;
        const BG_WHITE      = 1 << 40;

        /// Markup only: drop foreground and decorations, keep background.
        const SOFT_RESET    = 1 << 41;
        /// Markup only: drop everything.
        const HARD_RESET    = 1 << 42;
    }
}

const FG_SHIFT: u32 = 7;
const BG_SHIFT: u32 = 25;

impl Style {
    /// The six decoration bits.
    pub const DECORATIONS: Self = Self::from_bits_retain(0x3F);
    /// `FG_NONE` and all 16 foreground colors.
    pub const FG_COLORS: Self = Self::from_bits_retain(0x1FFFF << 6);
    /// `BG_NONE` and all 16 background colors.
    pub const BG_COLORS: Self = Self::from_bits_retain(0x1FFFF << 24);
    /// Both reset pseudo-flags.
    pub const RESETS: Self = Self::from_bits_retain(Self::SOFT_RESET.bits() | Self::HARD_RESET.bits());

    /// Foreground flag of a named color.
    #[inline]
    #[must_use]
    pub const fn fg(color: NamedColor) -> Self {
        Self::from_bits_retain(1 << (FG_SHIFT + color as u32))
    }

    /// Background flag of a named color.
    #[inline]
    #[must_use]
    pub const fn bg(color: NamedColor) -> Self {
        Self::from_bits_retain(1 << (BG_SHIFT + color as u32))
    }

    /// Named foreground colors present, ignoring `FG_NONE`.
    #[must_use]
    pub fn fg_colors(self) -> ColorSet {
        NamedColor::ALL
            .into_iter()
            .filter(|&c| self.contains(Self::fg(c)))
            .fold(ColorSet::EMPTY, ColorSet::with)
    }

    /// Named background colors present, ignoring `BG_NONE`.
    #[must_use]
    pub fn bg_colors(self) -> ColorSet {
        NamedColor::ALL
            .into_iter()
            .filter(|&c| self.contains(Self::bg(c)))
            .fold(ColorSet::EMPTY, ColorSet::with)
    }

    /// The style flags of every color in `set`, on the foreground channel.
    #[must_use]
    pub fn from_fg_set(set: ColorSet) -> Self {
        set.iter().map(Self::fg).collect()
    }

    /// The style flags of every color in `set`, on the background channel.
    #[must_use]
    pub fn from_bg_set(set: ColorSet) -> Self {
        set.iter().map(Self::bg).collect()
    }

    /// Apply a markup flag on top of `self`.
    ///
    /// A color (or `*_NONE`) replaces its whole channel, a decoration is
    /// added, `HARD_RESET` clears everything and `SOFT_RESET` keeps only the
    /// background channel.
    #[must_use]
    pub fn then(self, markup: Self) -> Self {
        if markup.contains(Self::HARD_RESET) {
            Self::empty()
        } else if markup.contains(Self::SOFT_RESET) {
            self & Self::BG_COLORS
        } else if markup.intersects(Self::FG_COLORS) {
            (self - Self::FG_COLORS) | (markup & Self::FG_COLORS)
        } else if markup.intersects(Self::BG_COLORS) {
            (self - Self::BG_COLORS) | (markup & Self::BG_COLORS)
        } else {
            self | (markup & Self::DECORATIONS)
        }
    }

    // ─── Markers ──────────────────────────────────────────────────────────

    /// The single-bit style written as `marker`.
    #[must_use]
    pub fn from_marker(marker: char) -> Option<Self> {
        MARKERS
            .iter()
            .find_map(|&(m, style)| (m == marker).then_some(style))
    }

    /// The marker character of a single-bit style.
    #[must_use]
    pub fn marker(self) -> Option<char> {
        MARKERS
            .iter()
            .find_map(|&(m, style)| (style == self).then_some(m))
    }
}

/// Marker characters for every single-bit style.
const MARKERS: [(char, Style); 42] = [
    ('#', Style::HIDDEN),
    ('?', Style::FAINT),
    ('/', Style::ITALIC),
    ('_', Style::UNDERLINE),
    ('*', Style::BLINK),
    ('-', Style::STRIKETHROUGH),
    ('e', Style::FG_NONE),
    ('d', Style::FG_BLACK),
    ('u', Style::FG_MAROON),
    ('g', Style::FG_GREEN),
    ('o', Style::FG_OLIVE),
    ('n', Style::FG_NAVY),
    ('p', Style::FG_PURPLE),
    ('t', Style::FG_TEAL),
    ('s', Style::FG_SILVER),
    ('a', Style::FG_GRAY),
    ('r', Style::FG_RED),
    ('l', Style::FG_LIME),
    ('y', Style::FG_YELLOW),
    ('b', Style::FG_BLUE),
    ('m', Style::FG_MAGENTA),
    ('c', Style::FG_CYAN),
    ('w', Style::FG_WHITE),
    ('E', Style::BG_NONE),
    ('D', Style::BG_BLACK),
    ('U', Style::BG_MAROON),
    ('G', Style::BG_GREEN),
    ('O', Style::BG_OLIVE),
    ('N', Style::BG_NAVY),
    ('P', Style::BG_PURPLE),
    ('T', Style::BG_TEAL),
    ('S', Style::BG_SILVER),
    ('A', Style::BG_GRAY),
    ('R', Style::BG_RED),
    ('L', Style::BG_LIME),
    ('Y', Style::BG_YELLOW),
    ('B', Style::BG_BLUE),
    ('M', Style::BG_MAGENTA),
    ('C', Style::BG_CYAN),
    ('W', Style::BG_WHITE),
    ('x', Style::SOFT_RESET),
    ('X', Style::HARD_RESET),
];

// ─── Decorations ↔ flags ─────────────────────────────────────────────────────

const DECORATION_FLAGS: [(Style, ModeFlags); 6] = [
    (Style::HIDDEN, ModeFlags::HIDDEN),
    (Style::FAINT, ModeFlags::FAINT),
    (Style::ITALIC, ModeFlags::ITALIC),
    (Style::UNDERLINE, ModeFlags::UNDERLINE),
    (Style::BLINK, ModeFlags::BLINK),
    (Style::STRIKETHROUGH, ModeFlags::STRIKETHROUGH),
];

/// Resolve one channel: `None` unsets it, otherwise the mean of the named
/// colors.
fn resolve_channel(style: Style, channel: Style, none: Style, colors: ColorSet) -> Option<Rgb> {
    if style.contains(none) || !style.intersects(channel) {
        None
    } else {
        colors.mean()
    }
}

impl From<Style> for Mode {
    fn from(style: Style) -> Self {
        let mut mode = Self::EMPTY
            .with_foreground(resolve_channel(style, Style::FG_COLORS, Style::FG_NONE, style.fg_colors()))
            .with_background(resolve_channel(style, Style::BG_COLORS, Style::BG_NONE, style.bg_colors()));
        for (s, f) in DECORATION_FLAGS {
            mode.flags.set(f, style.contains(s));
        }
        mode
    }
}

impl From<Mode> for Style {
    fn from(mode: Mode) -> Self {
        let mut style = DECORATION_FLAGS
            .into_iter()
            .filter(|&(_, f)| mode.flags.contains(f))
            .fold(Self::empty(), |acc, (s, _)| acc | s);
        if let Some(fg) = mode.foreground() {
            style |= Self::from_fg_set(ColorSet::for_rgb(fg));
        }
        if let Some(bg) = mode.background() {
            style |= Self::from_bg_set(ColorSet::for_rgb(bg));
        }
        style
    }
}

// ─── Canvas ──────────────────────────────────────────────────────────────────

impl<S: AsRef<[u8]> + AsMut<[u8]>> Canvas<S> {
    /// Resolve `style` to concrete colors and store it at `(x, y)`.
    ///
    /// Per channel, `*_NONE` or the absence of any channel bit leaves the
    /// channel unset; otherwise the named colors are averaged. Returns
    /// `false` outside the canvas.
    pub fn put_style(&mut self, x: u32, y: u32, style: Style) -> bool {
        self.put_mode(x, y, Mode::from(style))
    }

    /// Read the style back from `(x, y)`. Empty outside the canvas.
    ///
    /// Colors come back as the combination most likely to have produced
    /// the stored RGB; the 16 palette colors always come back exactly.
    #[must_use]
    pub fn style(&self, x: u32, y: u32) -> Style {
        let mode = self.mode(x, y);
        if mode.broken {
            return Style::empty();
        }
        Style::from(mode)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
