// SPDX-License-Identifier: MIT
//
// Mode — the concrete color and decoration state of one cell.
//
// A canvas keeps two parallel regions: glyph slots and mode slots. This
// module owns the mode half. A mode is what a style resolves to once every
// named color has been turned into RGB, and it is exactly what the renderer
// diffs and what the document codec reads back.
//
// On-storage layout (8 bytes per cell):
//
//   ┌────────┬────────┬───────┬──────────┐
//   │ fg rgb │ bg rgb │ flags │ reserved │
//   │ 3 bytes│ 3 bytes│  u8   │    u8    │
//   └────────┴────────┴───────┴──────────┘
//
// The FG and BG flags gate the color bytes: without the flag the channel is
// the terminal default and its stored bytes are ignored.

use crate::color::Rgb;

/// Bytes per mode slot.
pub const MODE_STRIDE: usize = 8;

// ─── Flags ───────────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Per-cell flag byte.
    ///
    /// ```
    /// use ansmap_term::cell::ModeFlags;
    ///
    /// let flags = ModeFlags::FG | ModeFlags::ITALIC;
    /// assert!(flags.contains(ModeFlags::FG));
    /// assert!(!flags.contains(ModeFlags::BG));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct ModeFlags: u8 {
        /// The foreground color bytes are set.
        const FG            = 1 << 0;
        /// The background color bytes are set.
        const BG            = 1 << 1;
        /// SGR 8.
        const HIDDEN        = 1 << 2;
        /// SGR 2.
        const FAINT         = 1 << 3;
        /// SGR 3.
        const ITALIC        = 1 << 4;
        /// SGR 4.
        const UNDERLINE     = 1 << 5;
        /// SGR 5.
        const BLINK         = 1 << 6;
        /// SGR 9.
        const STRIKETHROUGH = 1 << 7;
    }
}

impl ModeFlags {
    /// The six decoration flags (everything except the channel gates).
    pub const DECORATIONS: Self = Self::from_bits_retain(
        Self::HIDDEN.bits()
            | Self::FAINT.bits()
            | Self::ITALIC.bits()
            | Self::UNDERLINE.bits()
            | Self::BLINK.bits()
            | Self::STRIKETHROUGH.bits(),
    );
}

// ─── Mode ────────────────────────────────────────────────────────────────────

/// Concrete per-cell state: colors plus decoration flags.
///
/// `broken` is never stored; it only marks the sentinel returned for reads
/// outside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Mode {
    /// Foreground color, meaningful when `flags` has `FG`.
    pub fg: Rgb,
    /// Background color, meaningful when `flags` has `BG`.
    pub bg: Rgb,
    /// Channel gates and decorations.
    pub flags: ModeFlags,
    /// Set only on [`Mode::BROKEN`].
    pub broken: bool,
}

impl Mode {
    /// Default colors, no decorations.
    pub const EMPTY: Self = Self {
        fg: Rgb::new(0, 0, 0),
        bg: Rgb::new(0, 0, 0),
        flags: ModeFlags::empty(),
        broken: false,
    };

    /// Returned for out-of-range reads.
    pub const BROKEN: Self = Self {
        broken: true,
        ..Self::EMPTY
    };

    /// The foreground color, if set.
    #[inline]
    #[must_use]
    pub const fn foreground(self) -> Option<Rgb> {
        if self.flags.contains(ModeFlags::FG) {
            Some(self.fg)
        } else {
            None
        }
    }

    /// The background color, if set.
    #[inline]
    #[must_use]
    pub const fn background(self) -> Option<Rgb> {
        if self.flags.contains(ModeFlags::BG) {
            Some(self.bg)
        } else {
            None
        }
    }

    /// Set or clear the foreground.
    #[inline]
    #[must_use]
    pub fn with_foreground(mut self, fg: Option<Rgb>) -> Self {
        self.flags.set(ModeFlags::FG, fg.is_some());
        self.fg = fg.unwrap_or_default();
        self
    }

    /// Set or clear the background.
    #[inline]
    #[must_use]
    pub fn with_background(mut self, bg: Option<Rgb>) -> Self {
        self.flags.set(ModeFlags::BG, bg.is_some());
        self.bg = bg.unwrap_or_default();
        self
    }

    /// Decoration flags only.
    #[inline]
    #[must_use]
    pub const fn decorations(self) -> ModeFlags {
        self.flags.intersection(ModeFlags::DECORATIONS)
    }

    /// Whether the cell renders with terminal defaults.
    #[inline]
    #[must_use]
    pub const fn is_plain(self) -> bool {
        self.flags.is_empty()
    }

    /// Decode a mode slot. Color bytes of unset channels read back as zero.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; MODE_STRIDE]) -> Self {
        let [fr, fg, fb, br, bg, bb, flags, _] = *bytes;
        let flags = ModeFlags::from_bits_retain(flags);
        Self::EMPTY
            .with_foreground(flags.contains(ModeFlags::FG).then_some(Rgb::new(fr, fg, fb)))
            .with_background(flags.contains(ModeFlags::BG).then_some(Rgb::new(br, bg, bb)))
            .with_decorations(flags)
    }

    /// Encode into a mode slot. Unset channels are written as zero.
    #[must_use]
    pub fn to_bytes(self) -> [u8; MODE_STRIDE] {
        let fg = self.foreground().unwrap_or_default();
        let bg = self.background().unwrap_or_default();
        [fg.r, fg.g, fg.b, bg.r, bg.g, bg.b, self.flags.bits(), 0]
    }

    fn with_decorations(mut self, flags: ModeFlags) -> Self {
        self.flags |= flags & ModeFlags::DECORATIONS;
        self
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Flags ───────────────────────────────────────────────────────────

    #[test]
    fn flags_fit_one_byte() {
        assert_eq!(std::mem::size_of::<ModeFlags>(), 1);
        assert_eq!(ModeFlags::all().bits(), 0xFF);
    }

    #[test]
    fn decorations_exclude_channel_gates() {
        assert!(!ModeFlags::DECORATIONS.contains(ModeFlags::FG));
        assert!(!ModeFlags::DECORATIONS.contains(ModeFlags::BG));
        assert_eq!(ModeFlags::DECORATIONS.bits().count_ones(), 6);
    }

    // ── Mode ────────────────────────────────────────────────────────────

    #[test]
    fn empty_mode_is_plain() {
        assert!(Mode::EMPTY.is_plain());
        assert_eq!(Mode::default(), Mode::EMPTY);
        assert_eq!(Mode::EMPTY.foreground(), None);
    }

    #[test]
    fn broken_differs_from_empty() {
        assert!(Mode::BROKEN.broken);
        assert_ne!(Mode::BROKEN, Mode::EMPTY);
    }

    #[test]
    fn channel_setters_toggle_gates() {
        let red = Rgb::new(255, 0, 0);
        let mode = Mode::EMPTY.with_foreground(Some(red));
        assert_eq!(mode.foreground(), Some(red));
        assert!(mode.flags.contains(ModeFlags::FG));

        let cleared = mode.with_foreground(None);
        assert_eq!(cleared.foreground(), None);
        assert_eq!(cleared, Mode::EMPTY);
    }

    #[test]
    fn decorations_ignore_gates() {
        let mode = Mode {
            flags: ModeFlags::FG | ModeFlags::BLINK,
            ..Mode::EMPTY
        };
        assert_eq!(mode.decorations(), ModeFlags::BLINK);
    }

    // ── Bytes ───────────────────────────────────────────────────────────

    #[test]
    fn byte_layout() {
        let mode = Mode::EMPTY
            .with_foreground(Some(Rgb::new(1, 2, 3)))
            .with_background(Some(Rgb::new(4, 5, 6)));
        let mode = Mode {
            flags: mode.flags | ModeFlags::UNDERLINE,
            ..mode
        };
        assert_eq!(mode.to_bytes(), [1, 2, 3, 4, 5, 6, 0b0010_0011, 0]);
        assert_eq!(Mode::from_bytes(&mode.to_bytes()), mode);
    }

    #[test]
    fn ungated_color_bytes_are_ignored() {
        let mode = Mode::from_bytes(&[9, 9, 9, 7, 7, 7, ModeFlags::ITALIC.bits(), 0xAA]);
        assert_eq!(mode.foreground(), None);
        assert_eq!(mode.background(), None);
        assert_eq!(mode, Mode::EMPTY.with_decorations(ModeFlags::ITALIC));
    }
}
