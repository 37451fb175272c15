// SPDX-License-Identifier: MIT
//
// Color system — the 16 named colors, palette quantization, and the
// RGB → color-combination calibration table.
//
// Cells store concrete 24-bit RGB. The public vocabulary, however, is the
// 16 named colors of the classic terminal palette. Three conversions bridge
// the two worlds:
//
//   named → RGB     table lookup (writing a style)
//   RGB → named     weighted nearest match (16-color rendering)
//   RGB → named set bucketed combination lookup (reading a style back)
//
// Writing a style with several colors on one channel averages them, so a
// stored RGB may be the mean of two named colors. The combination table maps
// each 8×8×8 RGB bucket to the most plausible set of named colors that
// produced it. It is fixed data in read-only memory, with no runtime setup.

// r, g, b.
#![allow(clippy::many_single_char_names)]

use std::fmt;

// ─── Rgb ─────────────────────────────────────────────────────────────────────

/// A concrete 24-bit color as stored in a cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Create a color from its three channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Weighted squared distance (3:4:2 for r:g:b).
    ///
    /// Green dominates perceived brightness, blue the least; the weights
    /// approximate that without leaving integer arithmetic.
    #[inline]
    #[must_use]
    pub const fn distance(self, other: Self) -> u32 {
        let dr = self.r.abs_diff(other.r) as u32;
        let dg = self.g.abs_diff(other.g) as u32;
        let db = self.b.abs_diff(other.b) as u32;
        3 * dr * dr + 4 * dg * dg + 2 * db * db
    }

    /// Index of this color's cell in the 8×8×8 bucket grid.
    #[inline]
    #[must_use]
    pub const fn bucket(self) -> usize {
        ((self.r as usize >> 5) << 6) | ((self.g as usize >> 5) << 3) | (self.b as usize >> 5)
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// ─── NamedColor ──────────────────────────────────────────────────────────────

/// One of the 16 classic terminal palette colors.
///
/// The first eight are the "normal" colors (SGR 30–37 / 40–47); the last
/// eight are their bright counterparts, which reduced-color terminals reach
/// through the bold attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NamedColor {
    Black = 0,
    Maroon,
    Green,
    Olive,
    Navy,
    Purple,
    Teal,
    Silver,
    Gray,
    Red,
    Lime,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

/// Palette RGB values, indexed by [`NamedColor`] discriminant.
const PALETTE: [Rgb; 16] = [
    Rgb::new(0, 0, 0),       // Black
    Rgb::new(128, 0, 0),     // Maroon
    Rgb::new(0, 128, 0),     // Green
    Rgb::new(128, 128, 0),   // Olive
    Rgb::new(0, 0, 128),     // Navy
    Rgb::new(128, 0, 128),   // Purple
    Rgb::new(0, 128, 128),   // Teal
    Rgb::new(128, 128, 128), // Silver
    Rgb::new(64, 64, 64),    // Gray
    Rgb::new(255, 0, 0),     // Red
    Rgb::new(0, 255, 0),     // Lime
    Rgb::new(255, 255, 0),   // Yellow
    Rgb::new(0, 0, 255),     // Blue
    Rgb::new(255, 0, 255),   // Magenta
    Rgb::new(0, 255, 255),   // Cyan
    Rgb::new(255, 255, 255), // White
];

impl NamedColor {
    /// All 16 colors in palette order.
    pub const ALL: [Self; 16] = [
        Self::Black,
        Self::Maroon,
        Self::Green,
        Self::Olive,
        Self::Navy,
        Self::Purple,
        Self::Teal,
        Self::Silver,
        Self::Gray,
        Self::Red,
        Self::Lime,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
    ];

    /// Palette index (0–15).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The color at palette index `idx`, if in range.
    #[inline]
    #[must_use]
    pub const fn from_index(idx: usize) -> Option<Self> {
        if idx < 16 { Some(Self::ALL[idx]) } else { None }
    }

    /// The color's table RGB value.
    #[inline]
    #[must_use]
    pub const fn rgb(self) -> Rgb {
        PALETTE[self as usize]
    }

    /// Whether this is one of the eight bright colors.
    #[inline]
    #[must_use]
    pub const fn is_bright(self) -> bool {
        self as u8 >= 8
    }

    /// SGR foreground code (30–37). Bright colors share the code of their
    /// normal counterpart and add bold.
    #[inline]
    #[must_use]
    pub const fn fg_code(self) -> u8 {
        30 + (self as u8 & 7)
    }

    /// SGR background code (40–47). There is no bright variant.
    #[inline]
    #[must_use]
    pub const fn bg_code(self) -> u8 {
        40 + (self as u8 & 7)
    }

    /// Nearest palette color by weighted distance. Ties go to the lower index.
    ///
    /// ```
    /// use ansmap_term::color::{NamedColor, Rgb};
    ///
    /// assert_eq!(NamedColor::quantize(Rgb::new(250, 10, 5)), NamedColor::Red);
    /// assert_eq!(NamedColor::quantize(Rgb::new(60, 70, 60)), NamedColor::Gray);
    /// ```
    #[must_use]
    pub const fn quantize(rgb: Rgb) -> Self {
        let mut best = 0;
        let mut best_d = u32::MAX;
        let mut i = 0;
        while i < 16 {
            let d = rgb.distance(PALETTE[i]);
            if d < best_d {
                best_d = d;
                best = i;
            }
            i += 1;
        }
        Self::ALL[best]
    }
}

// ─── Palette ─────────────────────────────────────────────────────────────────

/// Target palette for escape-sequence rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Palette {
    /// 16 colors: SGR 30–37 / 40–47, bright via bold and reverse video.
    #[default]
    Ansi16,
    /// 24-bit color: `38;2;r;g;b` / `48;2;r;g;b`.
    TrueColor,
}

// ─── ColorSet ────────────────────────────────────────────────────────────────

/// A set of named colors, one bit per palette index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorSet(u16);

impl ColorSet {
    /// No colors.
    pub const EMPTY: Self = Self(0);

    /// A set holding exactly one color.
    #[inline]
    #[must_use]
    pub const fn single(color: NamedColor) -> Self {
        Self(1 << color as u16)
    }

    /// Add a color.
    #[inline]
    #[must_use]
    pub const fn with(self, color: NamedColor) -> Self {
        Self(self.0 | (1 << color as u16))
    }

    /// Whether `color` is in the set.
    #[inline]
    #[must_use]
    pub const fn contains(self, color: NamedColor) -> bool {
        self.0 & (1 << color as u16) != 0
    }

    /// Number of colors in the set.
    #[inline]
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Whether the set is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the colors in palette order.
    pub fn iter(self) -> impl Iterator<Item = NamedColor> {
        NamedColor::ALL.into_iter().filter(move |&c| self.contains(c))
    }

    /// The truncating mean of the set's table colors, as written by a
    /// multi-color style. `None` for the empty set.
    #[must_use]
    pub const fn mean(self) -> Option<Rgb> {
        let (mut r, mut g, mut b, mut n) = (0u32, 0u32, 0u32, 0u32);
        let mut i = 0;
        while i < 16 {
            if self.0 & (1 << i) != 0 {
                let c = PALETTE[i];
                r += c.r as u32;
                g += c.g as u32;
                b += c.b as u32;
                n += 1;
            }
            i += 1;
        }
        if n == 0 {
            return None;
        }
        // Each mean is at most 255.
        #[allow(clippy::cast_possible_truncation)]
        Some(Rgb::new((r / n) as u8, (g / n) as u8, (b / n) as u8))
    }

    /// The most plausible color combination that produced `rgb`.
    ///
    /// Lossy by nature: every RGB inside one 32-wide bucket maps to the same
    /// set. The 16 palette colors themselves always map back to exactly
    /// themselves.
    #[inline]
    #[must_use]
    pub fn for_rgb(rgb: Rgb) -> Self {
        Self(COMBINATIONS[rgb.bucket()])
    }
}

impl fmt::Debug for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// ─── Combination Table ───────────────────────────────────────────────────────
//
// Calibration data, one entry per 8×8×8 bucket (index `r << 6 | g << 3 | b`
// with each channel shifted right by 5). Each entry is a palette bitmask: the
// single color or pair of distinct colors whose truncated mean lies nearest
// (weighted distance) to the bucket center, singles winning ties, then lower
// palette indices. Buckets that contain a palette color are pinned to that
// color alone; the 16 palette colors occupy 16 distinct buckets.
//
// Small edits here change which styles read back from averaged colors, so the
// table is treated as fixed data. `tests::table_matches_derivation` rebuilds
// it from the rules above.

#[rustfmt::skip]
static COMBINATIONS: [u16; 512] = [
    // r = 0
    0x0001, 0x0011, 0x0011, 0x1001, 0x0010, 0x1010, 0x1010, 0x1000,
    0x0005, 0x0041, 0x0041, 0x1004, 0x1100, 0x1040, 0x1040, 0x1040,
    0x0005, 0x0041, 0x0041, 0x1004, 0x0050, 0x1040, 0x1040, 0x1040,
    0x0401, 0x0410, 0x0410, 0x4001, 0x4001, 0x4010, 0x4010, 0x5000,
    0x0004, 0x0500, 0x0044, 0x0040, 0x0040, 0x4100, 0x4010, 0x5000,
    0x0404, 0x0440, 0x0440, 0x4004, 0x4004, 0x4040, 0x4040, 0x4040,
    0x0404, 0x0440, 0x0440, 0x4004, 0x4004, 0x4040, 0x4040, 0x4040,
    0x0400, 0x0400, 0x4400, 0x4400, 0x4400, 0x4400, 0x4000, 0x4000,
    // r = 1
    0x0003, 0x0021, 0x0021, 0x1002, 0x1100, 0x1020, 0x1020, 0x1020,
    0x0009, 0x0100, 0x0100, 0x1008, 0x1100, 0x1080, 0x1080, 0x1080,
    0x0009, 0x0100, 0x0100, 0x1008, 0x0090, 0x1080, 0x1080, 0x1080,
    0x0402, 0x0420, 0x0420, 0x4002, 0x4002, 0x4020, 0x4020, 0x4020,
    0x0500, 0x0500, 0x0084, 0x00c0, 0x4100, 0x4100, 0x4020, 0x4020,
    0x0408, 0x0480, 0x0480, 0x4008, 0x4008, 0x4080, 0x4080, 0x4080,
    0x0408, 0x0480, 0x0480, 0x4008, 0x4008, 0x4080, 0x4080, 0x4080,
    0x0400, 0x0480, 0x0480, 0x4400, 0x4400, 0x4080, 0x4080, 0x4000,
    // r = 2
    0x0003, 0x0021, 0x0021, 0x1002, 0x0030, 0x1020, 0x1020, 0x1020,
    0x0009, 0x0100, 0x0100, 0x1008, 0x0090, 0x1080, 0x1080, 0x1080,
    0x0009, 0x0100, 0x0100, 0x1008, 0x0090, 0x1080, 0x1080, 0x1080,
    0x0402, 0x0420, 0x0420, 0x4002, 0x4002, 0x4020, 0x4020, 0x4020,
    0x000c, 0x0084, 0x0084, 0x00c0, 0x00c0, 0x4020, 0x4020, 0x4020,
    0x0408, 0x0480, 0x0480, 0x4008, 0x4008, 0x4080, 0x4080, 0x4080,
    0x0408, 0x0480, 0x0480, 0x4008, 0x4008, 0x4080, 0x4080, 0x4080,
    0x0c00, 0x0480, 0x0480, 0x8400, 0x8400, 0x4080, 0x4080, 0xc000,
    // r = 3
    0x0201, 0x0210, 0x0210, 0x2001, 0x2001, 0x2010, 0x2010, 0x3000,
    0x0204, 0x0240, 0x0240, 0x2004, 0x2004, 0x2040, 0x2040, 0x2040,
    0x0204, 0x0240, 0x0240, 0x2004, 0x2004, 0x2040, 0x2040, 0x2040,
    0x0801, 0x0810, 0x0810, 0x8001, 0x8001, 0x8010, 0x8010, 0x9000,
    0x0008, 0x0088, 0x0088, 0x8001, 0x0080, 0x8010, 0x8010, 0x9000,
    0x0804, 0x0840, 0x0840, 0x8004, 0x8004, 0x8040, 0x8040, 0x8040,
    0x0804, 0x0840, 0x0840, 0x8004, 0x8004, 0x8040, 0x8040, 0x8040,
    0x0c00, 0x0c00, 0x8400, 0x8400, 0x8400, 0x8400, 0xc000, 0xc000,
    // r = 4
    0x0002, 0x0300, 0x0022, 0x0020, 0x0020, 0x2100, 0x2010, 0x3000,
    0x0300, 0x0300, 0x0082, 0x00a0, 0x2100, 0x2100, 0x2040, 0x2040,
    0x000a, 0x0082, 0x0082, 0x00a0, 0x00a0, 0x2040, 0x2040, 0x2040,
    0x0801, 0x0810, 0x0810, 0x8001, 0x0080, 0x8010, 0x8010, 0x9000,
    0x0008, 0x0900, 0x0088, 0x0080, 0x0080, 0x8100, 0x8010, 0x9000,
    0x0804, 0x0840, 0x0840, 0x8004, 0x8100, 0x8040, 0x8040, 0x8040,
    0x0804, 0x0840, 0x0840, 0x8004, 0x8004, 0x8040, 0x8040, 0x8040,
    0x0c00, 0x0c00, 0x8400, 0x8400, 0x8400, 0x8400, 0xc000, 0xc000,
    // r = 5
    0x0202, 0x0220, 0x0220, 0x2002, 0x2002, 0x2020, 0x2020, 0x2020,
    0x0208, 0x0280, 0x0280, 0x2008, 0x2008, 0x2080, 0x2080, 0x2080,
    0x0208, 0x0280, 0x0280, 0x2008, 0x2008, 0x2080, 0x2080, 0x2080,
    0x0802, 0x0820, 0x0820, 0x8002, 0x8002, 0x8020, 0x8020, 0x8020,
    0x0900, 0x0900, 0x0820, 0x8002, 0x8100, 0x8020, 0x8020, 0x8020,
    0x0808, 0x0880, 0x0880, 0x8008, 0x8008, 0x8080, 0x8080, 0x8080,
    0x0808, 0x0880, 0x0880, 0x8008, 0x8008, 0x8080, 0x8080, 0x8080,
    0x0c00, 0x0880, 0x0880, 0x8400, 0x8400, 0x8080, 0x8080, 0xc000,
    // r = 6
    0x0202, 0x0220, 0x0220, 0x2002, 0x2002, 0x2020, 0x2020, 0x2020,
    0x0208, 0x0280, 0x0280, 0x2008, 0x2008, 0x2080, 0x2080, 0x2080,
    0x0208, 0x0280, 0x0280, 0x2008, 0x2008, 0x2080, 0x2080, 0x2080,
    0x0802, 0x0820, 0x0820, 0x8002, 0x8002, 0x8020, 0x8020, 0x8020,
    0x0802, 0x0820, 0x0820, 0x8002, 0x8002, 0x8020, 0x8020, 0x8020,
    0x0808, 0x0880, 0x0880, 0x8008, 0x8008, 0x8080, 0x8080, 0x8080,
    0x0808, 0x0880, 0x0880, 0x8008, 0x8008, 0x8080, 0x8080, 0x8080,
    0x0800, 0x0880, 0x0880, 0x8800, 0x8800, 0x8080, 0x8080, 0x8000,
    // r = 7
    0x0200, 0x0200, 0x2200, 0x2200, 0x2200, 0x2200, 0x2000, 0x2000,
    0x0208, 0x0280, 0x0280, 0x2008, 0x2008, 0x2080, 0x2080, 0x2000,
    0x0208, 0x0280, 0x0280, 0x2008, 0x2008, 0x2080, 0x2080, 0xa000,
    0x0a00, 0x0a00, 0x8200, 0x8200, 0x8200, 0x8200, 0xa000, 0xa000,
    0x0a00, 0x0a00, 0x8200, 0x8200, 0x8200, 0x8200, 0xa000, 0xa000,
    0x0808, 0x0880, 0x0880, 0x8008, 0x8008, 0x8080, 0x8080, 0xa000,
    0x0808, 0x0880, 0x0880, 0x8008, 0x8008, 0x8080, 0x8080, 0x8000,
    0x0800, 0x0800, 0x8800, 0x8800, 0x8800, 0x8800, 0x8000, 0x8000,
];

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Rgb ─────────────────────────────────────────────────────────────

    #[test]
    fn distance_is_weighted() {
        let origin = Rgb::new(0, 0, 0);
        assert_eq!(origin.distance(Rgb::new(1, 0, 0)), 3);
        assert_eq!(origin.distance(Rgb::new(0, 1, 0)), 4);
        assert_eq!(origin.distance(Rgb::new(0, 0, 1)), 2);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Rgb::new(10, 200, 30);
        let b = Rgb::new(250, 5, 99);
        assert_eq!(a.distance(b), b.distance(a));
    }

    #[test]
    fn bucket_corners() {
        assert_eq!(Rgb::new(0, 0, 0).bucket(), 0);
        assert_eq!(Rgb::new(255, 255, 255).bucket(), 511);
        assert_eq!(Rgb::new(255, 0, 0).bucket(), 7 << 6);
        assert_eq!(Rgb::new(31, 32, 0).bucket(), 1 << 3);
    }

    #[test]
    fn rgb_debug_is_hex() {
        assert_eq!(format!("{:?}", Rgb::new(255, 0, 16)), "#ff0010");
    }

    // ── NamedColor ──────────────────────────────────────────────────────

    #[test]
    fn all_is_in_index_order() {
        for (i, c) in NamedColor::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
            assert_eq!(NamedColor::from_index(i), Some(*c));
        }
        assert_eq!(NamedColor::from_index(16), None);
    }

    #[test]
    fn bright_half() {
        assert!(!NamedColor::Silver.is_bright());
        assert!(NamedColor::Gray.is_bright());
        assert!(NamedColor::White.is_bright());
    }

    #[test]
    fn sgr_codes_fold_bright_onto_normal() {
        assert_eq!(NamedColor::Black.fg_code(), 30);
        assert_eq!(NamedColor::Silver.fg_code(), 37);
        assert_eq!(NamedColor::Gray.fg_code(), 30);
        assert_eq!(NamedColor::Red.fg_code(), 31);
        assert_eq!(NamedColor::White.bg_code(), 47);
        assert_eq!(NamedColor::Navy.bg_code(), 44);
    }

    #[test]
    fn quantize_palette_colors_is_identity() {
        for c in NamedColor::ALL {
            assert_eq!(NamedColor::quantize(c.rgb()), c);
        }
    }

    #[test]
    fn quantize_splits_greens_at_midpoint() {
        assert_eq!(NamedColor::quantize(Rgb::new(0, 200, 0)), NamedColor::Lime);
        assert_eq!(NamedColor::quantize(Rgb::new(0, 150, 0)), NamedColor::Green);
    }

    // ── ColorSet ────────────────────────────────────────────────────────

    #[test]
    fn set_membership() {
        let set = ColorSet::single(NamedColor::Red).with(NamedColor::Blue);
        assert!(set.contains(NamedColor::Red));
        assert!(set.contains(NamedColor::Blue));
        assert!(!set.contains(NamedColor::Lime));
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![NamedColor::Red, NamedColor::Blue]
        );
    }

    #[test]
    fn mean_truncates() {
        let set = ColorSet::single(NamedColor::Red).with(NamedColor::Black);
        assert_eq!(set.mean(), Some(Rgb::new(127, 0, 0)));
        assert_eq!(ColorSet::EMPTY.mean(), None);
    }

    // ── Combination Table ───────────────────────────────────────────────

    /// Nearest single color or distinct pair to `target`.
    fn nearest_combination(target: Rgb) -> ColorSet {
        let mut best = ColorSet::EMPTY;
        let mut best_d = u32::MAX;

        for c in NamedColor::ALL {
            let d = target.distance(c.rgb());
            if d < best_d {
                best_d = d;
                best = ColorSet::single(c);
            }
        }

        for (i, &a) in NamedColor::ALL.iter().enumerate() {
            for &b in &NamedColor::ALL[i + 1..] {
                let pair = ColorSet::single(a).with(b);
                let d = target.distance(pair.mean().unwrap());
                if d < best_d {
                    best_d = d;
                    best = pair;
                }
            }
        }

        best
    }

    #[test]
    fn table_matches_derivation() {
        for (bucket, &bits) in COMBINATIONS.iter().enumerate() {
            let center = Rgb::new(
                u8::try_from((bucket >> 6) * 32 + 16).unwrap(),
                u8::try_from(((bucket >> 3) & 7) * 32 + 16).unwrap(),
                u8::try_from((bucket & 7) * 32 + 16).unwrap(),
            );
            let expected = NamedColor::ALL
                .into_iter()
                .find(|c| c.rgb().bucket() == bucket)
                .map_or_else(|| nearest_combination(center), ColorSet::single);
            assert_eq!(ColorSet(bits), expected, "bucket {bucket}");
        }
    }

    #[test]
    fn palette_colors_map_to_themselves() {
        for c in NamedColor::ALL {
            assert_eq!(ColorSet::for_rgb(c.rgb()), ColorSet::single(c), "{c:?}");
        }
    }

    #[test]
    fn every_bucket_has_a_combination() {
        for r in (0..=255u8).step_by(32) {
            for g in (0..=255u8).step_by(32) {
                for b in (0..=255u8).step_by(32) {
                    let set = ColorSet::for_rgb(Rgb::new(r, g, b));
                    assert!((1..=2).contains(&set.len()));
                }
            }
        }
    }

    #[test]
    fn averaged_pair_reconstructs_as_pair() {
        // Red + blue averages to (127, 0, 127): not purple's bucket.
        let stored = ColorSet::single(NamedColor::Red)
            .with(NamedColor::Blue)
            .mean()
            .unwrap();
        let set = ColorSet::for_rgb(stored);
        assert_eq!(set.len(), 2);
        assert_eq!(set.mean(), Some(stored));
    }
}
