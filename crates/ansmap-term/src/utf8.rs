// SPDX-License-Identifier: MIT
//
// Code-point utility — measuring and validating single UTF-8 characters.
//
// Everything in ansmap counts text in code points, not bytes and not
// terminal columns. A glyph slot holds exactly one code point, alignment
// measures code points, and the document format counts one code point per
// cell. This module is the single place that decides what a valid code
// point looks like in raw bytes.
//
// Inputs are raw byte slices rather than `&str` because glyphs arrive from
// caller buffers and document bytes that have not been validated yet. A NUL
// byte terminates the input, matching the glyph slot layout on the canvas.

/// Byte length of the code point at the start of `bytes`.
///
/// - `Some(0)` — empty input or a leading NUL (nothing to read).
/// - `Some(1..=4)` — a complete, valid UTF-8 sequence.
/// - `None` — invalid or truncated sequence (stray continuation bytes,
///   overlong encodings, surrogates, values above U+10FFFF).
///
/// ```
/// use ansmap_term::utf8::code_point_len;
///
/// assert_eq!(code_point_len(b"A"), Some(1));
/// assert_eq!(code_point_len("é".as_bytes()), Some(2));
/// assert_eq!(code_point_len("🔥x".as_bytes()), Some(4));
/// assert_eq!(code_point_len(b""), Some(0));
/// assert_eq!(code_point_len(&[0xC0, 0x80]), None); // overlong NUL
/// ```
#[must_use]
pub fn code_point_len(bytes: &[u8]) -> Option<usize> {
    let Some(&lead) = bytes.first() else {
        return Some(0);
    };

    let len = match lead {
        0x00 => return Some(0),
        0x01..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return None,
    };

    // std's validator rejects overlongs, surrogates and out-of-range values
    // for the multi-byte forms the lead byte admits.
    let seq = bytes.get(..len)?;
    std::str::from_utf8(seq).ok().map(|_| len)
}

/// Number of code points in `bytes`, stopping at the first NUL or invalid
/// sequence.
#[must_use]
pub fn code_point_count(bytes: &[u8]) -> usize {
    let mut rest = bytes;
    let mut count = 0;

    while let Some(len @ 1..) = code_point_len(rest) {
        count += 1;
        rest = &rest[len..];
    }

    count
}

/// The first code point of `bytes` as a string slice.
///
/// Returns `None` for empty input, a leading NUL, or an invalid sequence.
#[must_use]
pub fn first_code_point(bytes: &[u8]) -> Option<&str> {
    match code_point_len(bytes)? {
        0 => None,
        len => std::str::from_utf8(&bytes[..len]).ok(),
    }
}

/// Whether a glyph may be printed as-is.
///
/// The leading code point must be valid and not a control character (C0,
/// DEL or C1); control characters would move the terminal cursor or break
/// document rows.
#[must_use]
pub fn is_printable(glyph: &[u8]) -> bool {
    first_code_point(glyph)
        .and_then(|s| s.chars().next())
        .is_some_and(|ch| !ch.is_control())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
