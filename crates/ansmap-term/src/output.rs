// SPDX-License-Identifier: MIT
//
// Output destinations for rendered and encoded bytes.
//
// Producers (the escape-sequence renderer, the document encoder) build their
// whole result in memory first and hand it to an `Output` in one piece. That
// keeps a stream to a single `write_all` and lets a fixed buffer either take
// the complete result or nothing at all, never a truncated escape sequence.

use std::io::{self, Write};

/// Where produced bytes go.
///
/// ```
/// use ansmap_term::output::Output;
///
/// // A zero-length buffer measures: nothing is written, the size comes back.
/// let needed = Output::Buffer(&mut []).deliver(b"hello", &[]).unwrap();
/// assert_eq!(needed, 5);
///
/// let mut sink = Vec::new();
/// Output::Stream(&mut sink).deliver(b"hello", &[]).unwrap();
/// assert_eq!(sink, b"hello");
/// ```
pub enum Output<'a> {
    /// A fixed buffer. Receives the full result only if it fits.
    Buffer(&'a mut [u8]),
    /// Any writer, such as a locked stdout or a `Vec<u8>`.
    Stream(&'a mut dyn Write),
}

impl Output<'_> {
    /// Hand `bytes` to the destination and return their length.
    ///
    /// A buffer shorter than `bytes` receives nothing except a zeroed first
    /// byte; the returned length is then larger than the buffer, which is how
    /// callers detect the miss. `source` is the storage the bytes were
    /// produced from and must not overlap a buffer destination.
    ///
    /// # Errors
    ///
    /// Propagates write errors from a stream destination.
    ///
    /// # Panics
    ///
    /// Panics if a buffer destination overlaps `source`.
    pub fn deliver(self, bytes: &[u8], source: &[u8]) -> io::Result<usize> {
        match self {
            Self::Buffer(buf) => {
                assert_disjoint(buf, source);
                if let Some(dst) = buf.get_mut(..bytes.len()) {
                    dst.copy_from_slice(bytes);
                } else {
                    tracing::trace!(
                        capacity = buf.len(),
                        required = bytes.len(),
                        "output buffer too small"
                    );
                    if let Some(first) = buf.first_mut() {
                        *first = 0;
                    }
                }
                Ok(bytes.len())
            }
            Self::Stream(w) => {
                w.write_all(bytes)?;
                w.flush()?;
                Ok(bytes.len())
            }
        }
    }
}

impl std::fmt::Debug for Output<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buffer(buf) => f.debug_tuple("Buffer").field(&buf.len()).finish(),
            Self::Stream(_) => f.write_str("Stream"),
        }
    }
}

/// Panic if `dst` and `src` share any byte.
fn assert_disjoint(dst: &[u8], src: &[u8]) {
    if dst.is_empty() || src.is_empty() {
        return;
    }
    let d = dst.as_ptr_range();
    let s = src.as_ptr_range();
    assert!(
        d.end <= s.start || s.end <= d.start,
        "output buffer overlaps the canvas storage it is produced from"
    );
}

// ─── Tests ───────────────────────────────────────────────────────────────────
