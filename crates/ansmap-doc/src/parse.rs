// SPDX-License-Identifier: MIT
//
// Structural parser shared by `probe` and `decode`.
//
// Document grammar (one item per line):
//
//   ╔═══╗     top border, rule length = width (at least 1)
//   ║...║     row of the current layer, exactly `width` code points inside
//   ╠═══╣     separator, starts the next layer
//   ╚═══╝     bottom border, ends the document
//
// Layer 0 rows hold glyphs; rows of every later layer hold style markers and
// are validated here, so a document that probes fine always decodes. Blank
// lines before the top border or after the bottom border are ignored, as
// are trailing NUL bytes. Rows may end in `\r\n`.

use ansmap_term::Style;

use crate::error::DecodeError;

pub(crate) const TOP_LEFT: char = '╔';
pub(crate) const TOP_RIGHT: char = '╗';
pub(crate) const SEP_LEFT: char = '╠';
pub(crate) const SEP_RIGHT: char = '╣';
pub(crate) const BOTTOM_LEFT: char = '╚';
pub(crate) const BOTTOM_RIGHT: char = '╝';
pub(crate) const RULE: char = '═';
pub(crate) const WALL: char = '║';

/// A structurally valid document, borrowing its rows from the input.
#[derive(Debug)]
pub(crate) struct Parsed<'a> {
    pub width: u32,
    pub height: u32,
    /// Layer 0 first. Each row is the text between the walls.
    pub layers: Vec<Vec<&'a str>>,
}

pub(crate) fn parse(doc: &[u8]) -> Result<Parsed<'_>, DecodeError> {
    let end = doc.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let text = std::str::from_utf8(&doc[..end]).map_err(|e| DecodeError::InvalidUtf8 {
        offset: e.valid_up_to(),
    })?;

    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .skip_while(|(_, line)| is_blank(line));

    let (_, top) = lines.next().ok_or(DecodeError::MissingBorder)?;
    let width = rule_len(top, TOP_LEFT, TOP_RIGHT).ok_or(DecodeError::MissingBorder)?;
    if width == 0 {
        return Err(DecodeError::EmptyRule);
    }

    let mut layers: Vec<Vec<&str>> = vec![Vec::new()];
    let mut terminated = false;

    for (n, line) in lines.by_ref() {
        if let Some(inner) = line.strip_prefix(WALL) {
            let inner = inner.strip_suffix(WALL).ok_or(DecodeError::UnexpectedRow { line: n })?;
            check_width(n, width, inner.chars().count())?;
            if layers.len() > 1 {
                check_markers(n, inner)?;
            }
            if let Some(layer) = layers.last_mut() {
                layer.push(inner);
            }
        } else if line.starts_with(SEP_LEFT) {
            let found = rule_len(line, SEP_LEFT, SEP_RIGHT).ok_or(DecodeError::UnexpectedRow { line: n })?;
            check_width(n, width, found)?;
            layers.push(Vec::new());
        } else if line.starts_with(BOTTOM_LEFT) {
            let found = rule_len(line, BOTTOM_LEFT, BOTTOM_RIGHT).ok_or(DecodeError::UnexpectedRow { line: n })?;
            check_width(n, width, found)?;
            terminated = true;
            break;
        } else {
            return Err(DecodeError::UnexpectedRow { line: n });
        }
    }

    if !terminated {
        return Err(DecodeError::MissingTerminator);
    }
    if let Some((n, _)) = lines.find(|(_, line)| !is_blank(line)) {
        return Err(DecodeError::UnexpectedRow { line: n });
    }

    let rows = layers.iter().map(Vec::len).max().unwrap_or(0);
    Ok(Parsed {
        width: u32::try_from(width).map_err(|_| DecodeError::too_wide(width))?,
        height: u32::try_from(rows).map_err(|_| DecodeError::too_tall(rows))?,
        layers,
    })
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Length of a `left═…═right` rule, or `None` if `line` is not one.
fn rule_len(line: &str, left: char, right: char) -> Option<usize> {
    let inner = line.strip_prefix(left)?.strip_suffix(right)?;
    inner.chars().all(|c| c == RULE).then(|| inner.chars().count())
}

const fn check_width(line: usize, expected: usize, found: usize) -> Result<(), DecodeError> {
    if found == expected {
        Ok(())
    } else {
        Err(DecodeError::WrongWidth {
            line,
            expected,
            found,
        })
    }
}

fn check_markers(line: usize, row: &str) -> Result<(), DecodeError> {
    for (i, marker) in row.chars().enumerate() {
        if marker != ' ' && Style::from_marker(marker).is_none() {
            return Err(DecodeError::UnknownMarker {
                line,
                column: i + 2,
                marker,
            });
        }
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
