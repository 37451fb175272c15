// SPDX-License-Identifier: MIT
//
// Decode errors. Line and column numbers are 1-based and count code points,
// the way an editor shows them.

/// Why a document was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("document is not valid UTF-8 (at byte {offset})")]
    InvalidUtf8 { offset: usize },

    #[error("document does not start with a `╔═…═╗` border")]
    MissingBorder,

    #[error("top border has no `═` rule")]
    EmptyRule,

    #[error("line {line}: row is {found} cells wide, border is {expected}")]
    WrongWidth {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: not a row, separator or bottom border")]
    UnexpectedRow { line: usize },

    #[error("document has no `╚═…═╝` bottom border")]
    MissingTerminator,

    #[error("line {line}, column {column}: unknown style marker {marker:?}")]
    UnknownMarker {
        line: usize,
        column: usize,
        marker: char,
    },

    #[error("document is {found} cells {axis}, more than a canvas can hold")]
    TooLarge { axis: &'static str, found: usize },
}

impl DecodeError {
    pub(crate) const fn too_wide(found: usize) -> Self {
        Self::TooLarge { axis: "wide", found }
    }

    pub(crate) const fn too_tall(found: usize) -> Self {
        Self::TooLarge { axis: "tall", found }
    }
}
