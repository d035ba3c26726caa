// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Error returned when a mutation addresses units outside the document.
///
/// Carries a non-exhaustive [`ErrorKind`] plus the attempted range and the
/// length of the document at the time of failure. The document a failed
/// mutation was called on is never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// The non-exhaustive category describing this error.
    kind: ErrorKind,

    /// The start unit offset of the caller-provided range.
    start: usize,

    /// The end unit offset (exclusive) of the caller-provided range.
    end: usize,

    /// The length in units of the document at the time of failure.
    len: usize,
}

#[expect(
    clippy::len_without_is_empty,
    reason = "`len` is the length of the document, not of the error"
)]
impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The start offset of the range provided by the caller.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The end offset of the range provided by the caller.
    pub fn end(&self) -> usize {
        self.end
    }

    /// The length in units of the document at the time of the error.
    pub fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn invalid_bounds(start: usize, end: usize, len: usize) -> Self {
        Self {
            kind: ErrorKind::InvalidBounds,
            start,
            end,
            len,
        }
    }

    pub(crate) fn invalid_range(start: usize, end: usize, len: usize) -> Self {
        Self {
            kind: ErrorKind::InvalidRange,
            start,
            end,
            len,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::InvalidBounds => write!(
                f,
                "range {}..{} out of bounds for len {}",
                self.start, self.end, self.len
            ),
            ErrorKind::InvalidRange => {
                write!(f, "invalid range {}..{}: start > end", self.start, self.end)
            }
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Provided range extends past the end of the document.
    InvalidBounds,

    /// The provided range had `start > end`.
    InvalidRange,
}
