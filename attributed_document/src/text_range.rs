// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

use crate::Error;

/// Checks that `range` is ordered and ends within a document of length `len`.
#[inline]
pub(crate) fn validate_range(len: usize, range: &Range<usize>) -> Result<(), Error> {
    if range.start > range.end {
        return Err(Error::invalid_range(range.start, range.end, len));
    }
    if range.end > len {
        return Err(Error::invalid_bounds(range.start, range.end, len));
    }
    Ok(())
}
