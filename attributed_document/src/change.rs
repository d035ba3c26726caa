// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use core::ops::Range;

/// Description of the units affected by a document mutation.
///
/// `range` is expressed in the coordinates of the document *before* the mutation; it was
/// replaced by `inserted` units starting at `range.start`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Change {
    range: Range<usize>,
    inserted: usize,
    revision: u64,
}

impl Change {
    pub(crate) fn new(range: Range<usize>, inserted: usize, revision: u64) -> Self {
        Self {
            range,
            inserted,
            revision,
        }
    }

    /// The replaced range, in pre-mutation coordinates.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// The number of units inserted at `range().start`.
    pub fn inserted(&self) -> usize {
        self.inserted
    }

    /// The revision of the document this change produced.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The range covered by the inserted units, in post-mutation coordinates.
    pub fn new_range(&self) -> Range<usize> {
        self.range.start..self.range.start + self.inserted
    }

    /// The first unit whose layout may differ from the previous revision.
    pub fn first_affected(&self) -> usize {
        self.range.start
    }
}

/// An edit reported by an editing surface.
///
/// Edits flow into the document through
/// [`AttributedDocument::apply_edit`](crate::AttributedDocument::apply_edit);
/// the surface receives new snapshots in return.
#[derive(Clone, Debug, PartialEq)]
pub enum Edit<A> {
    /// Text typed at `offset`.
    Insert {
        /// Insertion point, in units.
        offset: usize,
        /// The inserted text.
        text: String,
        /// Attributes for the inserted text.
        attributes: A,
    },
    /// Units removed from the document.
    Delete {
        /// The removed range, in units.
        range: Range<usize>,
    },
}
