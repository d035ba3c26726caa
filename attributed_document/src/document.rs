// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::Range;

use crate::text_range::validate_range;
use crate::{
    AttachmentId, AttachmentRun, Change, Edit, Error, OBJECT_REPLACEMENT_CHARACTER, Run, TextRun,
};

/// An ordered sequence of text and attachment runs.
///
/// Documents are values: [`append`](Self::append) and [`replace_range`](Self::replace_range)
/// return a new document and never modify `self`. The `&mut self` variants
/// ([`push`](Self::push), [`splice`](Self::splice)) mutate in place with copy-on-write
/// semantics, so snapshots cloned earlier are unaffected; they are amortized O(1) for
/// appends when the run storage is not shared.
#[derive(Debug)]
pub struct AttributedDocument<R, A> {
    runs: Arc<Vec<Run<R, A>>>,
    /// Sum of the lengths of `runs`, maintained incrementally.
    len: usize,
    revision: u64,
    next_attachment: u64,
    last_change: Option<Change>,
}

impl<R, A> Clone for AttributedDocument<R, A> {
    fn clone(&self) -> Self {
        Self {
            runs: Arc::clone(&self.runs),
            len: self.len,
            revision: self.revision,
            next_attachment: self.next_attachment,
            last_change: self.last_change.clone(),
        }
    }
}

impl<R, A> Default for AttributedDocument<R, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, A> AttributedDocument<R, A> {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self {
            runs: Arc::new(Vec::new()),
            len: 0,
            revision: 0,
            next_attachment: 0,
            last_change: None,
        }
    }

    /// The runs of this document, in order.
    #[inline]
    pub fn runs(&self) -> &[Run<R, A>] {
        &self.runs
    }

    /// The total length of the document in units.
    #[inline]
    pub fn total_length(&self) -> usize {
        self.len
    }

    /// Returns `true` if the document has no content.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Recomputes the total length from the runs, ignoring the cached value.
    pub fn recompute_length(&self) -> usize {
        self.runs.iter().map(Run::len).sum()
    }

    /// The number of mutations that produced this snapshot.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The change that produced this snapshot from its predecessor, if any.
    #[inline]
    pub fn last_change(&self) -> Option<&Change> {
        self.last_change.as_ref()
    }

    /// Returns `true` if both documents share the same run storage.
    pub fn shares_runs_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.runs, &other.runs)
    }

    /// Locates the run containing `offset`.
    ///
    /// Returns the run index and the offset within that run. An offset on a run boundary
    /// resolves to the start of the following run. Returns `None` for `offset >= total_length()`.
    pub fn run_at(&self, offset: usize) -> Option<(usize, usize)> {
        if offset >= self.len {
            return None;
        }
        let mut start = 0;
        for (index, run) in self.runs.iter().enumerate() {
            let end = start + run.len();
            if offset < end {
                return Some((index, offset - start));
            }
            start = end;
        }
        None
    }

    /// The unit offset at which the run at `index` starts.
    pub fn run_start(&self, index: usize) -> Option<usize> {
        if index > self.runs.len() {
            return None;
        }
        Some(self.runs[..index].iter().map(Run::len).sum())
    }

    /// Iterates over the attachment runs and their unit offsets.
    pub fn attachments(&self) -> Attachments<'_, R, A> {
        Attachments {
            runs: self.runs.iter(),
            offset: 0,
        }
    }

    /// Serializes the document to plain text.
    ///
    /// Attachments are written as [`OBJECT_REPLACEMENT_CHARACTER`], so unit offsets in the
    /// document match `char` offsets in the result.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for run in self.runs.iter() {
            match run {
                Run::Text(text) => out.push_str(text.text()),
                Run::Attachment(_) => out.push(OBJECT_REPLACEMENT_CHARACTER),
            }
        }
        out
    }

    /// Gives each attachment in `incoming` an id that is unique in the resulting document.
    ///
    /// `replaced` is the index range of the runs `incoming` replaces. An attachment keeps the
    /// id it carries only if this document issued it and no other run keeps it, so a run
    /// cloned from this document (or another one) and inserted again becomes a new
    /// placeholder.
    fn assign_ids(&mut self, incoming: &mut [Run<R, A>], replaced: Range<usize>) {
        for index in 0..incoming.len() {
            let (earlier, rest) = incoming.split_at_mut(index);
            let Run::Attachment(attachment) = &mut rest[0] else {
                continue;
            };
            let keep = attachment.id.is_some_and(|id| {
                let held = |run: &Run<R, A>| run_id(run) == Some(id);
                id.get() < self.next_attachment
                    && !earlier.iter().any(held)
                    && !self.runs[..replaced.start].iter().any(held)
                    && !self.runs[replaced.end..].iter().any(held)
            });
            if !keep {
                attachment.id = Some(AttachmentId::new(self.next_attachment));
                self.next_attachment += 1;
            }
        }
    }

    fn record(&mut self, range: Range<usize>, inserted: usize) -> Change {
        self.revision += 1;
        let change = Change::new(range, inserted, self.revision);
        self.last_change = Some(change.clone());
        change
    }
}

impl<R, A: Clone> AttributedDocument<R, A> {
    /// Creates a document from a sequence of runs.
    pub fn from_runs(runs: impl IntoIterator<Item = Run<R, A>>) -> Self {
        let mut doc = Self::new();
        for run in runs {
            doc.push(run);
        }
        doc.revision = 0;
        doc.last_change = None;
        doc
    }

    /// Returns a new document with `run` appended.
    #[must_use]
    pub fn append(&self, run: Run<R, A>) -> Self {
        let mut next = self.clone();
        next.push(run);
        next
    }

    /// Appends `run` in place.
    ///
    /// Empty text runs are ignored, but still recorded as an (empty) change.
    pub fn push(&mut self, run: Run<R, A>) -> Change {
        let start = self.len;
        let mut pending = [run];
        let end = self.runs.len();
        self.assign_ids(&mut pending, end..end);
        let [run] = pending;
        let inserted = run.len();
        if inserted > 0 {
            Arc::make_mut(&mut self.runs).push(run);
            self.len += inserted;
        }
        self.record(start..start, inserted)
    }

    /// Returns a new document with `range` replaced by `runs`.
    ///
    /// Fails if `range` is reversed or extends past [`total_length`](Self::total_length);
    /// `self` is never modified.
    pub fn replace_range(
        &self,
        range: Range<usize>,
        runs: impl IntoIterator<Item = Run<R, A>>,
    ) -> Result<Self, Error> {
        validate_range(self.len, &range)?;
        let mut next = self.clone();
        next.splice(range, runs)?;
        Ok(next)
    }

    /// Returns a new document with `runs` inserted at `offset`.
    pub fn insert(
        &self,
        offset: usize,
        runs: impl IntoIterator<Item = Run<R, A>>,
    ) -> Result<Self, Error> {
        self.replace_range(offset..offset, runs)
    }

    /// Returns a new document with `range` removed.
    pub fn delete(&self, range: Range<usize>) -> Result<Self, Error> {
        self.replace_range(range, core::iter::empty())
    }

    /// Applies an edit reported by an editing surface.
    pub fn apply_edit(&self, edit: Edit<A>) -> Result<Self, Error> {
        match edit {
            Edit::Insert {
                offset,
                text,
                attributes,
            } => self.insert(offset, [Run::text(text, attributes)]),
            Edit::Delete { range } => self.delete(range),
        }
    }

    /// Replaces `range` with `runs` in place.
    ///
    /// Text runs straddling either end of `range` are split; their outer parts keep their
    /// attributes. On error nothing is modified.
    pub fn splice(
        &mut self,
        range: Range<usize>,
        runs: impl IntoIterator<Item = Run<R, A>>,
    ) -> Result<Change, Error> {
        validate_range(self.len, &range)?;

        let (start_index, start_inner) = self.locate(range.start);
        let (end_index, end_inner) = self.locate(range.end);
        // A run the range ends inside is replaced by its tail.
        let drain_end = end_index + usize::from(end_inner > 0);

        let mut incoming: Vec<Run<R, A>> = runs.into_iter().filter(|run| !run.is_empty()).collect();
        self.assign_ids(&mut incoming, start_index..drain_end);
        let inserted: usize = incoming.iter().map(Run::len).sum();

        let mut replacement = Vec::with_capacity(incoming.len() + 2);
        if start_inner > 0 {
            // Only text runs can be entered part way.
            if let Run::Text(text) = &self.runs[start_index] {
                replacement.push(Run::Text(text.slice(0..start_inner)));
            }
        }
        replacement.extend(incoming);
        if end_inner > 0 {
            if let Run::Text(text) = &self.runs[end_index] {
                let tail: TextRun<A> = text.slice(end_inner..text.len());
                replacement.push(Run::Text(tail));
            }
        }

        let runs = Arc::make_mut(&mut self.runs);
        drop(runs.splice(start_index..drain_end, replacement));
        self.len = self.len - (range.end - range.start) + inserted;
        debug_assert_eq!(
            self.len,
            self.recompute_length(),
            "incremental length must match the runs"
        );
        Ok(self.record(range, inserted))
    }

    /// Like [`run_at`](Self::run_at), but resolves `offset == total_length()` to
    /// `(runs.len(), 0)`.
    fn locate(&self, offset: usize) -> (usize, usize) {
        self.run_at(offset).unwrap_or((self.runs.len(), 0))
    }
}

fn run_id<R, A>(run: &Run<R, A>) -> Option<AttachmentId> {
    run.as_attachment().and_then(AttachmentRun::id)
}

/// Iterator over the attachment runs of a document, see [`AttributedDocument::attachments`].
#[derive(Debug)]
pub struct Attachments<'a, R, A> {
    runs: core::slice::Iter<'a, Run<R, A>>,
    offset: usize,
}

impl<'a, R, A> Iterator for Attachments<'a, R, A> {
    type Item = (usize, &'a AttachmentRun<R, A>);

    fn next(&mut self) -> Option<Self::Item> {
        for run in self.runs.by_ref() {
            let offset = self.offset;
            self.offset += run.len();
            if let Run::Attachment(attachment) = run {
                return Some((offset, attachment));
            }
        }
        None
    }
}
