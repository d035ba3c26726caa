// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line layout of a [`Document`].

mod greedy;

use core::ops::Range;
use std::sync::Arc;

use attributed_document::AttachmentId;
use smallvec::SmallVec;

use crate::geometry::Rect;
use crate::{AttachmentBounds, AttachmentBoundsResolver, Document, Run};

use greedy::BreakLines;

/// What a [`LineItem`] covers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LineItemKind {
    /// Part of a text run.
    Text {
        /// Point size of the run's font.
        font_size: f64,
    },
    /// An attachment run.
    Attachment {
        /// The attachment's identity within the document.
        id: AttachmentId,
        /// The bounds the resolver produced for it.
        bounds: AttachmentBounds,
    },
}

/// A positioned piece of one run within a line.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem {
    /// Index of the run in the document.
    pub run: usize,
    /// Offset at which that run starts in the document.
    pub run_start: usize,
    /// Units covered, in document coordinates.
    pub range: Range<usize>,
    /// Area covered, in layout coordinates. Text items include trailing whitespace.
    pub rect: Rect,
    /// The item's kind.
    pub kind: LineItemKind,
}

impl LineItem {
    /// The covered units relative to the start of the run.
    pub fn run_range(&self) -> Range<usize> {
        self.range.start - self.run_start..self.range.end - self.run_start
    }
}

/// One line of a [`DocumentLayout`].
#[derive(Clone, Debug, PartialEq)]
pub struct LineLayout {
    pub(crate) items: SmallVec<[LineItem; 4]>,
    pub(crate) range: Range<usize>,
    pub(crate) top: f64,
    pub(crate) ascent: f64,
    pub(crate) descent: f64,
    pub(crate) width: f64,
}

impl LineLayout {
    /// The items on the line, in visual order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The document units on the line, including a terminating line break.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// The top edge.
    pub fn top(&self) -> f64 {
        self.top
    }

    /// The baseline position.
    pub fn baseline(&self) -> f64 {
        self.top + self.ascent
    }

    /// The largest extent of any item above the baseline.
    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    /// The largest extent of any item below the baseline.
    pub fn descent(&self) -> f64 {
        self.descent
    }

    /// `ascent + descent`.
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }

    /// The bottom edge.
    pub fn bottom(&self) -> f64 {
        self.top + self.height()
    }

    /// The advance of the line's content, excluding trailing whitespace.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// The area from the top to the bottom of the line, across its content.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, self.top, self.width, self.bottom())
    }
}

/// A document broken into lines.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentLayout {
    lines: Vec<LineLayout>,
    max_width: f64,
    line_spacing: f64,
    revision: u64,
    reused: usize,
}

impl DocumentLayout {
    /// Lays out `doc` in lines at most `max_width` wide.
    ///
    /// Text breaks at whitespace and line breaks. A word or attachment wider than
    /// `max_width` is placed alone on its line. Consecutive lines are separated by
    /// `line_spacing`.
    pub fn new(
        doc: &Document,
        max_width: f64,
        line_spacing: f64,
        resolver: &AttachmentBoundsResolver,
    ) -> Self {
        let max_width = sanitize_width(max_width);
        let lines = BreakLines::new(doc, resolver, max_width, line_spacing).finish(0);
        Self {
            lines,
            max_width,
            line_spacing,
            revision: doc.revision(),
            reused: 0,
        }
    }

    /// Lays out `doc`, which is assumed to be derived from `prev_doc`, the document this
    /// layout was built from.
    ///
    /// When `doc` is the revision right after `prev_doc` and the runs ahead of its last
    /// change are unchanged, lines that end before the change are kept and breaking resumes
    /// from there. Otherwise the document is laid out from scratch.
    pub fn update(
        &self,
        prev_doc: &Document,
        doc: &Document,
        max_width: f64,
        line_spacing: f64,
        resolver: &AttachmentBoundsResolver,
    ) -> Self {
        let max_width = sanitize_width(max_width);
        let Some(keep) = self.reusable_lines(prev_doc, doc, max_width, line_spacing) else {
            return Self::new(doc, max_width, line_spacing, resolver);
        };
        log::trace!(
            "relayout of revision {} keeps {keep} of {} lines",
            doc.revision(),
            self.lines.len()
        );
        let resume = keep
            .checked_sub(1)
            .map_or(0, |last| self.lines[last].range.end);
        let mut breaker = BreakLines::new(doc, resolver, max_width, line_spacing);
        breaker.reuse(&self.lines[..keep]);
        Self {
            lines: breaker.finish(resume),
            max_width,
            line_spacing,
            revision: doc.revision(),
            reused: keep,
        }
    }

    /// The lines, top to bottom.
    pub fn lines(&self) -> &[LineLayout] {
        &self.lines
    }

    /// The width lines were broken at.
    pub fn max_width(&self) -> f64 {
        self.max_width
    }

    /// The advance of the widest line.
    pub fn width(&self) -> f64 {
        self.lines.iter().map(LineLayout::width).fold(0.0, f64::max)
    }

    /// The distance from the top of the first line to the bottom of the last.
    pub fn height(&self) -> f64 {
        self.lines.last().map_or(0.0, LineLayout::bottom)
    }

    /// The document revision this layout was built from.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The number of leading lines carried over from the previous layout by
    /// [`update`](Self::update).
    pub fn reused_lines(&self) -> usize {
        self.reused
    }

    fn reusable_lines(
        &self,
        prev_doc: &Document,
        doc: &Document,
        max_width: f64,
        line_spacing: f64,
    ) -> Option<usize> {
        if self.max_width != max_width
            || self.line_spacing != line_spacing
            || prev_doc.revision() != self.revision
            || doc.revision() != self.revision + 1
        {
            return None;
        }
        let start = doc.last_change()?.first_affected();
        let (index, inner) = prev_doc.run_at(start).unwrap_or((prev_doc.runs().len(), 0));
        let old = prev_doc.runs();
        let new = doc.runs();
        if new.len() < index {
            return None;
        }
        if !old[..index].iter().zip(&new[..index]).all(|(a, b)| same_run(a, b)) {
            return None;
        }
        if inner > 0 {
            // The change starts part way into a text run; its head must be unchanged.
            let (Some(Run::Text(a)), Some(Run::Text(b))) = (old.get(index), new.get(index)) else {
                return None;
            };
            if a.attributes() != b.attributes() || a.slice_str(0..inner) != b.slice_str(0..inner) {
                return None;
            }
        }
        // The last line ending before the change may now take content from after it.
        let ended = self
            .lines
            .iter()
            .take_while(|line| line.range.end <= start)
            .count();
        Some(ended.saturating_sub(1))
    }
}

fn same_run(a: &Run, b: &Run) -> bool {
    match (a, b) {
        (Run::Text(a), Run::Text(b)) => {
            (core::ptr::eq(a.text(), b.text()) || a.text() == b.text())
                && a.attributes() == b.attributes()
        }
        (Run::Attachment(a), Run::Attachment(b)) => {
            a.id() == b.id()
                && Arc::ptr_eq(a.resource(), b.resource())
                && a.attributes() == b.attributes()
        }
        _ => false,
    }
}

fn sanitize_width(width: f64) -> f64 {
    if width.is_nan() {
        f64::INFINITY
    } else {
        width.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentLayout, LineItemKind};
    use crate::{AttachmentBoundsResolver, AttachmentResource, Attributes, Document, Font, Run};

    fn attrs() -> Attributes {
        Attributes::new().with_font(Font::system(20.0))
    }

    fn layout(doc: &Document, width: f64) -> DocumentLayout {
        DocumentLayout::new(doc, width, 0.0, &AttachmentBoundsResolver::default())
    }

    fn line_texts(doc: &Document, layout: &DocumentLayout) -> Vec<String> {
        let text: Vec<char> = doc.plain_text().chars().collect();
        layout
            .lines()
            .iter()
            .map(|line| text[line.range()].iter().collect())
            .collect()
    }

    #[test]
    fn empty_document_has_no_lines() {
        let layout = layout(&Document::new(), 100.0);
        assert!(layout.lines().is_empty());
        assert_eq!(layout.height(), 0.0);
    }

    #[test]
    fn wraps_at_whitespace() {
        // Each glyph is 11 wide and each space 5 at 20pt.
        let doc = Document::new().append(Run::text("aaaa bbbb cccc", attrs()));
        let layout = layout(&doc, 100.0);
        assert_eq!(line_texts(&doc, &layout), ["aaaa bbbb ", "cccc"]);
        assert!((layout.lines()[0].width() - 93.0).abs() < 1e-9, "trailing space hangs");
        let first = &layout.lines()[0];
        let second = &layout.lines()[1];
        assert!((second.top() - first.bottom()).abs() < 1e-9);
    }

    #[test]
    fn long_word_is_placed_alone() {
        let doc = Document::new().append(Run::text("ab abcdefghijkl cd", attrs()));
        let layout = layout(&doc, 50.0);
        assert_eq!(line_texts(&doc, &layout), ["ab ", "abcdefghijkl ", "cd"]);
        assert!(layout.lines()[1].width() > 50.0);
    }

    #[test]
    fn line_breaks_end_lines() {
        let doc = Document::new().append(Run::text("one\n\ntwo\r\nthree", attrs()));
        let layout = layout(&doc, 1000.0);
        assert_eq!(line_texts(&doc, &layout), ["one\n", "\n", "two\r\n", "three"]);
        for line in layout.lines() {
            assert!(line.height() > 0.0, "empty lines keep the font's height");
        }
    }

    #[test]
    fn crlf_split_across_runs_is_one_break() {
        let doc = Document::new()
            .append(Run::text("one\r", attrs()))
            .append(Run::text("\ntwo", attrs()));
        assert_eq!(line_texts(&doc, &layout(&doc, 1000.0)), ["one\r\n", "two"]);

        let resolver = AttachmentBoundsResolver::default();
        let typed = Document::new().append(Run::text("one\r", attrs()));
        let before = DocumentLayout::new(&typed, 1000.0, 0.0, &resolver);
        assert_eq!(line_texts(&typed, &before), ["one\r"]);
        let edited = typed.insert(4, [Run::text("\ntwo", attrs())]).unwrap();
        let after = before.update(&typed, &edited, 1000.0, 0.0, &resolver);
        assert_eq!(line_texts(&edited, &after), ["one\r\n", "two"]);
    }

    #[test]
    fn attachments_are_atomic_and_sit_on_the_baseline() {
        let cat = AttachmentResource::placeholder();
        let font = Font::system(20.0);
        let doc = Document::new()
            .append(Run::text("aaaa ", attrs()))
            .append(Run::attachment(cat, attrs()))
            .append(Run::text(" b", attrs()));
        let layout = layout(&doc, 60.0);
        assert_eq!(layout.lines().len(), 2);
        let line = &layout.lines()[1];
        let item = &line.items()[0];
        let LineItemKind::Attachment { bounds, .. } = item.kind else {
            panic!("expected the attachment to start the second line");
        };
        assert_eq!(bounds.size.height, font.line_height());
        assert!((item.rect.y1 - (line.baseline() + font.metrics().descent)).abs() < 1e-9);
        assert!((line.height() - font.line_height()).abs() < 1e-9);
    }

    #[test]
    fn tall_attachment_grows_the_line() {
        let tall = AttachmentResource::placeholder().with_height_override(100.0);
        let doc = Document::new()
            .append(Run::text("a", attrs()))
            .append(Run::attachment(tall, attrs()));
        let layout = layout(&doc, 1000.0);
        let line = &layout.lines()[0];
        assert!((line.height() - 100.0).abs() < 1e-9);
        let text = &line.items()[0];
        let descent = Font::system(20.0).metrics().descent;
        assert!((text.rect.y1 - line.baseline() - descent).abs() < 1e-9);
    }

    #[test]
    fn adjacent_words_share_an_item() {
        let doc = Document::new().append(Run::text("a b c", attrs()));
        let layout = layout(&doc, 1000.0);
        assert_eq!(layout.lines()[0].items().len(), 1);
        assert_eq!(layout.lines()[0].items()[0].range, 0..5);
    }

    #[test]
    fn line_spacing_separates_lines() {
        let doc = Document::new().append(Run::text("a\nb", attrs()));
        let layout = DocumentLayout::new(&doc, 1000.0, 4.0, &AttachmentBoundsResolver::default());
        let [first, second] = layout.lines() else {
            panic!("expected two lines");
        };
        assert!((second.top() - first.bottom() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn update_reuses_lines_before_an_edit() {
        let resolver = AttachmentBoundsResolver::default();
        let text = "aaaa bbbb\ncccc dddd\neeee ffff\ngggg";
        let doc = Document::new().append(Run::text(text, attrs()));
        let before = DocumentLayout::new(&doc, 1000.0, 0.0, &resolver);
        let edited = doc.insert(doc.total_length(), [Run::text(" hhhh", attrs())]).unwrap();
        let after = before.update(&doc, &edited, 1000.0, 0.0, &resolver);
        // The last line ended at the old end of the document, so it is rebuilt.
        assert_eq!(after.reused_lines(), 3);
        assert_eq!(after, {
            let mut fresh = DocumentLayout::new(&edited, 1000.0, 0.0, &resolver);
            fresh.reused = 3;
            fresh
        });
    }

    #[test]
    fn update_starts_over_for_unrelated_documents() {
        let resolver = AttachmentBoundsResolver::default();
        let doc = Document::new().append(Run::text("a\nb\nc", attrs()));
        let before = DocumentLayout::new(&doc, 1000.0, 0.0, &resolver);
        let other = Document::new()
            .append(Run::text("x\ny", attrs()))
            .append(Run::text("z", attrs()));
        let after = before.update(&doc, &other, 1000.0, 0.0, &resolver);
        assert_eq!(after.reused_lines(), 0);
        assert_eq!(after, DocumentLayout::new(&other, 1000.0, 0.0, &resolver));
    }
}
