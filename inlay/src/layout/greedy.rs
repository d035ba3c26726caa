// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy line breaking.

use core::ops::Range;

use smallvec::SmallVec;

use super::{LineItem, LineItemKind, LineLayout};
use crate::font::is_line_break;
use crate::geometry::{Point, Rect};
use crate::{AttachmentBoundsResolver, Document, Font, Run};

/// The line currently being filled.
///
/// Item rects are relative to the baseline until the line is committed.
#[derive(Default)]
struct LineState {
    items: SmallVec<[LineItem; 4]>,
    start: usize,
    end: usize,
    /// Pen position, including trailing whitespace.
    x: f64,
    /// Advance excluding trailing whitespace.
    width: f64,
}

impl LineState {
    /// Returns `true` if content `width` wide does not fit after what is already on the line.
    ///
    /// An empty line accepts anything, so oversized content is placed alone. Zero width
    /// content (whitespace, line breaks) always stays on the current line.
    fn must_wrap(&self, width: f64, max_width: f64) -> bool {
        !self.items.is_empty() && width > 0.0 && self.x + width > max_width
    }
}

/// Line breaking state for a document.
pub(super) struct BreakLines<'a> {
    doc: &'a Document,
    resolver: &'a AttachmentBoundsResolver,
    max_width: f64,
    line_spacing: f64,
    lines: Vec<LineLayout>,
    line: LineState,
    top: f64,
}

impl<'a> BreakLines<'a> {
    pub(super) fn new(
        doc: &'a Document,
        resolver: &'a AttachmentBoundsResolver,
        max_width: f64,
        line_spacing: f64,
    ) -> Self {
        Self {
            doc,
            resolver,
            max_width,
            line_spacing,
            lines: Vec::new(),
            line: LineState::default(),
            top: 0.0,
        }
    }

    /// Starts from previously computed lines instead of the top of the document.
    pub(super) fn reuse(&mut self, lines: &[LineLayout]) {
        self.lines.extend_from_slice(lines);
        if let Some(last) = lines.last() {
            self.top = last.bottom() + self.line_spacing;
        }
    }

    /// Breaks the document from `offset`, which must be a line boundary, to the end.
    pub(super) fn finish(mut self, offset: usize) -> Vec<LineLayout> {
        log::trace!(
            "breaking lines from offset {offset} of {} at width {}",
            self.doc.total_length(),
            self.max_width
        );
        self.line.start = offset;
        self.line.end = offset;
        let Some((first, inner)) = self.doc.run_at(offset) else {
            return self.lines;
        };
        let (doc, resolver) = (self.doc, self.resolver);
        let mut run_start = offset - inner;
        for (index, run) in doc.runs().iter().enumerate().skip(first) {
            let skip = if index == first { inner } else { 0 };
            match run {
                Run::Text(text) => {
                    let font = resolver.font_for(text.attributes());
                    let segments = Segments {
                        text: text.text(),
                        byte: text.byte_offset(skip),
                        unit: skip,
                    };
                    for segment in segments {
                        let units = run_start + segment.units.start..run_start + segment.units.end;
                        if segment.is_break {
                            let split_crlf = units.end == run_start + text.len()
                                && text.text().ends_with('\r')
                                && starts_with_lf(doc.runs().get(index + 1));
                            self.push_text(index, run_start, units, font, 0.0, 0.0);
                            // The next run's LF ends the line.
                            if !split_crlf {
                                self.commit();
                            }
                            continue;
                        }
                        let word = font.measure(&text.text()[segment.word.clone()]);
                        let space = font.measure(&text.text()[segment.word.end..segment.end]);
                        self.push_text(index, run_start, units, font, word, space);
                    }
                }
                Run::Attachment(attachment) => {
                    // Documents assign an id to every attachment run they hold.
                    let Some(id) = attachment.id() else {
                        run_start += run.len();
                        continue;
                    };
                    let font = resolver.font_for(attachment.attributes());
                    let line_height = font.line_height();
                    let fragment = Rect::new(0.0, self.top, self.max_width, self.top + line_height);
                    let bounds = resolver.resolve(
                        attachment.resource(),
                        attachment.attributes(),
                        fragment,
                        Point::new(self.line.x, 0.0),
                    );
                    if self.line.must_wrap(bounds.size.width, self.max_width) {
                        self.commit();
                    }
                    let x0 = self.line.x;
                    self.line.x += bounds.size.width;
                    self.line.width = self.line.x;
                    self.line.end = run_start + 1;
                    self.line.items.push(LineItem {
                        run: index,
                        run_start,
                        range: run_start..run_start + 1,
                        rect: bounds.to_layout_rect(x0, 0.0),
                        kind: LineItemKind::Attachment { id, bounds },
                    });
                }
            }
            run_start += run.len();
        }
        self.commit();
        self.lines
    }

    fn push_text(
        &mut self,
        run: usize,
        run_start: usize,
        units: Range<usize>,
        font: &Font,
        word: f64,
        space: f64,
    ) {
        if self.line.must_wrap(word, self.max_width) {
            self.commit();
        }
        let x0 = self.line.x;
        if word > 0.0 {
            self.line.width = x0 + word;
        }
        self.line.x = x0 + word + space;
        self.line.end = units.end;
        if let Some(last) = self.line.items.last_mut() {
            if last.run == run
                && last.range.end == units.start
                && matches!(last.kind, LineItemKind::Text { .. })
            {
                last.range.end = units.end;
                last.rect.x1 = self.line.x;
                return;
            }
        }
        let metrics = font.metrics();
        self.line.items.push(LineItem {
            run,
            run_start,
            range: units,
            rect: Rect::new(x0, -(metrics.ascent + metrics.leading), self.line.x, metrics.descent),
            kind: LineItemKind::Text {
                font_size: font.size(),
            },
        });
    }

    fn commit(&mut self) {
        let next = LineState {
            start: self.line.end,
            end: self.line.end,
            ..LineState::default()
        };
        let line = core::mem::replace(&mut self.line, next);
        if line.items.is_empty() {
            return;
        }
        let ascent = line.items.iter().map(|item| -item.rect.y0).fold(0.0, f64::max);
        let descent = line.items.iter().map(|item| item.rect.y1).fold(0.0, f64::max);
        let baseline = self.top + ascent;
        let mut items = line.items;
        for item in &mut items {
            item.rect = item.rect.translate(0.0, baseline);
        }
        let layout = LineLayout {
            items,
            range: line.start..line.end,
            top: self.top,
            ascent,
            descent,
            width: line.width,
        };
        self.top = layout.bottom() + self.line_spacing;
        self.lines.push(layout);
    }
}

/// Returns `true` if `run` is text starting with a line feed.
fn starts_with_lf(run: Option<&Run>) -> bool {
    matches!(run, Some(Run::Text(text)) if text.text().starts_with('\n'))
}

/// A break opportunity delimited piece of a text run: a word and the whitespace after it, or
/// a single line break.
struct Segment {
    /// Units relative to the start of the run.
    units: Range<usize>,
    /// Bytes of the word.
    word: Range<usize>,
    /// Byte end of the trailing whitespace.
    end: usize,
    is_break: bool,
}

struct Segments<'a> {
    text: &'a str,
    byte: usize,
    unit: usize,
}

impl Segments<'_> {
    fn take(&mut self, pred: impl Fn(char) -> bool) {
        for ch in self.text[self.byte..].chars().take_while(|ch| pred(*ch)) {
            self.byte += ch.len_utf8();
            self.unit += 1;
        }
    }
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        let rest = &self.text[self.byte..];
        let first = rest.chars().next()?;
        let (start_byte, start_unit) = (self.byte, self.unit);
        if is_line_break(first) {
            self.byte += first.len_utf8();
            self.unit += 1;
            // CRLF is one break.
            if first == '\r' && rest[1..].starts_with('\n') {
                self.byte += 1;
                self.unit += 1;
            }
            return Some(Segment {
                units: start_unit..self.unit,
                word: start_byte..start_byte,
                end: start_byte,
                is_break: true,
            });
        }
        self.take(|ch| !ch.is_whitespace());
        let word_end = self.byte;
        self.take(|ch| ch.is_whitespace() && !is_line_break(ch));
        Some(Segment {
            units: start_unit..self.unit,
            word: start_byte..word_end,
            end: self.byte,
            is_break: false,
        })
    }
}
