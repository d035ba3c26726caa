// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use core::fmt::Debug;
use core::ops::Range;

/// Stable identity of an attachment placeholder.
///
/// Assigned by the [`AttributedDocument`](crate::AttributedDocument) when an attachment run
/// is inserted without one, and preserved across later edits of the document.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttachmentId(u64);

impl AttachmentId {
    /// Creates an identifier from a raw value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw value of this identifier.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A contiguous span of the document sharing one kind and one attribute set.
///
/// `R` is the attachment resource type and `A` the attribute set.
#[derive(Debug)]
pub enum Run<R, A> {
    /// A span of text.
    Text(TextRun<A>),
    /// An inline attachment occupying a single unit.
    Attachment(AttachmentRun<R, A>),
}

impl<R, A> Run<R, A> {
    /// Creates a text run.
    pub fn text(text: impl Into<Arc<str>>, attributes: A) -> Self {
        Self::Text(TextRun::new(text, attributes))
    }

    /// Creates an attachment run referencing `resource`.
    ///
    /// The resource is shared, not copied: passing an existing `Arc` lets any number of
    /// runs reference the same resource.
    pub fn attachment(resource: impl Into<Arc<R>>, attributes: A) -> Self {
        Self::Attachment(AttachmentRun {
            id: None,
            resource: resource.into(),
            attributes,
        })
    }

    /// The length of this run in units.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Attachment(_) => 1,
        }
    }

    /// Returns `true` if this run covers no units.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The attributes of this run.
    pub fn attributes(&self) -> &A {
        match self {
            Self::Text(text) => &text.attributes,
            Self::Attachment(attachment) => &attachment.attributes,
        }
    }

    /// Returns the text run, if this is one.
    pub fn as_text(&self) -> Option<&TextRun<A>> {
        match self {
            Self::Text(text) => Some(text),
            Self::Attachment(_) => None,
        }
    }

    /// Returns the attachment run, if this is one.
    pub fn as_attachment(&self) -> Option<&AttachmentRun<R, A>> {
        match self {
            Self::Text(_) => None,
            Self::Attachment(attachment) => Some(attachment),
        }
    }
}

impl<R, A: Clone> Clone for Run<R, A> {
    fn clone(&self) -> Self {
        match self {
            Self::Text(text) => Self::Text(text.clone()),
            Self::Attachment(attachment) => Self::Attachment(attachment.clone()),
        }
    }
}

/// A span of text with one attribute set.
#[derive(Clone, Debug)]
pub struct TextRun<A> {
    text: Arc<str>,
    /// Number of `char`s in `text`.
    len: usize,
    attributes: A,
}

impl<A> TextRun<A> {
    /// Creates a text run.
    pub fn new(text: impl Into<Arc<str>>, attributes: A) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            text,
            len,
            attributes,
        }
    }

    /// The text of this run.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The number of `char`s in this run.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the run holds no text.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The attributes of this run.
    #[inline]
    pub fn attributes(&self) -> &A {
        &self.attributes
    }

    /// Converts a unit offset within this run into a byte offset into [`Self::text`].
    ///
    /// Offsets past the end clamp to the text length.
    pub fn byte_offset(&self, unit: usize) -> usize {
        self.text
            .char_indices()
            .nth(unit)
            .map_or(self.text.len(), |(index, _)| index)
    }

    /// The text covered by `units`, a unit range relative to the start of this run.
    pub fn slice_str(&self, units: Range<usize>) -> &str {
        let start = self.byte_offset(units.start);
        let end = self.byte_offset(units.end).max(start);
        &self.text[start..end]
    }
}

impl<A: Clone> TextRun<A> {
    pub(crate) fn slice(&self, units: Range<usize>) -> Self {
        Self {
            text: Arc::from(self.slice_str(units.clone())),
            len: units.end.min(self.len) - units.start.min(self.len),
            attributes: self.attributes.clone(),
        }
    }
}

/// An inline attachment referencing a shared resource.
#[derive(Debug)]
pub struct AttachmentRun<R, A> {
    pub(crate) id: Option<AttachmentId>,
    resource: Arc<R>,
    attributes: A,
}

impl<R, A> AttachmentRun<R, A> {
    /// The placeholder identity, once the run is part of a document.
    #[inline]
    pub fn id(&self) -> Option<AttachmentId> {
        self.id
    }

    /// The referenced resource.
    #[inline]
    pub fn resource(&self) -> &Arc<R> {
        &self.resource
    }

    /// The attributes of this run.
    #[inline]
    pub fn attributes(&self) -> &A {
        &self.attributes
    }
}

impl<R, A: Clone> Clone for AttachmentRun<R, A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            resource: Arc::clone(&self.resource),
            attributes: self.attributes.clone(),
        }
    }
}
