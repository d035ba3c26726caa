// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rich text layout with inline attachments.
//!
//! Inlay positions static images and animated views inside flowing text. The pieces, leaves
//! first:
//!
//! - [`AttachmentResource`]: what an attachment shows (one frame, or a looping frame sequence).
//! - [`AttachmentBoundsResolver`]: where an attachment sits on a line, aligned to the
//!   surrounding font's metrics.
//! - [`Document`]: an immutable, copy-on-write sequence of text and attachment runs
//!   (see the [`attributed_document`] crate).
//! - [`DocumentRenderer`]: breaks a document into lines, mounts views for attachments inside
//!   the viewport through a [`ContentProvider`], and composites the result.
//!
//! Everything runs on one thread. Animated attachments register repeating timers with the
//! renderer's [`UiLoop`], which the host drives with [`DocumentRenderer::advance`].
//!
//! ```
//! use core::time::Duration;
//! use inlay::geometry::Rect;
//! use inlay::{AttachmentResource, Attributes, Document, DocumentRenderer, Font, Frame, Run};
//!
//! let font = Font::system(48.0);
//! let attrs = Attributes::new().with_font(font);
//! let frames = vec![Frame::solid(8, 8, [255, 0, 0, 255]), Frame::solid(8, 8, [0, 0, 255, 255])];
//! let cat = AttachmentResource::animated(frames, Duration::from_millis(100));
//!
//! let doc = Document::new()
//!     .append(Run::text("Hello! ", attrs.clone()))
//!     .append(Run::attachment(cat, attrs));
//!
//! let mut renderer = DocumentRenderer::default();
//! let composition = renderer.render(&doc, 400.0, Rect::new(0.0, 0.0, 400.0, 400.0));
//! assert_eq!(composition.lines().len(), 1);
//! assert_eq!(renderer.advance(Duration::from_millis(250)).len(), 2);
//! ```
//!
//! ## Features
//!
//! - `std` (enabled by default): required; reserved so a `libm` backend can be added later.
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(feature = "std"))]
compile_error!("inlay requires the `std` feature to be enabled");

pub use attributed_document;

mod arena;
mod attributes;
mod font;
mod options;
mod provider;
mod render;
mod resolve;
mod resource;
mod ui_loop;

pub mod geometry;
pub mod layout;

pub use attributed_document::{AttachmentId, Change, Edit, Error, ErrorKind};
pub use attributes::{AttributeKey, AttributeValue, Attributes};
pub use font::{Font, FontError, FontMetrics};
pub use options::{RendererOptions, ResumePolicy};
pub use provider::{
    AnimatedView, ContentProvider, ContentView, FrameAdvance, FrameContentProvider, MountError,
    StaticImageView, ViewContent, ViewHandle,
};
pub use render::{Composition, CompositeItem, CompositeLine, DocumentRenderer, PlaceholderState};
pub use resolve::{AttachmentBounds, AttachmentBoundsResolver};
pub use resource::{
    AttachmentKind, AttachmentResource, AttachmentStyle, Frame, FrameSource, NamedFrames,
};
pub use ui_loop::{TimerEvent, TimerId, UiLoop};

/// A document whose attachments are [`AttachmentResource`]s.
pub type Document = attributed_document::AttributedDocument<AttachmentResource, Attributes>;

/// A run of a [`Document`].
pub type Run = attributed_document::Run<AttachmentResource, Attributes>;
