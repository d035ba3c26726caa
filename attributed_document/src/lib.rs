// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attributed Document is a Rust crate for documents made of text runs and
//! inline attachment runs.
//!
//! An [`AttributedDocument`] is an immutable value: every mutation returns a new
//! document and leaves the original untouched, so readers always observe a
//! consistent snapshot. Runs are stored behind an [`Arc`](alloc::sync::Arc) and
//! are only copied when a shared snapshot is modified.
//!
//! Offsets are measured in *units*: a text run is as long as its number of
//! `char`s, and an attachment run is exactly one unit long.
//!
//! ```
//! use attributed_document::{AttributedDocument, Run};
//!
//! let doc: AttributedDocument<&str, ()> = AttributedDocument::new();
//! let doc = doc.append(Run::text("Hi", ()));
//! assert_eq!(doc.total_length(), 2);
//! ```
//!
//! ## Features
//!
//! - `std` (enabled by default): currently unused, provided for forward compatibility.
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
#![no_std]

extern crate alloc;

mod change;
mod document;
mod error;
mod run;
mod text_range;

pub use crate::change::{Change, Edit};
pub use crate::document::{Attachments, AttributedDocument};
pub use crate::error::{Error, ErrorKind};
pub use crate::run::{AttachmentId, AttachmentRun, Run, TextRun};

/// The character used for attachment runs in [`AttributedDocument::plain_text`].
pub const OBJECT_REPLACEMENT_CHARACTER: char = '\u{FFFC}';
