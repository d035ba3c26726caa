// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Utility functions and types shared across tests.

mod providers;

pub(crate) use providers::{CountingProvider, RejectingProvider};

use core::time::Duration;
use std::sync::Arc;

use inlay::{Attributes, Font, Frame, NamedFrames};
use linebender_resource_handle::Blob;

/// Name template of the dancing cat frames.
pub(crate) const CAT_TEMPLATE: &str = "{}-dance_cat";
/// Number of frames in the dancing cat sequence.
pub(crate) const CAT_FRAMES: usize = 144;
/// Frame duration of the dancing cat.
pub(crate) const CAT_FRAME_DURATION: Duration = Duration::from_millis(40);
/// Point size used by the demo text view.
pub(crate) const DEMO_FONT_SIZE: f64 = 48.0;

/// A frame source holding the dancing cat, with each frame a distinct solid color.
pub(crate) fn cat_frames() -> NamedFrames {
    let mut frames = NamedFrames::new();
    for n in 1..=CAT_FRAMES {
        let shade = u8::try_from(n).unwrap_or(u8::MAX);
        frames.insert(format!("{n}-dance_cat"), Frame::solid(8, 8, [shade, 0, 0, 255]));
    }
    frames
}

/// Attributes with the system font at `size`.
pub(crate) fn font_attrs(size: f64) -> Attributes {
    Attributes::new().with_font(Font::system(size))
}

/// Attributes of the demo text view.
pub(crate) fn demo_attrs() -> Attributes {
    font_attrs(DEMO_FONT_SIZE)
}

/// DejaVu Sans Mono: 2048 units per em, every glyph 1233 units wide.
const MONO_FONT: &[u8] = include_bytes!("../../assets/fonts/dejavu_fonts/DejaVuSansMono.ttf");
/// Units per em of [`MONO_FONT`].
pub(crate) const MONO_UNITS_PER_EM: f64 = 2048.0;
/// Advance of every glyph in [`MONO_FONT`], in font units.
pub(crate) const MONO_ADVANCE: f64 = 1233.0;

/// DejaVu Sans Mono at `size`.
pub(crate) fn mono_font(size: f64) -> Font {
    Font::from_data(Blob::new(Arc::new(MONO_FONT)), 0, size).unwrap()
}
