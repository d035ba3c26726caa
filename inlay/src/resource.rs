// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;
use std::sync::Arc;

use hashbrown::HashMap;
use linebender_resource_handle::Blob;

use crate::geometry::Size;

/// A decoded bitmap frame, in RGBA8 rows.
#[derive(Clone, Debug)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Blob<u8>,
}

impl Frame {
    /// Creates a frame from decoded pixel data.
    pub fn new(width: u32, height: u32, pixels: Blob<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Creates a frame filled with one color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let pixels: Vec<u8> = rgba.iter().copied().cycle().take(count * 4).collect();
        Self::new(width, height, Blob::new(Arc::new(pixels)))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The pixel size as layout units.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// The pixel data.
    pub fn pixels(&self) -> &Blob<u8> {
        &self.pixels
    }
}

/// What kind of content an attachment shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AttachmentKind {
    /// A single frame, painted directly.
    Static,
    /// Frames shown in a loop, each for `frame_duration`.
    Animated {
        /// How long each frame stays on screen.
        frame_duration: Duration,
    },
}

/// Which attachment the host inserts: a still image, or the animated sequence.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AttachmentStyle {
    /// The first frame of the sequence.
    #[default]
    Static,
    /// The whole sequence, looping.
    Animated,
}

/// The shortest frame duration an animated resource accepts.
const MIN_FRAME_DURATION: Duration = Duration::from_millis(1);

/// Inline content: a static image or an animated frame sequence.
///
/// Immutable once created. Documents reference resources through an `Arc`, so the same
/// resource can back any number of attachment runs.
#[derive(Clone, Debug)]
pub struct AttachmentResource {
    kind: AttachmentKind,
    size_hint: Option<Size>,
    height_override: Option<f64>,
    frames: Arc<[Frame]>,
}

impl AttachmentResource {
    /// A static image showing `frame`.
    pub fn static_image(frame: Frame) -> Self {
        Self {
            kind: AttachmentKind::Static,
            size_hint: None,
            height_override: None,
            frames: Arc::from([frame]),
        }
    }

    /// A looping animation over `frames`.
    ///
    /// An empty frame list produces a [blank placeholder](Self::placeholder). Durations below
    /// one millisecond are raised to one millisecond.
    pub fn animated(frames: Vec<Frame>, frame_duration: Duration) -> Self {
        if frames.is_empty() {
            log::debug!("animated attachment has no frames, using a blank placeholder");
            return Self::placeholder();
        }
        Self {
            kind: AttachmentKind::Animated {
                frame_duration: frame_duration.max(MIN_FRAME_DURATION),
            },
            size_hint: None,
            height_override: None,
            frames: frames.into(),
        }
    }

    /// A blank static attachment with no frames.
    ///
    /// Stands in for content whose frames could not be loaded; it still takes up space in
    /// the line.
    pub fn placeholder() -> Self {
        Self {
            kind: AttachmentKind::Static,
            size_hint: None,
            height_override: None,
            frames: Arc::from([]),
        }
    }

    /// Loads frames from `source` and builds the resource for `style`.
    ///
    /// `Static` uses the first frame that loads; `Animated` uses them all. Missing frames
    /// are skipped, and if none load the result is a [placeholder](Self::placeholder).
    pub fn for_style(
        style: AttachmentStyle,
        source: &dyn FrameSource,
        name_template: &str,
        count: usize,
        frame_duration: Duration,
    ) -> Self {
        match style {
            AttachmentStyle::Static => {
                match source.load_frames(name_template, count).into_iter().next() {
                    Some(frame) => Self::static_image(frame),
                    None => {
                        log::debug!("no frames for {name_template:?}, using a blank placeholder");
                        Self::placeholder()
                    }
                }
            }
            AttachmentStyle::Animated => {
                Self::animated(source.load_frames(name_template, count), frame_duration)
            }
        }
    }

    /// Returns the resource with an explicit aspect ratio source.
    ///
    /// Resolved bounds keep `hint.width / hint.height`; the height still follows the font.
    #[must_use]
    pub fn with_size_hint(mut self, hint: Size) -> Self {
        self.size_hint = Some(hint);
        self
    }

    /// Returns the resource with a fixed height, replacing the font's line height.
    #[must_use]
    pub fn with_height_override(mut self, height: f64) -> Self {
        self.height_override = Some(height);
        self
    }

    /// The kind of content.
    pub fn kind(&self) -> AttachmentKind {
        self.kind
    }

    /// The declared size used for the aspect ratio, if any.
    pub fn size_hint(&self) -> Option<Size> {
        self.size_hint
    }

    /// The declared fixed height, if any.
    pub fn height_override(&self) -> Option<f64> {
        self.height_override
    }

    /// The frames, in display order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The number of frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if the resource has no frames to show.
    pub fn is_placeholder(&self) -> bool {
        self.frames.is_empty()
    }

    /// The frame duration, for animated resources.
    pub fn frame_duration(&self) -> Option<Duration> {
        match self.kind {
            AttachmentKind::Static => None,
            AttachmentKind::Animated { frame_duration } => Some(frame_duration),
        }
    }
}

/// A source of decoded frames, looked up by name.
pub trait FrameSource {
    /// The frame called `name`, if available.
    fn frame(&self, name: &str) -> Option<Frame>;

    /// Loads the frames named by `name_template` for `1..=count`.
    ///
    /// The first `{}` in the template is replaced by the frame number, so `"{}-cat"` loads
    /// `"1-cat"`, `"2-cat"` and so on. Missing frames are skipped; if nothing loads the result
    /// is empty.
    fn load_frames(&self, name_template: &str, count: usize) -> Vec<Frame> {
        (1..=count)
            .filter_map(|number| self.frame(&name_template.replacen("{}", &number.to_string(), 1)))
            .collect()
    }
}

/// An in-memory [`FrameSource`].
#[derive(Clone, Debug, Default)]
pub struct NamedFrames {
    frames: HashMap<String, Frame>,
}

impl NamedFrames {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the frame called `name`.
    pub fn insert(&mut self, name: impl Into<String>, frame: Frame) {
        self.frames.insert(name.into(), frame);
    }

    /// The number of frames held.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if no frames are held.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for NamedFrames {
    fn frame(&self, name: &str) -> Option<Frame> {
        self.frames.get(name).cloned()
    }
}
