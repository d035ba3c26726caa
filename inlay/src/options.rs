// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::font::DEFAULT_FONT_SIZE;

/// What an animated view shows when it becomes visible again after being hidden.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ResumePolicy {
    /// Continue from the frame shown when it was hidden.
    #[default]
    Continue,
    /// Start over at the first frame.
    Restart,
}

/// Configuration of a [`DocumentRenderer`](crate::DocumentRenderer).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RendererOptions {
    /// Point size of the system font used for runs without a font attribute.
    pub default_font_size: f64,
    /// Extra space added between consecutive lines.
    pub line_spacing: f64,
    /// Distance outside the viewport within which attachments stay mounted.
    pub overscan: f64,
    /// Behavior of animated views when they become visible again.
    pub resume_policy: ResumePolicy,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            default_font_size: DEFAULT_FONT_SIZE,
            line_spacing: 0.0,
            overscan: 0.0,
            resume_policy: ResumePolicy::default(),
        }
    }
}
