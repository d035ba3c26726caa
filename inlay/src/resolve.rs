// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::geometry::{Point, Rect, Size};
use crate::{AttachmentResource, Attributes, Font};

/// Geometry of an attachment within a line.
///
/// `origin` is relative to the baseline at the attachment's pen position, with y pointing
/// up: `origin.y` is where the bottom edge sits (negative means below the baseline).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AttachmentBounds {
    /// Bottom-left corner relative to the baseline.
    pub origin: Point,
    /// Width and height.
    pub size: Size,
}

impl AttachmentBounds {
    /// Extent above the baseline.
    #[inline]
    pub fn ascent(&self) -> f64 {
        self.origin.y + self.size.height
    }

    /// Extent below the baseline, as a positive value.
    #[inline]
    pub fn descent(&self) -> f64 {
        -self.origin.y
    }

    /// The rectangle in y-down layout space for a pen position at `x` on a baseline at `y`.
    pub fn to_layout_rect(&self, x: f64, baseline: f64) -> Rect {
        let x0 = x + self.origin.x;
        let y0 = baseline - self.ascent();
        Rect::new(x0, y0, x0 + self.size.width, y0 + self.size.height)
    }
}

/// Computes where attachments sit within a line of text.
#[derive(Clone, Debug, Default)]
pub struct AttachmentBoundsResolver {
    default_font: Font,
}

impl AttachmentBoundsResolver {
    /// Creates a resolver that uses `default_font` for runs without a font attribute.
    pub fn new(default_font: Font) -> Self {
        Self { default_font }
    }

    /// The font used for runs without a font attribute.
    pub fn default_font(&self) -> &Font {
        &self.default_font
    }

    /// The font for a run with `attributes`.
    pub fn font_for<'a>(&'a self, attributes: &'a Attributes) -> &'a Font {
        attributes.font().unwrap_or(&self.default_font)
    }

    /// Resolves the bounds of `resource` in a run with `attributes`.
    ///
    /// The attachment is one line tall, or `height_override` tall, and square unless the
    /// resource has a size hint, whose aspect ratio is kept. Its bottom edge sits on the
    /// font's descender so it spans the same vertical band as the surrounding glyphs at any
    /// point size. The result is never smaller than 1×1.
    ///
    /// The line fragment and pen position describe where the host is placing the attachment;
    /// they do not affect the default sizing.
    pub fn resolve(
        &self,
        resource: &AttachmentResource,
        attributes: &Attributes,
        _proposed_line_fragment: Rect,
        _position: Point,
    ) -> AttachmentBounds {
        let font = self.font_for(attributes);
        let height = resource
            .height_override()
            .filter(|h| h.is_finite() && *h > 0.0)
            .unwrap_or_else(|| font.line_height());
        let width = match resource.size_hint().and_then(Size::aspect_ratio) {
            Some(ratio) => height * ratio,
            None => height,
        };
        AttachmentBounds {
            origin: Point::new(0.0, font.descender()),
            size: Size::new(at_least_one(width), at_least_one(height)),
        }
    }
}

fn at_least_one(v: f64) -> f64 {
    if v.is_finite() { v.max(1.0) } else { 1.0 }
}
