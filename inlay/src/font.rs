// Copyright 2025 the Inlay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use linebender_resource_handle::Blob;
use skrifa::instance::{LocationRef, Size as FontSize};
use skrifa::{FontRef, MetadataProvider};

/// Vertical metrics of a font at a given size.
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the tallest glyphs.
    pub ascent: f64,
    /// Distance from the baseline to the bottom of the lowest glyphs, as a positive value.
    pub descent: f64,
    /// Additional space between lines.
    pub leading: f64,
}

impl FontMetrics {
    /// The height of one line: `ascent + descent + leading`.
    #[inline]
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent + self.leading
    }

    /// The descent as a signed offset from the baseline (negative, or zero).
    #[inline]
    pub fn descender(&self) -> f64 {
        -self.descent
    }
}

// Per-em metrics of the platform UI font.
const SYSTEM_ASCENT: f64 = 0.952;
const SYSTEM_DESCENT: f64 = 0.241;
const SYSTEM_ADVANCE: f64 = 0.55;
const SYSTEM_SPACE_ADVANCE: f64 = 0.25;

/// The size used when no font is given.
pub(crate) const DEFAULT_FONT_SIZE: f64 = 17.0;

#[derive(Clone, Debug)]
struct FontData {
    blob: Blob<u8>,
    index: u32,
}

/// A font at a particular size.
///
/// Either the built-in system font, which uses fixed proportional metrics, or a font read
/// from OpenType data, whose metrics and advances come from the font tables.
#[derive(Clone, Debug)]
pub struct Font {
    size: f64,
    metrics: FontMetrics,
    data: Option<FontData>,
}

impl Font {
    /// The system UI font at `size`.
    ///
    /// Sizes that are not positive and finite fall back to the default size of 17.
    pub fn system(size: f64) -> Self {
        let size = sanitize_size(size);
        Self {
            size,
            metrics: FontMetrics {
                ascent: SYSTEM_ASCENT * size,
                descent: SYSTEM_DESCENT * size,
                leading: 0.0,
            },
            data: None,
        }
    }

    /// Reads the font at `index` of the OpenType data in `blob`.
    pub fn from_data(blob: Blob<u8>, index: u32, size: f64) -> Result<Self, FontError> {
        let size = sanitize_size(size);
        let font = FontRef::from_index(blob.as_ref(), index).map_err(|_| FontError { index })?;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "font sizes are far below the f32 range"
        )]
        let metrics = font.metrics(FontSize::new(size as f32), LocationRef::default());
        let metrics = FontMetrics {
            ascent: f64::from(metrics.ascent),
            descent: f64::from(metrics.descent).abs(),
            leading: f64::from(metrics.leading),
        };
        Ok(Self {
            size,
            metrics,
            data: Some(FontData { blob, index }),
        })
    }

    /// The point size.
    #[inline]
    pub fn size(&self) -> f64 {
        self.size
    }

    /// The vertical metrics at this size.
    #[inline]
    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    /// Shorthand for `self.metrics().line_height()`.
    #[inline]
    pub fn line_height(&self) -> f64 {
        self.metrics.line_height()
    }

    /// Shorthand for `self.metrics().descender()`.
    #[inline]
    pub fn descender(&self) -> f64 {
        self.metrics.descender()
    }

    /// Returns `true` for the built-in system font.
    pub fn is_system(&self) -> bool {
        self.data.is_none()
    }

    /// The horizontal advance of `text`.
    ///
    /// Line breaks contribute nothing. Characters missing from a font read from data use the
    /// system font's approximation.
    pub fn measure(&self, text: &str) -> f64 {
        let font = self
            .data
            .as_ref()
            .and_then(|data| FontRef::from_index(data.blob.as_ref(), data.index).ok());
        let Some(font) = font else {
            return text.chars().map(|ch| self.approximate_advance(ch)).sum();
        };
        let charmap = font.charmap();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "font sizes are far below the f32 range"
        )]
        let size = FontSize::new(self.size as f32);
        let glyph_metrics = font.glyph_metrics(size, LocationRef::default());
        text.chars()
            .map(|ch| {
                if is_line_break(ch) {
                    return 0.0;
                }
                charmap
                    .map(ch)
                    .and_then(|glyph| glyph_metrics.advance_width(glyph))
                    .map_or_else(|| self.approximate_advance(ch), f64::from)
            })
            .sum()
    }

    fn approximate_advance(&self, ch: char) -> f64 {
        if is_line_break(ch) {
            0.0
        } else if ch.is_whitespace() {
            SYSTEM_SPACE_ADVANCE * self.size
        } else {
            SYSTEM_ADVANCE * self.size
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::system(DEFAULT_FONT_SIZE)
    }
}

impl PartialEq for Font {
    fn eq(&self, other: &Self) -> bool {
        let same_data = match (&self.data, &other.data) {
            (None, None) => true,
            (Some(a), Some(b)) => a.index == b.index && a.blob.id() == b.blob.id(),
            _ => false,
        };
        same_data && self.size == other.size && self.metrics == other.metrics
    }
}

pub(crate) fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn sanitize_size(size: f64) -> f64 {
    if size.is_finite() && size > 0.0 {
        size
    } else {
        DEFAULT_FONT_SIZE
    }
}

/// Error returned when font data cannot be read.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FontError {
    index: u32,
}

impl FontError {
    /// The collection index that was requested.
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl core::fmt::Display for FontError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "no readable font at index {} of the font data", self.index)
    }
}

impl core::error::Error for FontError {}
