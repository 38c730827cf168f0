//! Caption styling shared by live preview and export

use image::Rgba;
use std::path::PathBuf;

use crate::config::StyleSettings;

/// Visual attributes applied to both captions.
///
/// Text fields render with these attributes while the user types, and the
/// compositor burns captions in with the same value, so preview and export
/// cannot drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionStyle {
    /// Display face name reported to text input collaborators
    pub font_family: String,
    /// Outline font file; the bundled face is used when absent
    pub font_path: Option<PathBuf>,
    /// Font size in points at the reference width
    pub font_size: f32,
    /// Stroke width as a fraction of `font_size`.
    /// Negative strokes and fills, positive strokes only, zero fills only.
    pub stroke_width: f32,
    /// Text fill color
    pub fill: Rgba<u8>,
    /// Outline color
    pub stroke: Rgba<u8>,
    /// Canvas width in points that `font_size` and `margin` are relative to
    pub reference_width: f32,
    /// Distance between caption and canvas edge, in points
    pub margin: f32,
    /// Shrink-to-fit never goes below this size, in points
    pub minimum_font_size: f32,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self::from(&StyleSettings::default())
    }
}

impl From<&StyleSettings> for CaptionStyle {
    fn from(settings: &StyleSettings) -> Self {
        Self {
            font_family: settings.font_family.clone(),
            font_path: settings.font_path.clone(),
            font_size: settings.font_size,
            stroke_width: settings.stroke_width,
            fill: Rgba(settings.fill_color),
            stroke: Rgba(settings.stroke_color),
            reference_width: settings.reference_width,
            margin: settings.margin,
            minimum_font_size: settings.minimum_font_size,
        }
    }
}

impl CaptionStyle {
    /// Pixels per point for a canvas of the given width
    pub fn scale_for(&self, canvas_width: u32) -> f32 {
        if self.reference_width <= 0.0 {
            return 1.0;
        }
        canvas_width as f32 / self.reference_width
    }

    /// Unshrunk font size in pixels on a canvas of the given width
    pub fn font_px(&self, canvas_width: u32) -> f32 {
        self.font_size * self.scale_for(canvas_width)
    }

    pub fn minimum_font_px(&self, canvas_width: u32) -> f32 {
        self.minimum_font_size * self.scale_for(canvas_width)
    }

    pub fn margin_px(&self, canvas_width: u32) -> f32 {
        self.margin * self.scale_for(canvas_width)
    }

    /// Outline thickness in pixels for text rendered at `font_px`.
    /// Thickness scales with the rendered size: `|stroke_width| / font_size`.
    pub fn stroke_px(&self, font_px: f32) -> u8 {
        if self.stroke_width == 0.0 || self.font_size <= 0.0 {
            return 0;
        }
        let ratio = self.stroke_width.abs() / self.font_size;
        (font_px * ratio).round().clamp(1.0, u8::MAX as f32) as u8
    }

    /// Whether glyph interiors are painted with the fill color
    pub fn draws_fill(&self) -> bool {
        self.stroke_width <= 0.0
    }

    /// Whether glyph outlines are painted with the stroke color
    pub fn draws_stroke(&self) -> bool {
        self.stroke_width != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_matches_meme_look() {
        let style = CaptionStyle::default();
        assert_eq!(style.font_family, crate::compose::glyphs::BUNDLED_FONT_FAMILY);
        assert_eq!(style.font_size, 40.0);
        assert_eq!(style.stroke_width, -2.0);
        assert_eq!(style.fill, Rgba([255, 255, 255, 255]));
        assert_eq!(style.stroke, Rgba([0, 0, 0, 255]));
        assert!(style.draws_fill());
        assert!(style.draws_stroke());
    }

    #[test]
    fn test_stroke_scales_with_font_size() {
        let style = CaptionStyle::default();
        assert_eq!(style.stroke_px(40.0), 2);
        assert_eq!(style.stroke_px(80.0), 4);
        assert_eq!(style.stroke_px(160.0), 8);
        // Never thinner than a pixel
        assert_eq!(style.stroke_px(4.0), 1);
    }

    #[test]
    fn test_font_px_tracks_canvas_width() {
        let style = CaptionStyle::default();
        assert!((style.font_px(375) - 40.0).abs() < 0.01);
        assert!((style.font_px(750) - 80.0).abs() < 0.01);
    }

    #[test]
    fn test_positive_stroke_width_skips_fill() {
        let style = CaptionStyle {
            stroke_width: 3.0,
            ..CaptionStyle::default()
        };
        assert!(!style.draws_fill());
        assert!(style.draws_stroke());
    }

    #[test]
    fn test_zero_stroke_width_disables_outline() {
        let style = CaptionStyle {
            stroke_width: 0.0,
            ..CaptionStyle::default()
        };
        assert_eq!(style.stroke_px(40.0), 0);
        assert!(!style.draws_stroke());
    }
}
