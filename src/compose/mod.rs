//! Caption Compositing
//!
//! Burns the top and bottom captions into a copy of the selected photo at
//! the photo's native resolution. Each caption is rasterized to a coverage
//! mask, the mask is dilated to produce the outline, and both are blended
//! over the canvas in stroke-then-fill order.

pub mod glyphs;
pub mod style;

pub use glyphs::GlyphSource;
pub use style::CaptionStyle;

use image::{DynamicImage, GrayImage, Rgba, RgbaImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::dilate;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

use crate::session::CaptionSlot;

/// Failure to turn captions into pixels
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read caption font {path:?}: {source}")]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("caption font {path:?} is not a usable TrueType/OpenType font")]
    InvalidFont { path: PathBuf },
    #[error("bundled caption font could not be parsed")]
    BundledFont,
}

/// Where and how large a caption ends up on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionPlacement {
    pub slot: CaptionSlot,
    /// Font size in pixels after shrink-to-fit
    pub font_px: f32,
    /// Outline thickness in pixels
    pub stroke_px: u8,
    /// Left edge of the text box (may be negative if even the minimum size overflows)
    pub x: i64,
    /// Top edge of the text box
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Renders captions onto photos with a fixed style
#[derive(Debug)]
pub struct Compositor {
    style: CaptionStyle,
    glyphs: Option<GlyphSource>,
}

impl Compositor {
    pub fn new(style: CaptionStyle) -> Self {
        Self {
            style,
            glyphs: None,
        }
    }

    pub fn style(&self) -> &CaptionStyle {
        &self.style
    }

    /// Replace the style; the font is reloaded on the next render
    pub fn set_style(&mut self, style: CaptionStyle) {
        self.style = style;
        self.glyphs = None;
    }

    /// Glyph source for the current style, loaded on first use.
    /// A failed load is not cached so a later render can retry.
    fn glyph_source(&mut self) -> Result<GlyphSource, RenderError> {
        if let Some(glyphs) = &self.glyphs {
            return Ok(glyphs.clone());
        }
        let glyphs = GlyphSource::load(self.style.font_path.as_deref())?;
        self.glyphs = Some(glyphs.clone());
        Ok(glyphs)
    }

    /// Compute the placement of `text` in `slot` on a canvas of the given size.
    /// Returns `None` for empty captions.
    pub fn layout(
        &mut self,
        slot: CaptionSlot,
        text: &str,
        canvas: (u32, u32),
    ) -> Result<Option<CaptionPlacement>, RenderError> {
        let glyphs = self.glyph_source()?;
        Ok(place_caption(&glyphs, &self.style, slot, text, canvas))
    }

    /// Produce a new image with both captions burned into `base`
    pub fn render(
        &mut self,
        base: &DynamicImage,
        top: &str,
        bottom: &str,
    ) -> Result<RgbaImage, RenderError> {
        let glyphs = self.glyph_source()?;
        let mut canvas = base.to_rgba8();
        let dimensions = canvas.dimensions();

        for (slot, text) in [(CaptionSlot::Top, top), (CaptionSlot::Bottom, bottom)] {
            let Some(placement) = place_caption(&glyphs, &self.style, slot, text, dimensions) else {
                continue;
            };
            if let Some(ch) = text.chars().find(|c| !c.is_whitespace() && !glyphs.has_glyph(*c)) {
                warn!("{} caption has characters the font cannot draw (first: {:?})", slot, ch);
            }
            debug!(
                "Drawing {} caption at ({}, {}) size {}x{} font {:.1}px",
                slot, placement.x, placement.y, placement.width, placement.height, placement.font_px
            );
            draw_caption(&mut canvas, &glyphs, &self.style, text, &placement);
        }

        Ok(canvas)
    }
}

/// Center `text` horizontally, shrinking it until it fits between the margins
fn place_caption(
    glyphs: &GlyphSource,
    style: &CaptionStyle,
    slot: CaptionSlot,
    text: &str,
    (width, height): (u32, u32),
) -> Option<CaptionPlacement> {
    if text.is_empty() || width == 0 || height == 0 {
        return None;
    }

    let margin = style.margin_px(width);
    let available = (width as f32 - margin * 2.0).max(1.0);
    let mut font_px = style.font_px(width);
    let (mut text_w, mut text_h) = glyphs.measure(text, font_px);

    if text_w as f32 > available {
        let min_px = style.minimum_font_px(width).min(font_px);
        font_px = (font_px * available / text_w as f32).max(min_px);
        (text_w, text_h) = glyphs.measure(text, font_px);

        // Glyph metrics don't scale exactly linearly, so step down until it fits
        while text_w as f32 > available && font_px > min_px {
            font_px = (font_px - 1.0).max(min_px);
            (text_w, text_h) = glyphs.measure(text, font_px);
        }
    }

    let x = (width as i64 - text_w as i64) / 2;
    let y = match slot {
        CaptionSlot::Top => margin.round() as i64,
        CaptionSlot::Bottom => height as i64 - margin.round() as i64 - text_h as i64,
    };

    Some(CaptionPlacement {
        slot,
        font_px,
        stroke_px: style.stroke_px(font_px),
        x,
        y,
        width: text_w,
        height: text_h,
    })
}

fn draw_caption(
    canvas: &mut RgbaImage,
    glyphs: &GlyphSource,
    style: &CaptionStyle,
    text: &str,
    placement: &CaptionPlacement,
) {
    let pad = placement.stroke_px as u32;
    let coverage = glyphs.rasterize(text, placement.font_px, pad);
    let origin_x = placement.x - pad as i64;
    let origin_y = placement.y - pad as i64;

    if style.draws_stroke() && placement.stroke_px > 0 {
        let mut outline = dilate(&coverage, Norm::LInf, placement.stroke_px);
        if !style.draws_fill() {
            // Stroke-only text leaves the glyph interior untouched
            for (out, inner) in outline.pixels_mut().zip(coverage.pixels()) {
                out.0[0] = out.0[0].saturating_sub(inner.0[0]);
            }
        }
        paint_mask(canvas, &outline, origin_x, origin_y, style.stroke);
    }

    if style.draws_fill() {
        paint_mask(canvas, &coverage, origin_x, origin_y, style.fill);
    }
}

/// Blend `color` into `canvas` weighted by the mask, clipping to canvas bounds
fn paint_mask(canvas: &mut RgbaImage, mask: &GrayImage, origin_x: i64, origin_y: i64, color: Rgba<u8>) {
    use image::Pixel;

    let (canvas_w, canvas_h) = (canvas.width() as i64, canvas.height() as i64);
    for (mx, my, coverage) in mask.enumerate_pixels() {
        let coverage = coverage.0[0];
        if coverage == 0 {
            continue;
        }
        let x = origin_x + mx as i64;
        let y = origin_y + my as i64;
        if x < 0 || y < 0 || x >= canvas_w || y >= canvas_h {
            continue;
        }

        let alpha = (coverage as u16 * color.0[3] as u16 / u8::MAX as u16) as u8;
        let src = Rgba([color.0[0], color.0[1], color.0[2], alpha]);
        let dst = canvas.get_pixel_mut(x as u32, y as u32);
        if alpha == u8::MAX {
            *dst = src;
        } else {
            dst.blend(&src);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREY: Rgba<u8> = Rgba([128, 128, 128, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn grey_photo(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, GREY))
    }

    fn band_has(image: &RgbaImage, mut rows: std::ops::Range<u32>, color: Rgba<u8>) -> bool {
        rows.any(|y| (0..image.width()).any(|x| *image.get_pixel(x, y) == color))
    }

    /// Rows covered by a caption including its outline
    fn rows_of(placement: &CaptionPlacement) -> std::ops::Range<u32> {
        let stroke = placement.stroke_px as i64;
        let start = (placement.y - stroke).max(0) as u32;
        let end = (placement.y + placement.height as i64 + stroke) as u32;
        start..end
    }

    #[test]
    fn test_render_keeps_native_resolution() {
        let mut compositor = Compositor::new(CaptionStyle::default());
        let rendered = compositor.render(&grey_photo(1000, 600), "TOP", "BOTTOM").unwrap();
        assert_eq!(rendered.dimensions(), (1000, 600));
    }

    #[test]
    fn test_render_burns_in_fill_and_stroke() {
        let mut compositor = Compositor::new(CaptionStyle::default());
        let top = compositor.layout(CaptionSlot::Top, "TOP", (375, 375)).unwrap().unwrap();
        let bottom = compositor.layout(CaptionSlot::Bottom, "BOTTOM", (375, 375)).unwrap().unwrap();
        let rendered = compositor.render(&grey_photo(375, 375), "TOP", "BOTTOM").unwrap();

        assert!(band_has(&rendered, rows_of(&top), WHITE));
        assert!(band_has(&rendered, rows_of(&top), BLACK));
        assert!(band_has(&rendered, rows_of(&bottom), WHITE));
        assert!(band_has(&rendered, rows_of(&bottom), BLACK));
        // Middle of the photo is untouched
        assert!((0..375).all(|x| *rendered.get_pixel(x, 187) == GREY));
    }

    #[test]
    fn test_render_draws_accented_characters() {
        let mut compositor = Compositor::new(CaptionStyle::default());
        let photo = grey_photo(375, 375);
        let accented = compositor.render(&photo, "CAFÉ", "ÜBER").unwrap();
        let plain = compositor.render(&photo, "CAF?", "?BER").unwrap();
        assert_ne!(accented, plain);
    }

    #[test]
    fn test_empty_caption_draws_nothing() {
        let mut compositor = Compositor::new(CaptionStyle::default());
        let rendered = compositor.render(&grey_photo(375, 375), "", "").unwrap();
        assert!(rendered.pixels().all(|p| *p == GREY));
    }

    #[test]
    fn test_layout_centers_caption() {
        let mut compositor = Compositor::new(CaptionStyle::default());
        let placement = compositor
            .layout(CaptionSlot::Top, "TOP", (375, 375))
            .unwrap()
            .unwrap();

        assert!(placement.width > 0 && placement.width < 375 - 24);
        assert_eq!(placement.x, (375 - placement.width as i64) / 2);
        assert_eq!(placement.y, 12);
        assert_eq!(placement.font_px, 40.0);
        assert_eq!(placement.stroke_px, 2);
    }

    #[test]
    fn test_layout_bottom_anchors_to_bottom_edge() {
        let mut compositor = Compositor::new(CaptionStyle::default());
        let placement = compositor
            .layout(CaptionSlot::Bottom, "BOTTOM", (375, 500))
            .unwrap()
            .unwrap();

        assert_eq!(placement.y + placement.height as i64, 500 - 12);
    }

    #[test]
    fn test_layout_shrinks_long_caption_to_fit() {
        let mut compositor = Compositor::new(CaptionStyle::default());
        let placement = compositor
            .layout(CaptionSlot::Top, "THIS CAPTION IS WAY TOO LONG", (375, 375))
            .unwrap()
            .unwrap();

        assert!(placement.font_px < 40.0);
        assert!(placement.font_px >= 10.0);
        assert!(placement.width <= 375 - 24);
        assert!(placement.x >= 0);
    }

    #[test]
    fn test_layout_scales_with_canvas() {
        let mut compositor = Compositor::new(CaptionStyle::default());
        let small = compositor.layout(CaptionSlot::Top, "TOP", (375, 375)).unwrap().unwrap();
        let large = compositor.layout(CaptionSlot::Top, "TOP", (750, 750)).unwrap().unwrap();

        assert_eq!(large.font_px, small.font_px * 2.0);
        assert!((large.width as i64 - small.width as i64 * 2).abs() <= 2);
        assert_eq!(large.stroke_px, small.stroke_px * 2);
    }

    #[test]
    fn test_layout_empty_caption_is_none() {
        let mut compositor = Compositor::new(CaptionStyle::default());
        assert!(compositor.layout(CaptionSlot::Top, "", (375, 375)).unwrap().is_none());
    }

    #[test]
    fn test_missing_font_fails_render_and_can_retry() {
        let mut compositor = Compositor::new(CaptionStyle {
            font_path: Some(PathBuf::from("/nonexistent/impact.ttf")),
            ..CaptionStyle::default()
        });
        assert!(compositor.render(&grey_photo(10, 10), "A", "B").is_err());

        compositor.set_style(CaptionStyle::default());
        assert!(compositor.render(&grey_photo(10, 10), "A", "B").is_ok());
    }

    #[test]
    fn test_stroke_only_leaves_interior() {
        let mut compositor = Compositor::new(CaptionStyle {
            stroke_width: 2.0,
            ..CaptionStyle::default()
        });
        let top = compositor.layout(CaptionSlot::Top, "TOP", (375, 375)).unwrap().unwrap();
        let rendered = compositor.render(&grey_photo(375, 375), "TOP", "").unwrap();
        assert!(band_has(&rendered, rows_of(&top), BLACK));
        assert!(!band_has(&rendered, 0..375, WHITE));
    }

    #[test]
    fn test_fill_color_comes_from_style() {
        let red = Rgba([255, 0, 0, 255]);
        let mut compositor = Compositor::new(CaptionStyle {
            fill: red,
            ..CaptionStyle::default()
        });
        let rendered = compositor.render(&grey_photo(375, 375), "TOP", "").unwrap();
        assert!(band_has(&rendered, 0..100, red));
        assert!(!band_has(&rendered, 0..375, WHITE));
    }
}
