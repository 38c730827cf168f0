//! Glyph rasterization into coverage masks
//!
//! Captions are drawn as 8-bit coverage masks first; the compositor derives
//! the outline from the mask and paints both onto the canvas.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{GrayImage, Luma};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::Path;
use tracing::debug;

use super::RenderError;

/// Bold condensed face compiled into the binary (Bitstream Vera license,
/// see `assets/fonts/LICENSE-DejaVu.txt`)
static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansCondensed-Bold.ttf");

/// Family name of the bundled face
pub const BUNDLED_FONT_FAMILY: &str = "DejaVuSansCondensed-Bold";

/// Outline font used to shape and rasterize captions
#[derive(Clone)]
pub struct GlyphSource {
    font: FontArc,
}

impl std::fmt::Debug for GlyphSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphSource").finish_non_exhaustive()
    }
}

impl GlyphSource {
    /// The bundled bold condensed face
    pub fn bundled() -> Result<Self, RenderError> {
        let font = FontArc::try_from_slice(BUNDLED_FONT).map_err(|_| RenderError::BundledFont)?;
        Ok(Self { font })
    }

    /// Load the font file at `path`, or the bundled face when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, RenderError> {
        let Some(path) = path else {
            debug!("No caption font configured, using {}", BUNDLED_FONT_FAMILY);
            return Self::bundled();
        };

        let data = std::fs::read(path).map_err(|source| RenderError::FontRead {
            path: path.to_path_buf(),
            source,
        })?;
        let font = FontArc::try_from_vec(data).map_err(|_| RenderError::InvalidFont {
            path: path.to_path_buf(),
        })?;

        debug!("Loaded caption font from {:?}", path);
        Ok(Self { font })
    }

    /// Whether the font has a real glyph (not the missing-glyph box) for `ch`
    pub fn has_glyph(&self, ch: char) -> bool {
        self.font.glyph_id(ch).0 != 0
    }

    /// Size in pixels of `text` rendered at `font_px`.
    /// Height is the full ascent-to-descent line so accents and descenders fit.
    pub fn measure(&self, text: &str, font_px: f32) -> (u32, u32) {
        if text.is_empty() {
            return (0, 0);
        }
        let scale = PxScale::from(font_px);
        let (width, _) = text_size(scale, &self.font, text);
        let scaled = self.font.as_scaled(scale);
        let height = (scaled.ascent() - scaled.descent()).ceil().max(1.0) as u32;
        (width, height)
    }

    /// Rasterize `text` into a coverage mask with `pad` empty pixels on every side
    pub fn rasterize(&self, text: &str, font_px: f32, pad: u32) -> GrayImage {
        let (width, height) = self.measure(text, font_px);
        let mut mask = GrayImage::new(width + pad * 2, height + pad * 2);
        if width == 0 || height == 0 {
            return mask;
        }

        draw_text_mut(
            &mut mask,
            Luma([u8::MAX]),
            pad as i32,
            pad as i32,
            PxScale::from(font_px),
            &self.font,
            text,
        );
        mask
    }
}
