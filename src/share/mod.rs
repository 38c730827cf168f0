//! Export/Share Collaborator
//!
//! Presenting a share surface is the host's job. The screen hands the
//! rendered meme to a [`ShareTarget`] and only persists the artifact when the
//! target reports that sharing completed.

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::path::PathBuf;
use tracing::info;

/// How the user left the share surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Completed,
    Cancelled,
}

/// Host-provided share surface
pub trait ShareTarget {
    fn present(&mut self, image: &RgbaImage) -> Result<ShareOutcome>;
}

/// Shares by writing the meme to a file; format follows the file extension
#[derive(Debug, Clone)]
pub struct FileShare {
    path: PathBuf,
}

impl FileShare {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl ShareTarget for FileShare {
    fn present(&mut self, image: &RgbaImage) -> Result<ShareOutcome> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {:?}", parent))?;
        }
        let format = ImageFormat::from_path(&self.path)
            .with_context(|| format!("Unsupported meme file type {:?}", self.path))?;
        let image = DynamicImage::ImageRgba8(image.clone());
        let encoded = if has_alpha_channel(format) {
            image
        } else {
            DynamicImage::ImageRgb8(image.to_rgb8())
        };
        encoded
            .save_with_format(&self.path, format)
            .with_context(|| format!("Failed to write meme to {:?}", self.path))?;

        info!("Meme written to {:?}", self.path);
        Ok(ShareOutcome::Completed)
    }
}

/// Whether the encoder for `format` accepts RGBA pixels
fn has_alpha_channel(format: ImageFormat) -> bool {
    !matches!(format, ImageFormat::Jpeg | ImageFormat::Pnm)
}
