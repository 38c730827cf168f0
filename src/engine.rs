//! Caption Overlay Engine
//!
//! Owns the edit session and turns it into composite artifacts on request.
//! All operations run synchronously on the caller's thread.

use image::RgbaImage;
use thiserror::Error;
use tracing::{debug, info};

use crate::capture::frame::decode_image;
use crate::compose::{CaptionStyle, Compositor, RenderError};
use crate::session::{ActiveSlot, CaptionSlot, EditSession, SessionState, SourceImage};

/// Why an export request produced no artifact
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no image selected")]
    NoImage,
    #[error("failed to render captions: {0}")]
    Render(#[from] RenderError),
}

/// A flattened meme plus what it was made from.
///
/// Artifacts are independent values: resetting or editing the session after
/// export does not affect them.
#[derive(Debug, Clone)]
pub struct CompositeArtifact {
    source_image: SourceImage,
    rendered_image: RgbaImage,
    top_caption: String,
    bottom_caption: String,
}

impl CompositeArtifact {
    pub fn source_image(&self) -> &SourceImage {
        &self.source_image
    }

    pub fn rendered_image(&self) -> &RgbaImage {
        &self.rendered_image
    }

    pub fn top_caption(&self) -> &str {
        &self.top_caption
    }

    pub fn bottom_caption(&self) -> &str {
        &self.bottom_caption
    }
}

/// Edit session plus the compositor that renders it
#[derive(Debug)]
pub struct CaptionOverlayEngine {
    session: EditSession,
    compositor: Compositor,
}

impl Default for CaptionOverlayEngine {
    fn default() -> Self {
        Self::new(CaptionStyle::default())
    }
}

impl CaptionOverlayEngine {
    pub fn new(style: CaptionStyle) -> Self {
        Self {
            session: EditSession::new(),
            compositor: Compositor::new(style),
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Styling text inputs should use for live preview
    pub fn text_attributes(&self) -> &CaptionStyle {
        self.compositor.style()
    }

    pub fn can_export(&self) -> bool {
        self.session.can_export()
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn active_slot(&self) -> ActiveSlot {
        self.session.active_slot()
    }

    /// Return to defaults: sentinel captions, no image, export disabled
    pub fn reset(&mut self) {
        self.session.reset();
        debug!("Session reset");
    }

    /// Use `image` as the base photo. `None` (cancelled or unusable pick) leaves
    /// the session as it was.
    pub fn set_image(&mut self, image: Option<SourceImage>) {
        match image {
            Some(image) => {
                debug!("Base image set ({}x{})", image.width(), image.height());
                self.session.set_base_image(image);
            }
            None => debug!("No image delivered, session unchanged"),
        }
    }

    /// Decode `bytes` and use the result as the base photo; undecodable input is ignored
    pub fn set_image_bytes(&mut self, bytes: &[u8]) {
        self.set_image(decode_image(bytes));
    }

    /// Focus gained on `slot`: clear its placeholder and remember the focus
    pub fn begin_editing(&mut self, slot: CaptionSlot) {
        if self.session.is_caption_at_default(slot) {
            self.session.caption_mut(slot).clear();
        }
        self.session.set_active_slot(slot.into());
        debug!("Editing {} caption", slot);
    }

    /// Store `text` for `slot` as typed. Empty text stays empty.
    pub fn commit_caption(&mut self, slot: CaptionSlot, text: impl Into<String>) {
        *self.session.caption_mut(slot) = text.into();
        if self.session.active_slot() == ActiveSlot::from(slot) {
            self.session.set_active_slot(ActiveSlot::None);
        }
        debug!("Committed {} caption {:?}", slot, self.session.caption(slot));
    }

    /// Composite both captions onto the base image
    pub fn export(&mut self) -> Result<CompositeArtifact, ExportError> {
        let source_image = self.session.base_image().cloned().ok_or(ExportError::NoImage)?;
        let top_caption = self.session.top_caption().to_string();
        let bottom_caption = self.session.bottom_caption().to_string();

        let rendered_image = self
            .compositor
            .render(&source_image, &top_caption, &bottom_caption)?;

        info!(
            "Exported meme {}x{} (top {:?}, bottom {:?})",
            rendered_image.width(),
            rendered_image.height(),
            top_caption,
            bottom_caption
        );

        Ok(CompositeArtifact {
            source_image,
            rendered_image,
            top_caption,
            bottom_caption,
        })
    }
}
