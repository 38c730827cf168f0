//! Edit Session
//!
//! The mutable state behind the meme screen: the selected photo, both
//! caption strings and which caption currently holds input focus.

use std::fmt;
use std::sync::Arc;

use image::DynamicImage;

/// A decoded photo shared between the session and any artifacts made from it
pub type SourceImage = Arc<DynamicImage>;

/// One of the two fixed caption positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptionSlot {
    Top,
    Bottom,
}

impl CaptionSlot {
    /// Both slots, in drawing order
    pub const ALL: [CaptionSlot; 2] = [CaptionSlot::Top, CaptionSlot::Bottom];

    /// Placeholder text shown before the user types anything
    pub const fn sentinel(self) -> &'static str {
        match self {
            CaptionSlot::Top => "TOP",
            CaptionSlot::Bottom => "BOTTOM",
        }
    }
}

impl fmt::Display for CaptionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptionSlot::Top => write!(f, "top"),
            CaptionSlot::Bottom => write!(f, "bottom"),
        }
    }
}

/// Caption slot that currently has input focus, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveSlot {
    #[default]
    None,
    Top,
    Bottom,
}

impl From<CaptionSlot> for ActiveSlot {
    fn from(slot: CaptionSlot) -> Self {
        match slot {
            CaptionSlot::Top => ActiveSlot::Top,
            CaptionSlot::Bottom => ActiveSlot::Bottom,
        }
    }
}

impl ActiveSlot {
    /// The focused slot, if one is focused
    pub fn slot(self) -> Option<CaptionSlot> {
        match self {
            ActiveSlot::None => None,
            ActiveSlot::Top => Some(CaptionSlot::Top),
            ActiveSlot::Bottom => Some(CaptionSlot::Bottom),
        }
    }
}

/// Externally visible session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No photo selected, export unavailable
    Empty,
    /// Photo selected, export available
    Ready,
}

/// In-memory edit state for a single presented screen
#[derive(Debug, Clone)]
pub struct EditSession {
    base_image: Option<SourceImage>,
    top_caption: String,
    bottom_caption: String,
    active_slot: ActiveSlot,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    /// Create a session already in its reset state
    pub fn new() -> Self {
        Self {
            base_image: None,
            top_caption: CaptionSlot::Top.sentinel().to_string(),
            bottom_caption: CaptionSlot::Bottom.sentinel().to_string(),
            active_slot: ActiveSlot::None,
        }
    }

    /// Return every field to its initial value. Safe to call repeatedly.
    pub fn reset(&mut self) {
        for slot in CaptionSlot::ALL {
            *self.caption_mut(slot) = slot.sentinel().to_string();
        }
        self.base_image = None;
        self.active_slot = ActiveSlot::None;
    }

    pub fn base_image(&self) -> Option<&SourceImage> {
        self.base_image.as_ref()
    }

    pub fn set_base_image(&mut self, image: SourceImage) {
        self.base_image = Some(image);
    }

    /// Export is possible exactly when a photo has been selected
    pub fn can_export(&self) -> bool {
        self.base_image.is_some()
    }

    pub fn state(&self) -> SessionState {
        if self.can_export() {
            SessionState::Ready
        } else {
            SessionState::Empty
        }
    }

    pub fn caption(&self, slot: CaptionSlot) -> &str {
        match slot {
            CaptionSlot::Top => &self.top_caption,
            CaptionSlot::Bottom => &self.bottom_caption,
        }
    }

    pub fn caption_mut(&mut self, slot: CaptionSlot) -> &mut String {
        match slot {
            CaptionSlot::Top => &mut self.top_caption,
            CaptionSlot::Bottom => &mut self.bottom_caption,
        }
    }

    pub fn top_caption(&self) -> &str {
        &self.top_caption
    }

    pub fn bottom_caption(&self) -> &str {
        &self.bottom_caption
    }

    /// Whether the slot still shows its own placeholder (case-insensitive)
    pub fn is_caption_at_default(&self, slot: CaptionSlot) -> bool {
        self.caption(slot).to_uppercase() == slot.sentinel()
    }

    pub fn active_slot(&self) -> ActiveSlot {
        self.active_slot
    }

    pub fn set_active_slot(&mut self, active: ActiveSlot) {
        self.active_slot = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn photo() -> SourceImage {
        Arc::new(DynamicImage::ImageRgba8(RgbaImage::new(4, 4)))
    }

    #[test]
    fn test_new_session_is_reset() {
        let session = EditSession::new();
        assert_eq!(session.top_caption(), "TOP");
        assert_eq!(session.bottom_caption(), "BOTTOM");
        assert!(session.base_image().is_none());
        assert!(!session.can_export());
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.active_slot(), ActiveSlot::None);
    }

    #[test]
    fn test_reset_clears_image_and_captions() {
        let mut session = EditSession::new();
        session.set_base_image(photo());
        *session.caption_mut(CaptionSlot::Top) = "hello".to_string();
        session.set_active_slot(ActiveSlot::Bottom);

        session.reset();

        assert_eq!(session.top_caption(), "TOP");
        assert!(!session.can_export());
        assert_eq!(session.active_slot(), ActiveSlot::None);
    }

    #[test]
    fn test_sentinels_are_per_slot() {
        let mut session = EditSession::new();
        *session.caption_mut(CaptionSlot::Top) = "bottom".to_string();
        *session.caption_mut(CaptionSlot::Bottom) = "top".to_string();

        assert!(!session.is_caption_at_default(CaptionSlot::Top));
        assert!(!session.is_caption_at_default(CaptionSlot::Bottom));
    }

    #[test]
    fn test_default_detection_ignores_case() {
        let mut session = EditSession::new();
        *session.caption_mut(CaptionSlot::Bottom) = "BoTtOm".to_string();
        assert!(session.is_caption_at_default(CaptionSlot::Bottom));
    }

    #[test]
    fn test_active_slot_conversion() {
        assert_eq!(ActiveSlot::from(CaptionSlot::Bottom).slot(), Some(CaptionSlot::Bottom));
        assert_eq!(ActiveSlot::None.slot(), None);
    }
}
