//! UI events delivered to the meme screen

use crate::session::CaptionSlot;
use crate::storage::MemeRecord;

/// Something the user did on the meme screen
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenEvent {
    /// Album toolbar button
    AlbumPressed,
    /// Camera toolbar button
    CameraPressed,
    /// Cancel button: start over
    CancelPressed,
    /// A caption field gained focus
    BeginEditing(CaptionSlot),
    /// Return key in a caption field, carrying the field's text
    ReturnPressed(CaptionSlot, String),
    /// Share button
    ActionPressed,
}

/// Result of the share button
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// Shared; `record` is set when the meme was also saved
    Shared { record: Option<MemeRecord> },
    /// User backed out of the share surface
    Cancelled,
}
