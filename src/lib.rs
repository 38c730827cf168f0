//! MemeMaker - caption a photo with top and bottom text and share the result
//!
//! The caption overlay engine owns the edit session and renders memes; the
//! camera, photo library, keyboard and share surface are host collaborators
//! reached through the traits in [`capture`], [`keyboard`] and [`share`].

pub mod capture;
pub mod compose;
pub mod config;
pub mod engine;
pub mod keyboard;
pub mod screen;
pub mod session;
pub mod share;
pub mod storage;

pub use compose::CaptionStyle;
pub use engine::{CaptionOverlayEngine, CompositeArtifact, ExportError};
pub use session::{ActiveSlot, CaptionSlot, EditSession, SessionState, SourceImage};
