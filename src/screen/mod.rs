//! Meme Screen
//!
//! Wires the host collaborators (photo picker, caption fields, keyboard
//! notifications, share surface) to the caption overlay engine. Each UI
//! callback has one handler here.

pub mod events;

pub use events::{ActionOutcome, ScreenEvent};

use anyhow::Result;
use tracing::{info, warn};

use crate::capture::{ImageAcquisition, ImageSource};
use crate::engine::CaptionOverlayEngine;
use crate::keyboard::{KeyboardNotifications, KeyboardSubscription, ViewOffset};
use crate::session::CaptionSlot;
use crate::share::{ShareOutcome, ShareTarget};
use crate::storage::MemeStore;

/// Single meme-editing screen
pub struct MemeScreen<A: ImageAcquisition, S: ShareTarget> {
    engine: CaptionOverlayEngine,
    picker: A,
    share: S,
    /// Where completed shares are saved, if anywhere
    store: Option<MemeStore>,
    camera_enabled: bool,
    /// Held only while the screen is visible
    keyboard: Option<KeyboardSubscription>,
    offset: ViewOffset,
}

impl<A: ImageAcquisition, S: ShareTarget> MemeScreen<A, S> {
    pub fn new(engine: CaptionOverlayEngine, picker: A, share: S) -> Self {
        Self {
            engine,
            picker,
            share,
            store: None,
            camera_enabled: false,
            keyboard: None,
            offset: ViewOffset::default(),
        }
    }

    /// Save every meme whose share completes into `store`
    pub fn with_store(mut self, store: MemeStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn engine(&self) -> &CaptionOverlayEngine {
        &self.engine
    }

    pub fn picker_mut(&mut self) -> &mut A {
        &mut self.picker
    }

    pub fn is_camera_enabled(&self) -> bool {
        self.camera_enabled
    }

    /// Share button state, kept in step with the session
    pub fn is_action_enabled(&self) -> bool {
        self.engine.can_export()
    }

    pub fn is_subscribed(&self) -> bool {
        self.keyboard.is_some()
    }

    pub fn view_offset(&self) -> ViewOffset {
        self.offset
    }

    /// One-time setup when the screen is created
    pub fn did_load(&mut self) {
        self.camera_enabled = self.picker.is_source_available(ImageSource::Camera);
        if !self.camera_enabled {
            info!("No camera available, camera button disabled");
        }
        self.engine.reset();
    }

    /// Screen is about to become visible: start listening for the keyboard
    pub fn will_appear(&mut self, notifications: &KeyboardNotifications) {
        self.keyboard = Some(notifications.subscribe());
    }

    /// Screen is about to go away: stop listening for the keyboard
    pub fn will_disappear(&mut self) {
        self.keyboard = None;
        self.offset = ViewOffset::default();
    }

    /// Apply keyboard notifications received since the last call.
    /// Focus changes drain the queue first, so every event is applied with
    /// the slot that was active when it was posted.
    pub fn pump_keyboard_events(&mut self) {
        let Some(subscription) = &self.keyboard else {
            return;
        };
        let active = self.engine.active_slot();
        for event in subscription.pending() {
            self.offset.apply(event, active);
        }
    }

    pub fn album_pressed(&mut self) {
        self.pick_image(ImageSource::Library);
    }

    pub fn camera_pressed(&mut self) {
        if !self.camera_enabled {
            warn!("Camera requested but no camera is available");
            return;
        }
        self.pick_image(ImageSource::Camera);
    }

    fn pick_image(&mut self, source: ImageSource) {
        let image = self.picker.request_image(source);
        self.engine.set_image(image);
    }

    pub fn cancel_pressed(&mut self) {
        self.engine.reset();
    }

    pub fn text_field_did_begin(&mut self, slot: CaptionSlot) {
        self.pump_keyboard_events();
        self.engine.begin_editing(slot);
    }

    pub fn text_field_should_return(&mut self, slot: CaptionSlot, text: impl Into<String>) {
        self.pump_keyboard_events();
        self.engine.commit_caption(slot, text);
    }

    /// Export the meme, hand it to the share target and save it once sharing completes
    pub fn action_pressed(&mut self) -> Result<ActionOutcome> {
        let artifact = self.engine.export()?;

        match self.share.present(artifact.rendered_image())? {
            ShareOutcome::Cancelled => {
                info!("Share cancelled, meme not saved");
                Ok(ActionOutcome::Cancelled)
            }
            ShareOutcome::Completed => {
                let record = match &self.store {
                    Some(store) => match store.save(&artifact) {
                        Ok(record) => Some(record),
                        Err(e) => {
                            warn!("Meme shared but could not be saved: {}", e);
                            None
                        }
                    },
                    None => None,
                };
                Ok(ActionOutcome::Shared { record })
            }
        }
    }

    /// Route a UI event to its handler
    pub fn handle(&mut self, event: ScreenEvent) -> Result<Option<ActionOutcome>> {
        match event {
            ScreenEvent::AlbumPressed => self.album_pressed(),
            ScreenEvent::CameraPressed => self.camera_pressed(),
            ScreenEvent::CancelPressed => self.cancel_pressed(),
            ScreenEvent::BeginEditing(slot) => self.text_field_did_begin(slot),
            ScreenEvent::ReturnPressed(slot, text) => self.text_field_should_return(slot, text),
            ScreenEvent::ActionPressed => return self.action_pressed().map(Some),
        }
        Ok(None)
    }
}
