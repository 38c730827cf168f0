//! Keyboard visibility notifications
//!
//! The host posts show/hide events to a [`KeyboardNotifications`] hub. A
//! screen holds a [`KeyboardSubscription`] only while it is on screen; the
//! subscription unregisters itself when dropped.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

use crate::session::ActiveSlot;

/// Keyboard visibility change reported by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyboardEvent {
    /// Keyboard is about to appear with the given height in points
    WillShow { height: f32 },
    /// Keyboard is about to disappear
    WillHide,
}

#[derive(Debug, Default)]
struct Subscribers {
    next_id: u64,
    senders: Vec<(u64, Sender<KeyboardEvent>)>,
}

/// Fan-out point for keyboard notifications
#[derive(Debug, Clone, Default)]
pub struct KeyboardNotifications {
    subscribers: Arc<RwLock<Subscribers>>,
}

impl KeyboardNotifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register for keyboard events until the returned guard is dropped
    pub fn subscribe(&self) -> KeyboardSubscription {
        let (sender, receiver) = unbounded();
        let id = {
            let mut subscribers = self.subscribers.write();
            let id = subscribers.next_id;
            subscribers.next_id += 1;
            subscribers.senders.push((id, sender));
            id
        };
        debug!("Keyboard subscriber {} registered", id);

        KeyboardSubscription {
            id,
            receiver,
            subscribers: self.subscribers.clone(),
        }
    }

    /// Deliver `event` to every subscriber, returning how many received it
    pub fn post(&self, event: KeyboardEvent) -> usize {
        let subscribers = self.subscribers.read();
        subscribers
            .senders
            .iter()
            .filter(|(_, sender)| sender.send(event).is_ok())
            .count()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().senders.len()
    }
}

/// Live registration with a [`KeyboardNotifications`] hub
#[derive(Debug)]
pub struct KeyboardSubscription {
    id: u64,
    receiver: Receiver<KeyboardEvent>,
    subscribers: Arc<RwLock<Subscribers>>,
}

impl KeyboardSubscription {
    /// Events posted since the last call, without blocking
    pub fn pending(&self) -> impl Iterator<Item = KeyboardEvent> + '_ {
        self.receiver.try_iter()
    }
}

impl Drop for KeyboardSubscription {
    fn drop(&mut self) {
        self.subscribers.write().senders.retain(|(id, _)| *id != self.id);
        debug!("Keyboard subscriber {} unregistered", self.id);
    }
}

/// Vertical shift applied to the screen so the focused caption stays visible
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewOffset {
    y: f32,
}

impl ViewOffset {
    /// Current offset in points; negative moves the view up
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Only the bottom caption is covered by the keyboard, so only it moves
    /// the view. Repeated show events don't accumulate.
    pub fn apply(&mut self, event: KeyboardEvent, active: ActiveSlot) {
        match event {
            KeyboardEvent::WillShow { height } => {
                if active == ActiveSlot::Bottom {
                    self.y = -height;
                }
            }
            KeyboardEvent::WillHide => self.y = 0.0,
        }
    }
}
