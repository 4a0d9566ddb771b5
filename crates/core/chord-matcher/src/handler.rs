use crossbeam_channel::Sender;

use crate::types::{HotkeyEvent, Keystroke};

/// Subscriber for matcher notifications. All methods default to doing nothing.
pub trait ChordListener: Send {
    /// The keys typed so far are the beginning of at least one registered chord.
    fn chord_progress(&mut self, _subpath: &[Keystroke]) {}

    fn hotkey_triggered(&mut self, _event: &HotkeyEvent) {}

    /// Fired once per action of the last triggered chord when the held modifiers drop to none.
    fn all_modifiers_released(&mut self, _event: &HotkeyEvent) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    ChordProgress(Vec<Keystroke>),
    HotkeyTriggered(HotkeyEvent),
    AllModifiersReleased(HotkeyEvent),
}

/// Forwards every notification into a channel.
pub struct ChannelListener {
    sender: Sender<Notification>,
}

impl ChannelListener {
    pub fn new(sender: Sender<Notification>) -> Self {
        Self { sender }
    }

    fn send(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            log::debug!("Notification receiver dropped");
        }
    }
}

impl ChordListener for ChannelListener {
    fn chord_progress(&mut self, subpath: &[Keystroke]) {
        self.send(Notification::ChordProgress(subpath.to_vec()));
    }

    fn hotkey_triggered(&mut self, event: &HotkeyEvent) {
        self.send(Notification::HotkeyTriggered(event.clone()));
    }

    fn all_modifiers_released(&mut self, event: &HotkeyEvent) {
        self.send(Notification::AllModifiersReleased(event.clone()));
    }
}
