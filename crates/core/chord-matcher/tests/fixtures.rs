#![allow(dead_code)]

use chord_matcher::*;
use crossbeam_channel::{unbounded, Receiver};
use parking_lot::Mutex;
use std::sync::Arc;

pub struct TestEngine {
    pub engine: HotkeyEngine,
    notifications: Receiver<Notification>,
    invocations: Arc<Mutex<Vec<HotkeyEvent>>>,
}

impl TestEngine {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        let mut engine = HotkeyEngine::new();
        engine.subscribe(ChannelListener::new(sender));

        Self {
            engine,
            notifications: receiver,
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_chords(chords: &[&str]) -> Self {
        let mut test_engine = Self::new();
        for chord in chords {
            test_engine.register(chord, None);
        }
        test_engine
    }

    pub fn register(&mut self, chord: &str, description: Option<&str>) {
        let chord = parse_chord(chord).unwrap_or_else(|e| panic!("Bad chord {:?}: {}", chord, e));
        let recorder = self.recorder();
        self.engine
            .register_hotkey_with(&chord, recorder, description, true)
            .unwrap_or_else(|e| panic!("Registration of {} failed: {}", chord, e));
    }

    /// An action that records every invocation.
    pub fn recorder(&self) -> impl FnMut(&HotkeyEvent) -> anyhow::Result<()> + Send + 'static {
        let invocations = self.invocations.clone();
        move |event: &HotkeyEvent| {
            invocations.lock().push(event.clone());
            Ok(())
        }
    }

    pub fn press(&mut self, key: Key) -> bool {
        self.engine
            .on_raw_key_down(key)
            .unwrap_or_else(|e| panic!("Action failed on {:?}: {}", key, e))
    }

    pub fn release(&mut self, key: Key) {
        self.engine
            .on_raw_key_up(key)
            .unwrap_or_else(|e| panic!("Release of {:?} failed: {}", key, e));
    }

    pub fn tap(&mut self, key: Key) -> bool {
        let handled = self.press(key);
        self.release(key);
        handled
    }

    /// Taps `key` while `modifiers` are held, pressing them in order and releasing in reverse.
    pub fn tap_with(&mut self, modifiers: &[Key], key: Key) -> bool {
        for modifier in modifiers {
            self.press(*modifier);
        }
        let handled = self.tap(key);
        for modifier in modifiers.iter().rev() {
            self.release(*modifier);
        }
        handled
    }

    pub fn partial_chord(&self) -> String {
        chord_name(self.engine.partial_chord())
    }

    pub fn take_notifications(&self) -> Vec<Notification> {
        self.notifications.try_iter().collect()
    }

    pub fn take_invocations(&self) -> Vec<HotkeyEvent> {
        std::mem::take(&mut *self.invocations.lock())
    }

    pub fn take_triggers(&self) -> Vec<HotkeyEvent> {
        self.take_notifications()
            .into_iter()
            .filter_map(|notification| match notification {
                Notification::HotkeyTriggered(event) => Some(event),
                _ => None,
            })
            .collect()
    }

    pub fn take_releases(&self) -> Vec<HotkeyEvent> {
        self.take_notifications()
            .into_iter()
            .filter_map(|notification| match notification {
                Notification::AllModifiersReleased(event) => Some(event),
                _ => None,
            })
            .collect()
    }

    pub fn expect_single_trigger(&self) -> HotkeyEvent {
        let mut triggers = self.take_triggers();
        if triggers.len() != 1 {
            panic!("Expected exactly one trigger, got {:?}", triggers);
        }
        triggers.remove(0)
    }

    pub fn expect_no_trigger(&self) {
        let triggers = self.take_triggers();
        if !triggers.is_empty() {
            panic!("Expected no trigger, but got {:?}", triggers);
        }
    }
}
