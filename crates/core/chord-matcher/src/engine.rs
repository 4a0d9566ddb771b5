use rdev::{EventType, Key};

use crate::error::MatcherError;
use crate::handler::ChordListener;
use crate::matcher::ChordMatcher;
use crate::normalizer::KeyEventNormalizer;
use crate::types::{Chord, HotkeyEvent, Keystroke};

/// Raw keyboard events in, chord notifications out: the normalizer feeding the matcher.
#[derive(Default)]
pub struct HotkeyEngine {
    normalizer: KeyEventNormalizer,
    matcher: ChordMatcher,
}

impl HotkeyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matcher(&self) -> &ChordMatcher {
        &self.matcher
    }

    pub fn matcher_mut(&mut self) -> &mut ChordMatcher {
        &mut self.matcher
    }

    pub fn subscribe<L: ChordListener + 'static>(&mut self, listener: L) {
        self.matcher.subscribe(listener);
    }

    pub fn register_hotkey<F>(&mut self, chord: &Chord, action: F) -> Result<(), MatcherError>
    where
        F: FnMut(&HotkeyEvent) -> anyhow::Result<()> + Send + 'static,
    {
        self.matcher.register_hotkey(chord, action)
    }

    pub fn register_hotkey_with<F>(
        &mut self,
        chord: &Chord,
        action: F,
        description: Option<&str>,
        handled: bool,
    ) -> Result<(), MatcherError>
    where
        F: FnMut(&HotkeyEvent) -> anyhow::Result<()> + Send + 'static,
    {
        self.matcher
            .register_hotkey_with(chord, action, description, handled)
    }

    pub fn unregister_hotkey(
        &mut self,
        chord: &Chord,
        description: Option<&str>,
    ) -> Result<(), MatcherError> {
        self.matcher.unregister_hotkey(chord, description)
    }

    pub fn registered_chords(&self) -> Vec<Chord> {
        self.matcher.registered_chords()
    }

    pub fn partial_chord(&self) -> &[Keystroke] {
        self.matcher.partial_chord()
    }

    pub fn on_raw_key_down(&mut self, key: Key) -> anyhow::Result<bool> {
        match self.normalizer.on_raw_key_down(key) {
            Some(event) => self.matcher.process(event),
            None => Ok(false),
        }
    }

    pub fn on_raw_key_up(&mut self, key: Key) -> anyhow::Result<bool> {
        match self.normalizer.on_raw_key_up(key) {
            Some(event) => self.matcher.process(event),
            None => Ok(false),
        }
    }

    /// Feeds an rdev event. Non-keyboard events are ignored.
    pub fn process_event(&mut self, event: &EventType) -> anyhow::Result<bool> {
        match self.normalizer.process(event) {
            Some(event) => self.matcher.process(event),
            None => Ok(false),
        }
    }

    pub fn reset(&mut self) {
        self.normalizer.reset();
        self.matcher.reset();
    }
}
