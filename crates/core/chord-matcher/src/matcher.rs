use indexmap::IndexMap;
use std::collections::HashMap;

use crate::error::MatcherError;
use crate::handler::ChordListener;
use crate::history::{BoundedHistory, HistorySlot};
use crate::trie::ChordTrie;
use crate::types::{
    chord_name, Chord, HotkeyEvent, KeyEvent, Keystroke, LogicalKey, Modifier, ModifierSet,
};

pub type HotkeyAction = Box<dyn FnMut(&HotkeyEvent) -> anyhow::Result<()> + Send>;

struct RegisteredAction {
    action: HotkeyAction,
    handled: bool,
}

/// Actions of one chord, keyed by description, in registration order.
type ChordActions = IndexMap<Option<String>, RegisteredAction>;

#[derive(Debug, Clone)]
struct LastTrigger {
    keys: Vec<Keystroke>,
    chord_name: String,
    count: u32,
    consecutive_count: u32,
    modifier_envelope_count: Option<u32>,
}

impl LastTrigger {
    fn first(keys: Vec<Keystroke>, chord_name: String) -> Self {
        Self {
            keys,
            chord_name,
            count: 1,
            consecutive_count: 1,
            modifier_envelope_count: Some(1),
        }
    }

    fn event(
        &self,
        description: &Option<String>,
        follow_up: bool,
        continuously: bool,
    ) -> HotkeyEvent {
        HotkeyEvent {
            keys: self.keys.clone(),
            chord_name: self.chord_name.clone(),
            count: self.count,
            consecutive_count: self.consecutive_count,
            modifier_envelope_count: self.modifier_envelope_count,
            description: description.clone(),
            follow_up,
            continuously,
        }
    }
}

/// Reference-counted set of held modifiers.
#[derive(Debug, Default)]
struct ActiveModifiers {
    counts: HashMap<Modifier, u32>,
}

impl ActiveModifiers {
    fn press(&mut self, modifier: Modifier) {
        *self.counts.entry(modifier).or_insert(0) += 1;
    }

    /// Returns true when this release emptied the set.
    fn release(&mut self, modifier: Modifier) -> bool {
        let Some(count) = self.counts.get_mut(&modifier) else {
            return false;
        };
        *count -= 1;
        if *count == 0 {
            self.counts.remove(&modifier);
        }
        self.counts.is_empty()
    }

    fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    fn set(&self) -> ModifierSet {
        self.counts
            .keys()
            .fold(ModifierSet::empty(), |set, modifier| set | modifier.flag())
    }

    fn clear(&mut self) {
        self.counts.clear();
    }
}

/// Matches normalized key events against the registered chords.
///
/// While no keys have been typed toward a chord the matcher is idle. Every non-modifier key
/// extends the tentative subpath; the subpath either completes a chord (trigger), stays the
/// beginning of some chord (progress) or is dropped, which also breaks the trigger streak.
pub struct ChordMatcher {
    registered: ChordTrie<Keystroke, ChordActions>,
    history: BoundedHistory,
    active_modifiers: ActiveModifiers,
    active_subpath: Vec<Keystroke>,
    last_trigger: Option<LastTrigger>,
    is_follow_up: bool,
    is_continuously: bool,
    listeners: Vec<Box<dyn ChordListener>>,
}

impl Default for ChordMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ChordMatcher {
    pub fn new() -> Self {
        Self {
            registered: ChordTrie::new(),
            history: BoundedHistory::new(1),
            active_modifiers: ActiveModifiers::default(),
            active_subpath: Vec::new(),
            last_trigger: None,
            is_follow_up: false,
            is_continuously: false,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe<L: ChordListener + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    /// Registers `action` without description, marking triggering key events as handled.
    pub fn register_hotkey<F>(&mut self, chord: &Chord, action: F) -> Result<(), MatcherError>
    where
        F: FnMut(&HotkeyEvent) -> anyhow::Result<()> + Send + 'static,
    {
        self.register_hotkey_with(chord, action, None, true)
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
        let description = description.map(str::to_owned);
        let keys = chord.keys();

        if self
            .registered
            .get(keys)
            .is_some_and(|actions| actions.contains_key(&description))
        {
            return Err(MatcherError::DuplicateAction {
                chord: chord.to_string(),
                description,
            });
        }

        log::debug!(
            "Registering hotkey '{}' (description: {:?}, handled: {})",
            chord,
            description,
            handled
        );

        let entry = RegisteredAction {
            action: Box::new(action),
            handled,
        };
        match self.registered.get_mut(keys) {
            Some(actions) => {
                actions.insert(description, entry);
            }
            None => {
                let mut actions = ChordActions::new();
                actions.insert(description, entry);
                self.registered.insert(keys, actions)?;
            }
        }

        let longest = self.registered.longest_path_len();
        if longest > self.history.capacity() {
            self.history.resize(longest);
        }

        Ok(())
    }

    /// Without description every action of the chord is removed. Unknown chords are ignored.
    pub fn unregister_hotkey(
        &mut self,
        chord: &Chord,
        description: Option<&str>,
    ) -> Result<(), MatcherError> {
        let keys = chord.keys();
        let Some(actions) = self.registered.get_mut(keys) else {
            log::debug!("Ignoring unregister of unknown hotkey '{}'", chord);
            return Ok(());
        };

        match description {
            None => {
                self.registered.remove(keys);
            }
            Some(description) => {
                if actions.shift_remove(&Some(description.to_owned())).is_none() {
                    return Err(MatcherError::ActionNotFound {
                        chord: chord.to_string(),
                        description: description.to_owned(),
                    });
                }
                if actions.is_empty() {
                    self.registered.remove(keys);
                }
            }
        }

        log::debug!(
            "Unregistered hotkey '{}' (description: {:?})",
            chord,
            description
        );
        Ok(())
    }

    /// Registered chords, shortest first, then by name.
    pub fn registered_chords(&self) -> Vec<Chord> {
        let mut chords: Vec<Chord> = self
            .registered
            .all_paths()
            .into_iter()
            .filter_map(|path| Chord::try_from(path).ok())
            .collect();
        chords.sort_by_cached_key(|chord| (chord.len(), chord.to_string()));
        chords
    }

    pub fn hotkey_description(&self) -> String {
        let mut description = String::from("Registered Hotkeys:");
        for chord in self.registered_chords() {
            let Some(actions) = self.registered.get(chord.keys()) else {
                continue;
            };
            for action_description in actions.keys() {
                description.push_str("\n- ");
                description.push_str(&chord.to_string());
                if let Some(text) = action_description.as_deref().filter(|d| !d.trim().is_empty()) {
                    description.push_str(&format!(" ({})", text));
                }
            }
        }
        description
    }

    /// Keystrokes recognized so far toward a longer chord.
    pub fn partial_chord(&self) -> &[Keystroke] {
        &self.active_subpath
    }

    pub fn active_modifiers(&self) -> ModifierSet {
        self.active_modifiers.set()
    }

    /// Keystrokes still held in the bounded history, oldest first.
    pub fn recent_keystrokes(&self) -> Vec<Keystroke> {
        self.history
            .iter()
            .filter_map(|slot| slot.keystroke)
            .collect()
    }

    pub fn history_capacity(&self) -> usize {
        self.history.capacity()
    }

    /// Forgets all key state. Registrations and subscribers are kept.
    pub fn reset(&mut self) {
        log::debug!("Resetting chord matcher state");
        self.history.clear();
        self.active_modifiers.clear();
        self.active_subpath.clear();
        self.last_trigger = None;
        self.is_follow_up = false;
        self.is_continuously = false;
    }

    pub fn process(&mut self, event: KeyEvent) -> anyhow::Result<bool> {
        match event {
            KeyEvent::Press(key) => self.on_key_down(key),
            KeyEvent::Release(key) => {
                self.on_key_up(key);
                Ok(false)
            }
        }
    }

    /// Returns whether the key event should be considered handled. Errors are the first error
    /// returned by an action of the triggered chord.
    pub fn on_key_down(&mut self, key: LogicalKey) -> anyhow::Result<bool> {
        match key {
            LogicalKey::Modifier(modifier) => {
                self.press_modifier(modifier);
                Ok(false)
            }
            LogicalKey::Key(key) => self.press_key(Keystroke::new(key, self.active_modifiers.set())),
        }
    }

    pub fn on_key_up(&mut self, key: LogicalKey) {
        let LogicalKey::Modifier(modifier) = key else {
            return;
        };
        if !self.active_modifiers.release(modifier) {
            return;
        }

        self.is_continuously = false;

        let Some(last) = &self.last_trigger else {
            return;
        };
        let Some(actions) = self.registered.get(&last.keys) else {
            return;
        };

        log::debug!("All modifiers released after '{}'", last.chord_name);
        let follow_up = self.is_follow_up;
        let continuously = self.is_continuously && follow_up;
        for description in actions.keys() {
            let event = last.event(description, follow_up, continuously);
            for listener in self.listeners.iter_mut() {
                listener.all_modifiers_released(&event);
            }
        }
    }

    fn press_modifier(&mut self, modifier: Modifier) {
        if self.active_modifiers.is_empty() {
            if let Some(last) = &mut self.last_trigger {
                last.modifier_envelope_count = None;
            }
        }

        self.active_modifiers.press(modifier);
        if let Some(slot) = self.open_slot() {
            slot.modifiers.insert(modifier.flag());
        }
    }

    fn press_key(&mut self, keystroke: Keystroke) -> anyhow::Result<bool> {
        if let Some(slot) = self.open_slot() {
            slot.keystroke = Some(keystroke);
        }
        self.active_subpath.push(keystroke);

        if self.registered.contains_path(&self.active_subpath) {
            return self.trigger();
        }

        if self.registered.contains_subpath(&self.active_subpath) {
            log::debug!("Chord in progress: {}", chord_name(&self.active_subpath));
            for listener in self.listeners.iter_mut() {
                listener.chord_progress(&self.active_subpath);
            }
            return Ok(false);
        }

        self.break_streak();
        Ok(false)
    }

    fn trigger(&mut self) -> anyhow::Result<bool> {
        let keys = std::mem::take(&mut self.active_subpath);
        let name = chord_name(&keys);

        let last = match self.last_trigger.take() {
            Some(previous) if previous.keys == keys => LastTrigger {
                keys: keys.clone(),
                chord_name: name,
                count: previous.count + 1,
                consecutive_count: previous.consecutive_count + 1,
                modifier_envelope_count: Some(previous.modifier_envelope_count.unwrap_or(0) + 1),
            },
            _ => LastTrigger::first(keys.clone(), name),
        };

        let follow_up = self.is_follow_up;
        let continuously = self.is_continuously && follow_up;

        log::debug!(
            "Hotkey triggered: '{}' (count: {}, consecutive: {}, follow up: {})",
            last.chord_name,
            last.count,
            last.consecutive_count,
            follow_up
        );

        self.history.clear();
        self.is_follow_up = true;
        self.is_continuously |= !self.active_modifiers.is_empty();
        self.history
            .push(HistorySlot::new(self.active_modifiers.set()));

        let Some(actions) = self.registered.get_mut(&keys) else {
            self.last_trigger = Some(last);
            return Ok(false);
        };

        let handled = actions.values().any(|registered| registered.handled);
        let events: Vec<HotkeyEvent> = actions
            .keys()
            .map(|description| last.event(description, follow_up, continuously))
            .collect();
        self.last_trigger = Some(last);

        for (registered, event) in actions.values_mut().zip(&events) {
            (registered.action)(event)?;
            for listener in self.listeners.iter_mut() {
                listener.hotkey_triggered(event);
            }
        }

        Ok(handled)
    }

    /// A key that neither completes nor continues a chord.
    fn break_streak(&mut self) {
        if !self.active_subpath.is_empty() {
            log::trace!("Dropping subpath {}", chord_name(&self.active_subpath));
        }
        self.active_subpath.clear();
        self.is_follow_up = false;
        self.is_continuously = false;
        if let Some(last) = &mut self.last_trigger {
            last.consecutive_count = 0;
            last.modifier_envelope_count = None;
        }
    }

    fn open_slot(&mut self) -> Option<&mut HistorySlot> {
        if self.history.last().map_or(true, HistorySlot::has_key) {
            self.history
                .push(HistorySlot::new(self.active_modifiers.set()));
        }
        self.history.last_mut()
    }
}
