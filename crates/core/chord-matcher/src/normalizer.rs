use rdev::{EventType, Key};
use std::collections::{HashMap, HashSet};

use crate::types::{KeyEvent, LogicalKey, Modifier};

/// Folds left/right modifier variants into one logical modifier. `Unknown` keys have no stable
/// identity and map to `None`.
pub fn canonical_key(raw: Key) -> Option<LogicalKey> {
    let modifier = match raw {
        Key::ControlLeft | Key::ControlRight => Modifier::Ctrl,
        Key::ShiftLeft | Key::ShiftRight => Modifier::Shift,
        Key::Alt | Key::AltGr => Modifier::Alt,
        Key::MetaLeft | Key::MetaRight => Modifier::Super,
        Key::Unknown(_) => return None,
        key => return Some(LogicalKey::Key(key)),
    };
    Some(LogicalKey::Modifier(modifier))
}

/// Turns the raw stream (auto-repeated presses, sided modifier codes) into exactly one
/// press/release pair per hold of a logical key.
#[derive(Debug, Default)]
pub struct KeyEventNormalizer {
    held: HashMap<LogicalKey, HashSet<Key>>,
}

impl KeyEventNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_raw_key_down(&mut self, raw: Key) -> Option<KeyEvent> {
        let logical = canonical_key(raw)?;
        let variants = self.held.entry(logical).or_default();
        let first = variants.is_empty();
        variants.insert(raw);

        if first {
            log::trace!("Normalized press {:?} (raw {:?})", logical, raw);
            Some(KeyEvent::Press(logical))
        } else {
            None
        }
    }

    pub fn on_raw_key_up(&mut self, raw: Key) -> Option<KeyEvent> {
        let logical = canonical_key(raw)?;
        let variants = self.held.get_mut(&logical)?;
        variants.remove(&raw);

        if variants.is_empty() {
            self.held.remove(&logical);
            log::trace!("Normalized release {:?} (raw {:?})", logical, raw);
            Some(KeyEvent::Release(logical))
        } else {
            None
        }
    }

    /// Keyboard events are normalized, everything else (mouse, wheel) is dropped.
    pub fn process(&mut self, event: &EventType) -> Option<KeyEvent> {
        match *event {
            EventType::KeyPress(key) => self.on_raw_key_down(key),
            EventType::KeyRelease(key) => self.on_raw_key_up(key),
            _ => None,
        }
    }

    pub fn is_held(&self, key: LogicalKey) -> bool {
        self.held.contains_key(&key)
    }

    pub fn reset(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTRL: LogicalKey = LogicalKey::Modifier(Modifier::Ctrl);

    #[test]
    fn test_repeated_presses_collapse() {
        let mut normalizer = KeyEventNormalizer::new();
        let mut events = Vec::new();

        for _ in 0..50 {
            events.extend(normalizer.on_raw_key_down(Key::KeyA));
        }
        events.extend(normalizer.on_raw_key_up(Key::KeyA));

        assert_eq!(
            events,
            vec![
                KeyEvent::Press(LogicalKey::Key(Key::KeyA)),
                KeyEvent::Release(LogicalKey::Key(Key::KeyA)),
            ]
        );
    }

    #[test]
    fn test_sided_modifiers_fold() {
        let mut normalizer = KeyEventNormalizer::new();

        assert_eq!(
            normalizer.on_raw_key_down(Key::ControlLeft),
            Some(KeyEvent::Press(CTRL))
        );
        assert_eq!(normalizer.on_raw_key_down(Key::ControlRight), None);
        assert_eq!(normalizer.on_raw_key_up(Key::ControlLeft), None);
        assert!(normalizer.is_held(CTRL));
        assert_eq!(
            normalizer.on_raw_key_up(Key::ControlRight),
            Some(KeyEvent::Release(CTRL))
        );
        assert!(!normalizer.is_held(CTRL));
    }

    #[test]
    fn test_canonical_keys() {
        assert_eq!(
            canonical_key(Key::AltGr),
            Some(LogicalKey::Modifier(Modifier::Alt))
        );
        assert_eq!(
            canonical_key(Key::MetaRight),
            Some(LogicalKey::Modifier(Modifier::Super))
        );
        assert_eq!(
            canonical_key(Key::ShiftLeft),
            Some(LogicalKey::Modifier(Modifier::Shift))
        );
        assert_eq!(canonical_key(Key::KeyZ), Some(LogicalKey::Key(Key::KeyZ)));
        assert_eq!(canonical_key(Key::Unknown(1234)), None);
    }

    #[test]
    fn test_unknown_keys_dropped() {
        let mut normalizer = KeyEventNormalizer::new();

        assert_eq!(normalizer.on_raw_key_down(Key::Unknown(7)), None);
        assert_eq!(normalizer.on_raw_key_up(Key::Unknown(7)), None);
    }

    #[test]
    fn test_release_of_untracked_key_is_noop() {
        let mut normalizer = KeyEventNormalizer::new();

        assert_eq!(normalizer.on_raw_key_up(Key::KeyQ), None);
        assert_eq!(normalizer.on_raw_key_up(Key::ShiftRight), None);
    }

    #[test]
    fn test_release_of_other_variant_keeps_hold() {
        let mut normalizer = KeyEventNormalizer::new();

        normalizer.on_raw_key_down(Key::ShiftLeft);
        assert_eq!(normalizer.on_raw_key_up(Key::ShiftRight), None);
        assert!(normalizer.is_held(LogicalKey::Modifier(Modifier::Shift)));
    }

    #[test]
    fn test_process_ignores_non_keyboard_events() {
        let mut normalizer = KeyEventNormalizer::new();

        assert_eq!(
            normalizer.process(&EventType::MouseMove { x: 1.0, y: 2.0 }),
            None
        );
        assert_eq!(
            normalizer.process(&EventType::KeyPress(Key::Escape)),
            Some(KeyEvent::Press(LogicalKey::Key(Key::Escape)))
        );
        assert_eq!(
            normalizer.process(&EventType::KeyRelease(Key::Escape)),
            Some(KeyEvent::Release(LogicalKey::Key(Key::Escape)))
        );
    }
}
