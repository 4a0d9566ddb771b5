use bitflags::bitflags;
use rdev::Key;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::MatcherError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Ctrl,
    Alt,
    Shift,
    Super,
}

impl Modifier {
    /// Rendering order used by [`Keystroke`]'s `Display`.
    pub const ALL: [Modifier; 4] = [Modifier::Ctrl, Modifier::Alt, Modifier::Shift, Modifier::Super];

    pub fn flag(self) -> ModifierSet {
        match self {
            Modifier::Ctrl => ModifierSet::CTRL,
            Modifier::Alt => ModifierSet::ALT,
            Modifier::Shift => ModifierSet::SHIFT,
            Modifier::Super => ModifierSet::SUPER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Modifier::Ctrl => "Ctrl",
            Modifier::Alt => "Alt",
            Modifier::Shift => "Shift",
            Modifier::Super => "Super",
        }
    }
}

bitflags! {
    /// Set of modifiers held while a key goes down.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModifierSet: u8 {
        const CTRL = 1 << 0;
        const ALT = 1 << 1;
        const SHIFT = 1 << 2;
        const SUPER = 1 << 3;
    }
}

impl ModifierSet {
    pub fn modifiers(self) -> impl Iterator<Item = Modifier> {
        Modifier::ALL
            .into_iter()
            .filter(move |modifier| self.contains(modifier.flag()))
    }
}

impl From<Modifier> for ModifierSet {
    fn from(modifier: Modifier) -> Self {
        modifier.flag()
    }
}

/// A key after left/right modifier variants have been folded together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    Modifier(Modifier),
    Key(Key),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// One normalized key transition, as emitted by the normalizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyEvent {
    Press(LogicalKey),
    Release(LogicalKey),
}

impl KeyEvent {
    pub fn key(&self) -> LogicalKey {
        match self {
            KeyEvent::Press(k) | KeyEvent::Release(k) => *k,
        }
    }

    pub fn state(&self) -> KeyState {
        match self {
            KeyEvent::Press(_) => KeyState::Pressed,
            KeyEvent::Release(_) => KeyState::Released,
        }
    }
}

/// A non-modifier key together with the modifiers that were active when it went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub key: Key,
    pub modifiers: ModifierSet,
}

impl Keystroke {
    pub fn new(key: Key, modifiers: ModifierSet) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, ModifierSet::empty())
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in self.modifiers.modifiers() {
            write!(f, "{}+", modifier.name())?;
        }
        write_key_name(f, self.key)
    }
}

impl Serialize for Keystroke {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn write_key_name(f: &mut fmt::Formatter<'_>, key: Key) -> fmt::Result {
    let name = match key {
        Key::KeyA => "A",
        Key::KeyB => "B",
        Key::KeyC => "C",
        Key::KeyD => "D",
        Key::KeyE => "E",
        Key::KeyF => "F",
        Key::KeyG => "G",
        Key::KeyH => "H",
        Key::KeyI => "I",
        Key::KeyJ => "J",
        Key::KeyK => "K",
        Key::KeyL => "L",
        Key::KeyM => "M",
        Key::KeyN => "N",
        Key::KeyO => "O",
        Key::KeyP => "P",
        Key::KeyQ => "Q",
        Key::KeyR => "R",
        Key::KeyS => "S",
        Key::KeyT => "T",
        Key::KeyU => "U",
        Key::KeyV => "V",
        Key::KeyW => "W",
        Key::KeyX => "X",
        Key::KeyY => "Y",
        Key::KeyZ => "Z",
        Key::Num0 => "0",
        Key::Num1 => "1",
        Key::Num2 => "2",
        Key::Num3 => "3",
        Key::Num4 => "4",
        Key::Num5 => "5",
        Key::Num6 => "6",
        Key::Num7 => "7",
        Key::Num8 => "8",
        Key::Num9 => "9",
        Key::Return => "Enter",
        Key::Unknown(code) => return write!(f, "Unknown({})", code),
        other => return write!(f, "{:?}", other),
    };
    f.write_str(name)
}

/// An ordered, non-empty sequence of keystrokes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chord(Vec<Keystroke>);

impl Chord {
    pub fn single(keystroke: Keystroke) -> Self {
        Self(vec![keystroke])
    }

    pub fn keys(&self) -> &[Keystroke] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<Keystroke>> for Chord {
    type Error = MatcherError;

    fn try_from(keys: Vec<Keystroke>) -> Result<Self, Self::Error> {
        if keys.is_empty() {
            return Err(MatcherError::EmptyChord);
        }
        Ok(Self(keys))
    }
}

impl From<Keystroke> for Chord {
    fn from(keystroke: Keystroke) -> Self {
        Self::single(keystroke)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&chord_name(&self.0))
    }
}

/// Human-readable name of a keystroke sequence, e.g. `Ctrl+K, Ctrl+C`.
pub fn chord_name(keys: &[Keystroke]) -> String {
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Metadata handed to actions and to trigger/release notifications.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotkeyEvent {
    pub keys: Vec<Keystroke>,
    pub chord_name: String,
    pub count: u32,
    pub consecutive_count: u32,
    pub modifier_envelope_count: Option<u32>,
    pub description: Option<String>,
    pub follow_up: bool,
    pub continuously: bool,
}
