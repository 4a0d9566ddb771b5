use rdev::Key;
use thiserror::Error;

use crate::normalizer::canonical_key;
use crate::types::{Chord, Keystroke, LogicalKey, Modifier, ModifierSet};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Empty chord")]
    EmptyChord,
    #[error("Unknown key: {0}")]
    UnknownKey(String),
    #[error("Keystroke has no non-modifier key: {0}")]
    MissingKey(String),
    #[error("Keystroke has more than one non-modifier key: {0}")]
    MultipleKeys(String),
    #[error("Invalid binding format: {0}")]
    InvalidBinding(String),
}

/// Parses a chord such as `Ctrl+K, Ctrl+C`. Keystrokes are separated by `,`, the keys of a
/// keystroke by `+`.
pub fn parse_chord(input: &str) -> Result<Chord, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::EmptyChord);
    }

    let keystrokes = input
        .split(',')
        .map(parse_keystroke)
        .collect::<Result<Vec<_>, _>>()?;

    Chord::try_from(keystrokes).map_err(|_| ParseError::EmptyChord)
}

pub fn parse_keystroke(input: &str) -> Result<Keystroke, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::EmptyChord);
    }

    let mut modifiers = ModifierSet::empty();
    let mut key = None;

    for name in input.split('+').map(str::trim) {
        if let Some(modifier) = parse_modifier(name) {
            modifiers |= modifier.flag();
            continue;
        }

        match canonical_key(parse_raw_key(name)?) {
            Some(LogicalKey::Modifier(modifier)) => modifiers |= modifier.flag(),
            Some(LogicalKey::Key(parsed)) => {
                if key.replace(parsed).is_some() {
                    return Err(ParseError::MultipleKeys(input.to_string()));
                }
            }
            None => return Err(ParseError::UnknownKey(name.to_string())),
        }
    }

    key.map(|key| Keystroke::new(key, modifiers))
        .ok_or_else(|| ParseError::MissingKey(input.to_string()))
}

/// Parses `chord [= description]`.
pub fn parse_binding(input: &str) -> Result<(Chord, Option<String>), ParseError> {
    let (chord, description) = match input.split_once('=') {
        Some((chord, description)) => {
            let description = description.trim();
            if description.is_empty() {
                return Err(ParseError::InvalidBinding(input.to_string()));
            }
            (chord, Some(description.to_string()))
        }
        None => (input, None),
    };

    Ok((parse_chord(chord)?, description))
}

/// Parses several `;`-separated bindings, skipping empty entries.
pub fn parse_multiple_bindings(input: &str) -> Result<Vec<(Chord, Option<String>)>, ParseError> {
    input
        .split(';')
        .map(str::trim)
        .filter(|binding| !binding.is_empty())
        .map(parse_binding)
        .collect()
}

fn parse_modifier(name: &str) -> Option<Modifier> {
    match name.to_ascii_lowercase().as_str() {
        "ctrl" | "control" => Some(Modifier::Ctrl),
        "shift" => Some(Modifier::Shift),
        "alt" | "option" => Some(Modifier::Alt),
        "super" | "meta" | "cmd" | "command" | "win" | "windows" => Some(Modifier::Super),
        _ => None,
    }
}

/// Parses the name of a physical key, e.g. `ControlLeft`, `KeyA`, `A` or `F5`.
pub fn parse_raw_key(name: &str) -> Result<Key, ParseError> {
    let key = match name.trim().to_ascii_lowercase().as_str() {
        "commandleft" | "metaleft" => Key::MetaLeft,
        "commandright" | "metaright" => Key::MetaRight,
        "controlleft" => Key::ControlLeft,
        "controlright" => Key::ControlRight,
        "shiftleft" => Key::ShiftLeft,
        "shiftright" => Key::ShiftRight,
        "alt" | "altleft" => Key::Alt,
        "altgr" | "altright" => Key::AltGr,

        "keya" | "a" => Key::KeyA,
        "keyb" | "b" => Key::KeyB,
        "keyc" | "c" => Key::KeyC,
        "keyd" | "d" => Key::KeyD,
        "keye" | "e" => Key::KeyE,
        "keyf" | "f" => Key::KeyF,
        "keyg" | "g" => Key::KeyG,
        "keyh" | "h" => Key::KeyH,
        "keyi" | "i" => Key::KeyI,
        "keyj" | "j" => Key::KeyJ,
        "keyk" | "k" => Key::KeyK,
        "keyl" | "l" => Key::KeyL,
        "keym" | "m" => Key::KeyM,
        "keyn" | "n" => Key::KeyN,
        "keyo" | "o" => Key::KeyO,
        "keyp" | "p" => Key::KeyP,
        "keyq" | "q" => Key::KeyQ,
        "keyr" | "r" => Key::KeyR,
        "keys" | "s" => Key::KeyS,
        "keyt" | "t" => Key::KeyT,
        "keyu" | "u" => Key::KeyU,
        "keyv" | "v" => Key::KeyV,
        "keyw" | "w" => Key::KeyW,
        "keyx" | "x" => Key::KeyX,
        "keyy" | "y" => Key::KeyY,
        "keyz" | "z" => Key::KeyZ,

        "num0" | "0" => Key::Num0,
        "num1" | "1" => Key::Num1,
        "num2" | "2" => Key::Num2,
        "num3" | "3" => Key::Num3,
        "num4" | "4" => Key::Num4,
        "num5" | "5" => Key::Num5,
        "num6" | "6" => Key::Num6,
        "num7" | "7" => Key::Num7,
        "num8" | "8" => Key::Num8,
        "num9" | "9" => Key::Num9,

        "f1" => Key::F1,
        "f2" => Key::F2,
        "f3" => Key::F3,
        "f4" => Key::F4,
        "f5" => Key::F5,
        "f6" => Key::F6,
        "f7" => Key::F7,
        "f8" => Key::F8,
        "f9" => Key::F9,
        "f10" => Key::F10,
        "f11" => Key::F11,
        "f12" => Key::F12,

        "escape" | "esc" => Key::Escape,
        "space" => Key::Space,
        "return" | "enter" => Key::Return,
        "tab" => Key::Tab,
        "backspace" => Key::Backspace,
        "delete" | "del" => Key::Delete,
        "insert" => Key::Insert,
        "home" => Key::Home,
        "end" => Key::End,
        "pageup" => Key::PageUp,
        "pagedown" => Key::PageDown,
        "uparrow" | "up" => Key::UpArrow,
        "downarrow" | "down" => Key::DownArrow,
        "leftarrow" | "left" => Key::LeftArrow,
        "rightarrow" | "right" => Key::RightArrow,
        "capslock" => Key::CapsLock,
        "printscreen" => Key::PrintScreen,
        "scrolllock" => Key::ScrollLock,
        "pause" => Key::Pause,
        "numlock" => Key::NumLock,
        "function" | "fn" => Key::Function,

        "backquote" => Key::BackQuote,
        "minus" => Key::Minus,
        "equal" => Key::Equal,
        "leftbracket" => Key::LeftBracket,
        "rightbracket" => Key::RightBracket,
        "semicolon" => Key::SemiColon,
        "quote" => Key::Quote,
        "backslash" => Key::BackSlash,
        "intlbackslash" => Key::IntlBackslash,
        "comma" => Key::Comma,
        "dot" => Key::Dot,
        "slash" => Key::Slash,

        "kpreturn" => Key::KpReturn,
        "kpminus" => Key::KpMinus,
        "kpplus" => Key::KpPlus,
        "kpmultiply" => Key::KpMultiply,
        "kpdivide" => Key::KpDivide,
        "kpdelete" => Key::KpDelete,
        "kp0" => Key::Kp0,
        "kp1" => Key::Kp1,
        "kp2" => Key::Kp2,
        "kp3" => Key::Kp3,
        "kp4" => Key::Kp4,
        "kp5" => Key::Kp5,
        "kp6" => Key::Kp6,
        "kp7" => Key::Kp7,
        "kp8" => Key::Kp8,
        "kp9" => Key::Kp9,

        _ => return Err(ParseError::UnknownKey(name.to_string())),
    };
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_keystroke() {
        assert_eq!(
            parse_chord("Ctrl+A").unwrap().keys(),
            &[Keystroke::new(Key::KeyA, ModifierSet::CTRL)]
        );
    }

    #[test]
    fn test_parse_multi_keystroke_chord() {
        let chord = parse_chord("ctrl+k, Control+Shift+c").unwrap();
        assert_eq!(
            chord.keys(),
            &[
                Keystroke::new(Key::KeyK, ModifierSet::CTRL),
                Keystroke::new(Key::KeyC, ModifierSet::CTRL | ModifierSet::SHIFT),
            ]
        );
    }

    #[test]
    fn test_sided_modifier_names_fold() {
        assert_eq!(
            parse_keystroke("ControlRight+AltGr+F5").unwrap(),
            Keystroke::new(Key::F5, ModifierSet::CTRL | ModifierSet::ALT)
        );
        assert_eq!(
            parse_keystroke("Cmd+Space").unwrap(),
            Keystroke::new(Key::Space, ModifierSet::SUPER)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_chord("  "), Err(ParseError::EmptyChord));
        assert_eq!(parse_chord("Ctrl+A,"), Err(ParseError::EmptyChord));
        assert_eq!(
            parse_chord("Ctrl+Shift"),
            Err(ParseError::MissingKey("Ctrl+Shift".to_string()))
        );
        assert_eq!(
            parse_chord("A+B"),
            Err(ParseError::MultipleKeys("A+B".to_string()))
        );
        assert_eq!(
            parse_chord("Ctrl+Banana"),
            Err(ParseError::UnknownKey("Banana".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips() {
        for text in [
            "Ctrl+K, Ctrl+C",
            "Ctrl+Alt+Shift+Super+F12",
            "Escape",
            "Shift+Enter, 1, Kp7",
            "Alt+UpArrow, Super+SemiColon",
        ] {
            assert_eq!(parse_chord(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_parse_binding() {
        let (chord, description) = parse_binding("Ctrl+K, Ctrl+C = copy line").unwrap();
        assert_eq!(chord.to_string(), "Ctrl+K, Ctrl+C");
        assert_eq!(description.as_deref(), Some("copy line"));

        let (chord, description) = parse_binding("Ctrl+S").unwrap();
        assert_eq!(chord.to_string(), "Ctrl+S");
        assert_eq!(description, None);

        assert_eq!(
            parse_binding("Ctrl+S ="),
            Err(ParseError::InvalidBinding("Ctrl+S =".to_string()))
        );
    }

    #[test]
    fn test_parse_multiple_bindings() {
        let bindings = parse_multiple_bindings("Ctrl+A = all; ; Ctrl+K, Ctrl+C").unwrap();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].1.as_deref(), Some("all"));
        assert_eq!(bindings[1].0.len(), 2);
    }

    #[test]
    fn test_parse_raw_key() {
        assert_eq!(parse_raw_key("ControlLeft"), Ok(Key::ControlLeft));
        assert_eq!(parse_raw_key("KeyA"), Ok(Key::KeyA));
        assert_eq!(parse_raw_key("a"), Ok(Key::KeyA));
        assert_eq!(parse_raw_key("F1"), Ok(Key::F1));
        assert_eq!(
            parse_raw_key("Ctrl"),
            Err(ParseError::UnknownKey("Ctrl".to_string()))
        );
    }
}
