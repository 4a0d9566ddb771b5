mod error;
mod handler;
mod history;
mod matcher;
mod normalizer;
mod trie;
mod types;

pub mod engine;
pub mod parser;

pub use engine::HotkeyEngine;
pub use error::{MatcherError, TrieError};
pub use handler::{ChannelListener, ChordListener, Notification};
pub use history::{BoundedHistory, HistorySlot};
pub use matcher::{ChordMatcher, HotkeyAction};
pub use normalizer::{canonical_key, KeyEventNormalizer};
pub use parser::{
    parse_binding, parse_chord, parse_keystroke, parse_multiple_bindings, parse_raw_key,
    ParseError,
};
pub use trie::{ChordTrie, LookupStatus};
pub use types::{
    chord_name, Chord, HotkeyEvent, KeyEvent, KeyState, Keystroke, LogicalKey, Modifier,
    ModifierSet,
};

pub use rdev::Key;
