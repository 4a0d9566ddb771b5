use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatcherError {
    #[error("Two actions on the same chord have to differ in the description. chord: {chord}, description: {description:?}")]
    DuplicateAction {
        chord: String,
        description: Option<String>,
    },
    #[error("None of the actions for the hotkey '{chord}' has the description '{description}'")]
    ActionNotFound { chord: String, description: String },
    #[error("A chord needs at least one keystroke")]
    EmptyChord,
    #[error(transparent)]
    Trie(#[from] TrieError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrieError {
    #[error("Path already present, can't add the same path twice")]
    DuplicatePath,
    #[error("Paths need at least one key")]
    EmptyPath,
}
