pub mod app;
pub mod output;
pub mod script;

pub use app::{ReplayApp, ReplaySummary};
pub use output::render;
pub use script::{parse_line, parse_script, ScriptCommand, ScriptError};
