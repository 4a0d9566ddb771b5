mod config;

pub use config::{Config, DEFAULT_BINDINGS};
