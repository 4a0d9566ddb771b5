use chord_matcher::{parse_binding, Chord, ParseError};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

static CONFIG: OnceLock<Arc<Config>> = OnceLock::new();

/// Registered when no binding is configured.
pub const DEFAULT_BINDINGS: &[&str] = &["Ctrl+K, Ctrl+C = copy", "Ctrl+S = save"];

#[derive(Parser, Debug, Clone)]
#[command(name = "chord-replay")]
#[command(about = "Replays a scripted key stream through the chord engine", long_about = None)]
#[command(version)]
pub struct Config {
    #[arg(short = 'd', long, env = "CHORD_DEBUG", help = "Enable debug logging")]
    pub debug: bool,

    #[arg(
        short = 'b',
        long = "bind",
        env = "CHORD_BINDINGS",
        value_delimiter = ';',
        required = false,
        help = "Chord to register, e.g. \"Ctrl+K, Ctrl+C = copy\". Separate several with ';'"
    )]
    pub bindings: Vec<String>,

    #[arg(
        short = 's',
        long,
        env = "CHORD_SCRIPT",
        help = "Replay script to read instead of stdin"
    )]
    pub script: Option<PathBuf>,

    #[arg(long, env = "CHORD_JSON", help = "Print notifications as JSON lines")]
    pub json: bool,

    #[arg(
        long,
        env = "CHORD_UNHANDLED",
        help = "Register actions that leave key events unhandled"
    )]
    pub unhandled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Reads `.env` and `.env.local`, then parses the process arguments.
    pub fn new() -> Self {
        let _ = dotenv::dotenv();
        let _ = dotenv::from_filename(".env.local");

        Config::parse().with_defaults()
    }

    /// Parses `args` (program name first) without touching the environment files.
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Config::try_parse_from(args).map(Config::with_defaults)
    }

    pub fn new_for_test(bindings: Vec<String>) -> Self {
        Config {
            debug: false,
            bindings,
            script: None,
            json: false,
            unhandled: false,
        }
        .with_defaults()
    }

    fn with_defaults(mut self) -> Self {
        self.bindings.retain(|binding| !binding.trim().is_empty());
        if self.bindings.is_empty() {
            self.bindings = DEFAULT_BINDINGS.iter().map(|b| b.to_string()).collect();
        }
        self
    }

    pub fn initialize() -> Arc<Config> {
        let config = Arc::new(Config::new());
        if CONFIG.set(config.clone()).is_err() {
            log::error!("Config already initialized - keeping the first one");
        }
        Config::global()
    }

    pub fn global() -> Arc<Config> {
        #[cfg(test)]
        {
            CONFIG
                .get()
                .cloned()
                .unwrap_or_else(|| Arc::new(Config::new_for_test(Vec::new())))
        }

        #[cfg(not(test))]
        {
            CONFIG.get().cloned().unwrap_or_else(|| {
                log::error!("Config not initialized, using default");
                Arc::new(Config::new())
            })
        }
    }

    /// Parses every configured binding into a chord and its optional description.
    pub fn chord_bindings(&self) -> Result<Vec<(Chord, Option<String>)>, ParseError> {
        self.bindings
            .iter()
            .map(|binding| parse_binding(binding))
            .collect()
    }

    /// Actions registered from this configuration mark their key events as handled.
    pub fn handled(&self) -> bool {
        !self.unhandled
    }
}
