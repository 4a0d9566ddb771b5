use anyhow::{Context, Result};
use chord_replay::ReplayApp;
use config::Config;
use std::fs::File;
use std::io::{self, BufReader};

fn main() {
    let config = Config::initialize();

    chord_log::init(config.debug);

    log::debug!("Configuration: {:?}", config);

    if let Err(e) = run(&config) {
        let error_chain = e
            .chain()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(": ");

        eprintln!("Error: {}", error_chain);
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    let mut app = ReplayApp::new(config)?;
    let stdout = io::stdout();
    let mut output = stdout.lock();

    let summary = match &config.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            app.run(BufReader::new(file), &mut output)?
        }
        None => app.run(io::stdin().lock(), &mut output)?,
    };

    log::info!(
        "Replayed {} key events: {} triggers, {} handled",
        summary.events,
        summary.triggers,
        summary.handled
    );
    Ok(())
}
