use crate::output::render;
use crate::script::{parse_line, ScriptCommand};
use anyhow::{Context, Result};
use chord_matcher::{ChannelListener, HotkeyEngine, HotkeyEvent, KeyState, Notification};
use config::Config;
use crossbeam_channel::{unbounded, Receiver};
use log::{debug, info};
use std::io::{BufRead, Write};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub handled: usize,
    pub triggers: usize,
}

/// Registers the configured bindings and feeds replay scripts through a [`HotkeyEngine`].
pub struct ReplayApp {
    engine: HotkeyEngine,
    notifications: Receiver<Notification>,
    json: bool,
}

impl ReplayApp {
    pub fn new(config: &Config) -> Result<Self> {
        let (sender, receiver) = unbounded();
        let mut engine = HotkeyEngine::new();
        engine.subscribe(ChannelListener::new(sender));

        let bindings = config
            .chord_bindings()
            .context("Invalid hotkey binding")?;

        for (chord, description) in bindings {
            let label = description.clone().unwrap_or_else(|| chord.to_string());
            let action = move |event: &HotkeyEvent| -> Result<()> {
                info!("Running '{}' (count {})", label, event.count);
                Ok(())
            };

            engine
                .register_hotkey_with(&chord, action, description.as_deref(), config.handled())
                .with_context(|| format!("Failed to register hotkey '{}'", chord))?;
        }

        info!("{}", engine.matcher().hotkey_description());

        Ok(Self {
            engine,
            notifications: receiver,
            json: config.json,
        })
    }

    pub fn engine(&self) -> &HotkeyEngine {
        &self.engine
    }

    /// Replays `input` line by line, writing one line per notification to `output`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> Result<ReplaySummary> {
        let mut summary = ReplaySummary::default();

        for (index, line) in input.lines().enumerate() {
            let line_number = index + 1;
            let line =
                line.with_context(|| format!("Failed to read script line {}", line_number))?;

            let Some(command) = parse_line(line_number, &line)? else {
                continue;
            };

            for _ in 0..command.times {
                let handled = self
                    .apply(command)
                    .with_context(|| format!("Action failed on script line {}", line_number))?;
                summary.events += 1;
                if handled {
                    summary.handled += 1;
                }
                summary.triggers += self.flush(output)?;
            }
        }

        debug!("Replay finished: {:?}", summary);
        Ok(summary)
    }

    fn apply(&mut self, command: ScriptCommand) -> Result<bool> {
        match command.state {
            KeyState::Pressed => self.engine.on_raw_key_down(command.key),
            KeyState::Released => self.engine.on_raw_key_up(command.key),
        }
    }

    /// Writes pending notifications, returning how many were triggers.
    fn flush<W: Write>(&self, output: &mut W) -> Result<usize> {
        let mut triggers = 0;
        for notification in self.notifications.try_iter() {
            if matches!(notification, Notification::HotkeyTriggered(_)) {
                triggers += 1;
            }
            let line = render(&notification, self.json).context("Failed to render notification")?;
            writeln!(output, "{}", line).context("Failed to write output")?;
        }
        Ok(triggers)
    }
}
