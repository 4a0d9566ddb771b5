use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static LOGGER_INIT: Once = Once::new();

/// Filter used when `RUST_LOG` is not set.
pub fn default_directive(debug: bool) -> String {
    let base_level = if debug { "debug" } else { "info" };
    format!("{},rdev=warn", base_level)
}

/// Installs the global subscriber and routes `log` records into it. Output goes to stderr so
/// that stdout stays reserved for notifications. Only the first call has an effect.
pub fn init(debug: bool) {
    LOGGER_INIT.call_once(|| {
        let filter_directive = default_directive(debug);

        let _ = tracing_log::LogTracer::init();

        let subscriber = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .without_time()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_level(true)
                    .compact(),
            )
            .with(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(&filter_directive)),
            );

        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
