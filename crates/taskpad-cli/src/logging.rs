//! Logging setup: stderr plus a daily-rolling file in the data directory.

use std::io;
use std::path::Path;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_PREFIX: &str = "taskpad.log";

/// Initialize the tracing subscriber for logging.
///
/// Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug).
/// The file layer is skipped if the log directory cannot be created.
pub fn init_tracing(log_dir: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,hyper=warn,reqwest=warn"));

    let file_layer = log_dir
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
        .map(|dir| {
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
        });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .try_init();
}
