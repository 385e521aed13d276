//! Logging and tracing configuration
//!
//! Console logs go to stderr. A `run` additionally mirrors everything into a
//! plain-text log file next to the results file.

use std::fs::File;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("matrix_bench=info,warn"))
}

/// Initialize tracing for commands that only log to the console
///
/// Logs are controlled by the `RUST_LOG` environment variable.
/// Default level is INFO for this crate, WARN for dependencies.
pub fn init_cli() {
    tracing_subscriber::registry()
        .with(default_filter())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// Initialize tracing for a benchmark run (stderr + log file)
///
/// The returned guard flushes the file writer on drop and must be held
/// until the run finishes.
pub fn init_run(log_file: File) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(log_file);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(default_filter())
        .with(file_layer)
        .with(stderr_layer)
        .init();

    guard
}
