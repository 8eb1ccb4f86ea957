use crate::config::base_dir;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global subscriber. Diagnostics always go to the rolling log
/// file and, with `to_stderr`, to stderr as well. Keep the returned guard
/// alive until exit so buffered lines are flushed.
pub fn init_logging(component: &str, to_stderr: bool) -> WorkerGuard {
    let log_dir = base_dir().join("logs");
    let _ = std::fs::create_dir_all(&log_dir);

    // One file per component and day under <home>/logs
    let file_appender = tracing_appender::rolling::daily(&log_dir, component);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    // Report output goes to stdout, so diagnostics stay on stderr
    if to_stderr {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);
        registry.with(stderr_layer).init();
    } else {
        registry.init();
    }

    guard
}
