use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber for a loop run.
///
/// `directives` is an `EnvFilter` string such as `"info"` or
/// `"taskloop=debug,reqwest=warn"`; a malformed one falls back to `info`.
/// Console output omits targets. With `with_file`, the same events also go
/// uncolored to `logs/taskloop.log`, rotated daily.
pub fn init_logging(directives: &str, with_file: bool) {
    let stdout_layer = fmt::layer().with_target(false).with_line_number(true);
    let file_layer = with_file.then(|| {
        fmt::layer()
            .with_ansi(false)
            .with_line_number(true)
            .with_writer(RollingFileAppender::new(
                Rotation::DAILY,
                "logs",
                "taskloop.log",
            ))
    });

    tracing_subscriber::registry()
        .with(loop_filter(directives))
        .with(stdout_layer)
        .with(file_layer)
        .init();
}

fn loop_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| {
        eprintln!("Invalid log level '{}', defaulting to 'info'", directives);
        EnvFilter::new("info")
    })
}
