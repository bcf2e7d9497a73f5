//! Tracing subscriber setup for the command-line tool.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Returns the default filter directive for a verbosity level.
///
/// Negative levels are quiet, zero shows warnings, and each step above
/// zero adds one level of detail.
#[must_use]
pub const fn default_directive(verbosity: i8) -> &'static str {
    match verbosity {
        i8::MIN..=-1 => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs a stderr subscriber.
///
/// `RUST_LOG` takes precedence over `verbosity`. Returns false if a
/// global subscriber was already installed.
pub fn init_tracing(verbosity: i8) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity > 1)
                .with_level(true),
        )
        .with(filter)
        .try_init()
        .is_ok()
}
