//! Tracing subscriber setup for pharmit binaries.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter directive for a `-v` count. `None` defers to `RUST_LOG` (default `warn`).
pub fn verbosity_directive(verbosity: u8) -> Option<&'static str> {
    match verbosity {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

fn env_filter(verbosity: u8) -> EnvFilter {
    match verbosity_directive(verbosity) {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    }
}

/// Installs the global subscriber writing to stderr.
///
/// `json` selects one JSON object per event instead of the compact text format.
/// Returns `false` if a subscriber was already installed.
pub fn init_logging(verbosity: u8, json: bool) -> bool {
    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| {
        fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(env_filter(verbosity))
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_directive() {
        assert_eq!(verbosity_directive(0), None);
        assert_eq!(verbosity_directive(1), Some("info"));
        assert_eq!(verbosity_directive(2), Some("debug"));
        assert_eq!(verbosity_directive(7), Some("trace"));
    }

    #[test]
    fn test_second_init_is_refused() {
        init_logging(0, false);
        assert!(!init_logging(2, true));
    }
}
