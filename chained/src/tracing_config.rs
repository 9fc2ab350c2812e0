//! Log subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise the number of `-v` flags picks the
//! level (`warn`, `info`, `debug`, then `trace`). Output goes to stderr so it
//! never mixes with generated code printed by `--dry-run` or `--json`.

use tracing_subscriber::EnvFilter;

fn level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn build_filter(verbosity: u8) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level(verbosity))
    }
}

/// Initialise the global tracing subscriber.
pub fn init_tracing(verbosity: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_verbosity() {
        assert_eq!(level(0), "warn");
        assert_eq!(level(1), "info");
        assert_eq!(level(2), "debug");
        assert_eq!(level(7), "trace");
    }
}
