//! Logging bootstrap and span constructors.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the default `info`.
///
/// Set `SLIRCBOT_LOG_FORMAT=json` for one JSON object per line.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("SLIRCBOT_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};

    /// Span wrapping one network's connection task.
    pub fn network(name: &str) -> Span {
        info_span!("network", name = %name)
    }

    /// Span for the supervisor's lifetime.
    pub fn supervisor(config_path: &str) -> Span {
        info_span!("supervisor", config = %config_path)
    }
}
