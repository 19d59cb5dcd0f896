//! Global tracing subscriber for processes embedding Lethe.
//!
//! The `[telemetry]` config section picks the default level and the output
//! format. `RUST_LOG` still wins over the configured level when set.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::TelemetryConfig;

/// Install the global subscriber described by `config`.
///
/// Returns `false` when a global subscriber was already installed, in which
/// case the call has no effect.
pub fn init_tracing(config: &TelemetryConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level().as_str()));

    // Exactly one of the two layers is present.
    let (json, text) = if config.json {
        (Some(fmt::layer().json().with_current_span(true)), None)
    } else {
        (None, Some(fmt::layer().compact()))
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(json = config.json, level = %config.level(), "tracing initialised");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialisation_is_a_no_op() {
        let config = TelemetryConfig {
            log_level: "debug".into(),
            json: true,
        };
        init_tracing(&config);
        assert!(!init_tracing(&TelemetryConfig::default()));
    }
}
