use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::model::config::LogConfig;

/// Environment variable that overrides `[log] filter`
pub const LOG_ENV: &str = "SHAREDO_LOG";

/// `SHAREDO_LOG` if set and valid, otherwise the configured filter.
pub fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.filter))
}

/// Install the stderr subscriber. A second call is a no-op.
pub fn init(config: &LogConfig) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
