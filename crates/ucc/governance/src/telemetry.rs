//! Tracing initialization

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{GovernanceError, Result};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `config.level`. Fails if a global subscriber is
/// already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    let installed = if config.json {
        let fmt_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        subscriber.with(fmt_layer).try_init()
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false);
        subscriber.with(fmt_layer).try_init()
    };

    installed.map_err(|e| GovernanceError::Tracing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_fails() {
        let config = LoggingConfig {
            level: "debug".into(),
            json: true,
        };
        // another test in this binary may have installed one already
        let _ = init_tracing(&config);
        assert!(matches!(init_tracing(&config), Err(GovernanceError::Tracing(_))));
    }
}
