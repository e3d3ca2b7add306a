//! crates/logging/src/tracing_init.rs
//! Global subscriber installation.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::TryInitError;

use crate::VerbosityConfig;

/// Builds the filter for `config`, letting `RUST_LOG` take precedence when set.
#[must_use]
pub fn env_filter(config: &VerbosityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(config.level_filter().into())
            .parse_lossy(config.directive())
    })
}

/// Installs a formatting subscriber writing to stderr.
///
/// Fails if a global subscriber has already been installed.
pub fn init_tracing(config: &VerbosityConfig) -> Result<(), TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init()
}
