//! crates/logging/src/config.rs
//! Verbosity configuration mapped onto tracing level filters.

use tracing_subscriber::filter::LevelFilter;

/// Highest verbose level with a distinct meaning; larger values saturate.
pub const MAX_VERBOSE_LEVEL: u8 = 3;

/// Verbosity configuration for reconciliation diagnostics.
///
/// Level 0 reports warnings and errors only, level 1 adds applied changes,
/// level 2 adds the no-op decisions and level 3 enables everything.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerbosityConfig {
    level: u8,
    /// Suppress everything except errors, regardless of `level`.
    pub quiet: bool,
}

impl VerbosityConfig {
    /// Create a configuration from a verbose level, clamped to
    /// [`MAX_VERBOSE_LEVEL`].
    #[must_use]
    pub const fn from_verbose_level(level: u8) -> Self {
        let level = if level > MAX_VERBOSE_LEVEL {
            MAX_VERBOSE_LEVEL
        } else {
            level
        };
        Self {
            level,
            quiet: false,
        }
    }

    /// Create a configuration that only reports errors.
    #[must_use]
    pub const fn quiet() -> Self {
        Self {
            level: 0,
            quiet: true,
        }
    }

    /// Returns the clamped verbose level.
    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Maximum tracing level enabled by this configuration.
    #[must_use]
    pub const fn level_filter(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::ERROR;
        }
        match self.level {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Default `EnvFilter` directive for the reconciliation targets.
    #[must_use]
    pub fn directive(&self) -> String {
        format!("{}={}", crate::TARGET_ROOT, self.level_filter())
    }
}
