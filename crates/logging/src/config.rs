//! crates/logging/src/config.rs
//! Verbosity configuration derived from repeated `-v` flags.

use tracing::level_filters::LevelFilter;

/// Highest verbose level with a distinct meaning; larger counts are clamped.
pub const MAX_VERBOSE_LEVEL: u8 = 3;

/// Diagnostic verbosity selected on the command line.
///
/// | level | events shown            |
/// |-------|-------------------------|
/// | 0     | warnings and errors     |
/// | 1     | plus `info`             |
/// | 2     | plus `debug`            |
/// | 3+    | everything (`trace`)    |
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct VerbosityConfig {
    level: u8,
}

impl VerbosityConfig {
    /// Creates a configuration from the number of `-v` flags.
    #[must_use]
    pub const fn from_verbose_level(level: u8) -> Self {
        let level = if level > MAX_VERBOSE_LEVEL {
            MAX_VERBOSE_LEVEL
        } else {
            level
        };
        Self { level }
    }

    /// Returns the clamped verbose level.
    #[inline]
    #[must_use]
    pub const fn verbose_level(&self) -> u8 {
        self.level
    }

    /// Returns the most verbose level of event that is recorded.
    #[must_use]
    pub const fn level_filter(&self) -> LevelFilter {
        match self.level {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}
