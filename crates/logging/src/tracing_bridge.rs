//! crates/logging/src/tracing_bridge.rs
//! Subscriber setup bridging `tracing` events to stderr.
//!
//! Events are rendered by the `tracing_subscriber::fmt` layer. Filtering honours
//! `RUST_LOG` when it is set and otherwise falls back to the level selected by
//! [`VerbosityConfig`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{VerbosityConfig, init_tracing};
//!
//! let config = VerbosityConfig::from_verbose_level(2);
//! init_tracing(config)?;
//!
//! tracing::debug!(blocks = 3, "planned windows");
//! ```

use std::env;
use std::io::{self, IsTerminal};

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use super::config::VerbosityConfig;

/// Builds a filter from `directives`, falling back to the verbosity level.
///
/// Directives use the `RUST_LOG` syntax. Unparseable directives are ignored.
#[must_use]
pub fn build_filter(config: VerbosityConfig, directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(config.level_filter().into())
        .parse_lossy(directives.unwrap_or_default())
}

/// Builds a filter from the `RUST_LOG` environment variable.
#[must_use]
pub fn env_filter(config: VerbosityConfig) -> EnvFilter {
    let directives = env::var(EnvFilter::DEFAULT_ENV).ok();
    build_filter(config, directives.as_deref())
}

/// Returns a subscriber that renders filtered events into `writer`.
pub fn subscriber<W>(filter: EnvFilter, writer: W, ansi: bool) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_target(false),
    )
}

/// Installs the global subscriber writing to stderr.
///
/// Returns an error when a global subscriber is already installed; callers
/// that may initialise more than once can ignore it.
pub fn init_tracing(config: VerbosityConfig) -> Result<(), TryInitError> {
    subscriber(env_filter(config), io::stderr, io::stderr().is_terminal()).try_init()
}
