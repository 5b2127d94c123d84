#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` turns the number of `-v` flags given to `crcsig` into a
//! [`VerbosityConfig`] and installs a `tracing` subscriber that writes
//! diagnostics to stderr.
//!
//! # Design
//!
//! Library crates only emit `tracing` events; this crate owns the subscriber.
//! `RUST_LOG` takes precedence over the verbosity flags so individual modules
//! can be traced without rebuilding.
//!
//! # Examples
//!
//! ```
//! use logging::{VerbosityConfig, build_filter};
//! use tracing::level_filters::LevelFilter;
//!
//! let config = VerbosityConfig::from_verbose_level(1);
//! let filter = build_filter(config, None);
//! assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
//! ```

mod config;
mod tracing_bridge;

pub use config::{MAX_VERBOSE_LEVEL, VerbosityConfig};
pub use tracing_bridge::{build_filter, env_filter, init_tracing, subscriber};
