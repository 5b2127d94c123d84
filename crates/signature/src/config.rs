//! crates/signature/src/config.rs
//!
//! Run parameters shared by both engines.

use std::num::NonZeroUsize;
use std::thread;

use crate::error::ConfigError;
use crate::layout::{DEFAULT_BLOCK_SIZE, validate_block_size};

/// Blocks the stream engine may hold in flight per worker.
const IN_FLIGHT_PER_WORKER: NonZeroUsize = NonZeroUsize::MIN.saturating_add(1);

/// Returns the hardware parallelism reported by the platform, falling back to 1.
#[must_use]
pub fn available_parallelism() -> NonZeroUsize {
    thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}

/// Parameters for a signature run.
///
/// Parallelism is injected rather than read from the machine inside the engines
/// so that runs are reproducible under test.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SignatureConfig {
    block_size: u64,
    parallelism: NonZeroUsize,
    queue_depth: Option<NonZeroUsize>,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            parallelism: available_parallelism(),
            queue_depth: None,
        }
    }
}

impl SignatureConfig {
    /// Creates a configuration with 1 MiB blocks and the machine's parallelism.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the block size in bytes.
    #[must_use]
    pub fn with_block_size(mut self, block_size: u64) -> Self {
        self.block_size = block_size;
        self
    }

    /// Sets the hardware parallelism `P`.
    #[must_use]
    pub fn with_parallelism(mut self, parallelism: NonZeroUsize) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Caps the number of blocks the stream engine keeps in flight.
    #[must_use]
    pub fn with_queue_depth(mut self, depth: NonZeroUsize) -> Self {
        self.queue_depth = Some(depth);
        self
    }

    /// Returns the block size in bytes.
    #[inline]
    #[must_use]
    pub const fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Returns the hardware parallelism `P`.
    #[inline]
    #[must_use]
    pub const fn parallelism(&self) -> NonZeroUsize {
        self.parallelism
    }

    /// Returns the stream engine's in-flight cap, `2 * P` unless overridden.
    #[must_use]
    pub fn queue_depth(&self) -> NonZeroUsize {
        self.queue_depth
            .unwrap_or_else(|| self.parallelism.saturating_mul(IN_FLIGHT_PER_WORKER))
    }

    /// Checks the parameters before any I/O is attempted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_block_size(self.block_size)
    }
}
