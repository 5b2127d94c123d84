//! crates/signature/src/error.rs
//!
//! Error taxonomy shared by the partitioner, both engines and the writer.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Exit status reported for usage and configuration problems.
pub const EXIT_INVALID_CONFIGURATION: i32 = 1;
/// Exit status reported when the input size cannot be determined.
pub const EXIT_INPUT_UNAVAILABLE: i32 = 2;
/// Exit status reported for open, read, map and write failures.
pub const EXIT_IO_FAILURE: i32 = 3;

/// Caller-supplied parameters outside their valid domain.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum ConfigError {
    /// Block size of zero bytes.
    #[error("block size must be greater than zero")]
    ZeroBlockSize,
    /// Block size that cannot be represented as an in-memory buffer.
    #[error("block size {block_size} exceeds the maximum of {max} bytes")]
    BlockSizeTooLarge {
        /// Requested block size in bytes.
        block_size: u64,
        /// Largest block size accepted.
        max: u64,
    },
    /// Worker count of zero.
    #[error("parallelism must be at least 1")]
    ZeroParallelism,
}

/// Errors returned while producing a signature file.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// Parameters were rejected before any I/O took place.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    /// The input path does not exist or its size cannot be queried.
    #[error("cannot determine size of {}: {source}", path.display())]
    InputUnavailable {
        /// Input path supplied by the caller.
        path: PathBuf,
        /// Underlying metadata failure.
        #[source]
        source: io::Error,
    },
    /// Underlying I/O failure raised while reading the input stream.
    #[error("failed to read input while generating signature: {0}")]
    Read(#[source] io::Error),
    /// A window of the input could not be mapped.
    #[error("failed to map {len} byte(s) of input at offset {offset}: {source}")]
    Map {
        /// Byte offset of the window within the input.
        offset: u64,
        /// Window length in bytes.
        len: u64,
        /// Underlying mapping failure.
        #[source]
        source: io::Error,
    },
    /// Opening, creating or writing a named file failed.
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        /// Operation that failed, e.g. `open` or `write`.
        action: &'static str,
        /// File the operation targeted.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The input length no longer matches the size recorded before the run.
    #[error("input changed during signature generation: expected {expected} byte(s), observed {observed}")]
    InputChanged {
        /// Size recorded when the layout was computed.
        expected: u64,
        /// Size observed while reading.
        observed: u64,
    },
    /// Number of blocks exceeds the platform's addressable range.
    #[error("layout describes {0} blocks which exceeds addressable memory")]
    TooManyBlocks(u64),
    /// The checksum worker pool could not be started.
    #[error("failed to start checksum workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl SignatureError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Returns the process exit status associated with the error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfiguration(_) => EXIT_INVALID_CONFIGURATION,
            Self::InputUnavailable { .. } => EXIT_INPUT_UNAVAILABLE,
            Self::Read(_)
            | Self::Map { .. }
            | Self::Io { .. }
            | Self::InputChanged { .. }
            | Self::TooManyBlocks(_)
            | Self::WorkerPool(_) => EXIT_IO_FAILURE,
        }
    }

    /// Reports whether the error was raised before any input was read.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_into_invalid_configuration() {
        let error: SignatureError = ConfigError::ZeroBlockSize.into();
        assert!(error.is_configuration());
        assert_eq!(error.exit_code(), EXIT_INVALID_CONFIGURATION);
        assert!(error.to_string().contains("greater than zero"));
    }

    #[test]
    fn input_unavailable_mentions_path() {
        let error = SignatureError::InputUnavailable {
            path: PathBuf::from("/no/such/file"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(error.exit_code(), EXIT_INPUT_UNAVAILABLE);
        assert!(error.to_string().contains("/no/such/file"));
    }

    #[test]
    fn io_failures_share_exit_status() {
        let read = SignatureError::Read(io::Error::other("boom"));
        let map = SignatureError::Map {
            offset: 4096,
            len: 8192,
            source: io::Error::other("boom"),
        };
        let write = SignatureError::io("write", "out.sig", io::Error::other("boom"));
        let changed = SignatureError::InputChanged {
            expected: 10,
            observed: 9,
        };
        for error in [read, map, write, changed] {
            assert_eq!(error.exit_code(), EXIT_IO_FAILURE, "{error}");
            assert!(!error.is_configuration());
        }
    }

    #[test]
    fn map_error_displays_window() {
        let error = SignatureError::Map {
            offset: 4096,
            len: 8192,
            source: io::Error::other("boom"),
        };
        let display = error.to_string();
        assert!(display.contains("4096"));
        assert!(display.contains("8192"));
    }

    #[test]
    fn block_size_too_large_displays_limit() {
        let error = ConfigError::BlockSizeTooLarge {
            block_size: 1 << 40,
            max: u64::from(u32::MAX),
        };
        assert!(error.to_string().contains(&u32::MAX.to_string()));
    }
}
