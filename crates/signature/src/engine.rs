//! crates/signature/src/engine.rs
//!
//! Engine selection and the end-to-end run from input path to signature file.

use std::fmt;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, instrument};

use crate::algorithm::{ChecksumAlgorithm, Crc32};
use crate::config::SignatureConfig;
use crate::error::SignatureError;
use crate::file::FileSignature;
use crate::layout::BlockLayout;
use crate::mapped::generate_mapped_signature;
use crate::stream::generate_stream_signature;
use crate::writer::{with_suffix, write_signature_file};

/// Output suffix of the stream engine.
pub const STREAM_SUFFIX: &str = ".crc32-signature-sm";
/// Output suffix of the mapped-window engine.
pub const MAPPED_SUFFIX: &str = ".crc32-signature-mp";

/// I/O and concurrency strategy used to produce a signature.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Engine {
    /// Sequential buffered reads feeding a bounded worker pool.
    Stream,
    /// Memory-mapped windows with one batch of workers per window.
    Mapped,
}

impl Engine {
    /// Every engine, in the order they run when both are requested.
    pub const ALL: [Self; 2] = [Self::Stream, Self::Mapped];

    /// Returns the engine's command-line name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stream => "stream",
            Self::Mapped => "mapped",
        }
    }

    /// Returns the suffix appended to the output base path.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Stream => STREAM_SUFFIX,
            Self::Mapped => MAPPED_SUFFIX,
        }
    }

    /// Returns the signature path this engine writes for `base`.
    #[must_use]
    pub fn output_path(self, base: &Path) -> PathBuf {
        with_suffix(base, self.suffix())
    }

    /// Computes the signature of the file at `input`.
    pub fn generate<A>(
        self,
        input: &Path,
        layout: BlockLayout,
        algorithm: &A,
        config: &SignatureConfig,
    ) -> Result<FileSignature, SignatureError>
    where
        A: ChecksumAlgorithm + ?Sized,
    {
        let file = File::open(input).map_err(|source| SignatureError::io("open", input, source))?;
        match self {
            Self::Stream => {
                generate_stream_signature(BufReader::new(file), layout, algorithm, config)
            }
            Self::Mapped => generate_mapped_signature(&file, layout, algorithm, config),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown engine name.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown engine '{0}' (expected 'stream' or 'mapped')")]
pub struct ParseEngineError(String);

impl FromStr for Engine {
    type Err = ParseEngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stream" | "sm" => Ok(Self::Stream),
            "mapped" | "mp" => Ok(Self::Mapped),
            _ => Err(ParseEngineError(value.to_owned())),
        }
    }
}

/// Returns the size of the input file.
///
/// # Errors
///
/// [`SignatureError::InputUnavailable`] when the path does not exist, cannot be
/// queried, or does not name a regular file.
pub fn query_input_size(path: &Path) -> Result<u64, SignatureError> {
    let metadata = fs::metadata(path).map_err(|source| SignatureError::InputUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(SignatureError::InputUnavailable {
            path: path.to_path_buf(),
            source: std::io::Error::other("not a regular file"),
        });
    }
    Ok(metadata.len())
}

/// Outcome of a completed run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignatureReport {
    engine: Engine,
    output_path: PathBuf,
    layout: BlockLayout,
    elapsed: Duration,
}

impl SignatureReport {
    /// Engine that produced the signature.
    #[must_use]
    pub const fn engine(&self) -> Engine {
        self.engine
    }

    /// Path of the written signature file.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Layout the signature covers.
    #[must_use]
    pub const fn layout(&self) -> BlockLayout {
        self.layout
    }

    /// Wall time spent generating and writing the signature.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Validated run: configuration checked and input size known.
///
/// Preparing a job performs every check that must precede engine work, so a
/// prepared job never leaves an output file behind for a configuration error
/// or an unreadable input size.
#[derive(Clone, Debug)]
pub struct SignatureJob {
    input: PathBuf,
    output_base: PathBuf,
    config: SignatureConfig,
    layout: BlockLayout,
}

impl SignatureJob {
    /// Validates `config` and records the input's size and block layout.
    ///
    /// # Errors
    ///
    /// - [`SignatureError::InvalidConfiguration`] before any file system access.
    /// - [`SignatureError::InputUnavailable`] when the input size cannot be queried.
    pub fn prepare(
        input: impl Into<PathBuf>,
        output_base: impl Into<PathBuf>,
        config: SignatureConfig,
    ) -> Result<Self, SignatureError> {
        config.validate()?;
        let input = input.into();
        let file_size = query_input_size(&input)?;
        let layout = BlockLayout::new(file_size, config.block_size())?;

        Ok(Self {
            input,
            output_base: output_base.into(),
            config,
            layout,
        })
    }

    /// Input path.
    #[must_use]
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Block layout computed from the input size.
    #[must_use]
    pub const fn layout(&self) -> BlockLayout {
        self.layout
    }

    /// Run configuration.
    #[must_use]
    pub const fn config(&self) -> &SignatureConfig {
        &self.config
    }

    /// Signature path `engine` writes for this job.
    #[must_use]
    pub fn output_path(&self, engine: Engine) -> PathBuf {
        engine.output_path(&self.output_base)
    }

    /// Runs `engine` with CRC-32 and writes its signature file.
    pub fn run(&self, engine: Engine) -> Result<SignatureReport, SignatureError> {
        self.run_with(engine, &Crc32)
    }

    /// Runs `engine` with `algorithm` and writes its signature file.
    #[instrument(skip(self, algorithm), fields(input = %self.input.display(), blocks = self.layout.block_count()))]
    pub fn run_with<A>(&self, engine: Engine, algorithm: &A) -> Result<SignatureReport, SignatureError>
    where
        A: ChecksumAlgorithm + ?Sized,
    {
        let started = Instant::now();
        let signature = engine.generate(&self.input, self.layout, algorithm, &self.config)?;
        let output_path = self.output_path(engine);
        write_signature_file(&output_path, &signature)?;
        let elapsed = started.elapsed();

        info!(
            engine = engine.name(),
            path = %output_path.display(),
            elapsed_ms = elapsed.as_millis() as u64,
            "signature run finished"
        );

        Ok(SignatureReport {
            engine,
            output_path,
            layout: self.layout,
            elapsed,
        })
    }
}

/// Computes the CRC-32 signature of `input` with `engine` and writes it next to
/// `output_base`.
pub fn generate_signature_file(
    input: &Path,
    output_base: &Path,
    engine: Engine,
    config: SignatureConfig,
) -> Result<SignatureReport, SignatureError> {
    SignatureJob::prepare(input, output_base, config)?.run(engine)
}
