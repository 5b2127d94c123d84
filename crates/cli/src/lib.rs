#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the command-line front-end of `crcsig`. It parses the
//! arguments, prints the informational lines users of the tool expect, drives
//! the selected [`signature::Engine`]s and maps failures to exit statuses.
//!
//! # Design
//!
//! [`run`] accepts an iterator of arguments together with handles for standard
//! output and error so the whole front-end can be exercised in-process. A
//! [`clap`](https://docs.rs/clap/) command definition performs the parse; help
//! and version output are rendered from static text.
//!
//! # Invariants
//!
//! - `run` never panics; failures surface as non-zero exit codes.
//! - Configuration problems are reported before the input is opened, and no
//!   signature file is created for them.
//!
//! # Errors
//!
//! | status | meaning                                       |
//! |--------|-----------------------------------------------|
//! | 0      | success, or help/version shown                |
//! | 1      | usage or configuration error                  |
//! | 2      | the input size could not be determined        |
//! | 3      | open, read, map or write failure              |
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = cli::run(["crcsig", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(exit_code, 0);
//! assert!(String::from_utf8(stdout).unwrap().starts_with("crcsig "));
//! assert!(stderr.is_empty());
//! ```

use std::ffi::OsString;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use logging::VerbosityConfig;
use signature::{
    ConfigError, EXIT_INVALID_CONFIGURATION, EXIT_IO_FAILURE, MIB, SignatureConfig,
    SignatureError, SignatureJob, block_size_from_mib,
};
use tracing::{debug, warn};

mod arguments;

pub use crate::arguments::{EngineSelection, ParsedArgs, parse_args};

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Version banner printed by `--version`.
const VERSION_TEXT: &str = concat!("crcsig ", env!("CARGO_PKG_VERSION"), "\n");

/// Fixed help text.
const HELP_TEXT: &str = concat!(
    "crcsig ",
    env!("CARGO_PKG_VERSION"),
    "\n",
    "\n",
    "Usage: crcsig -i FILE -o FILE [-b MIB] [-e ENGINE] [-j N] [-v]...\n",
    "\n",
    "Splits FILE into fixed-size blocks and writes the CRC-32 of every block,\n",
    "in block order, to a signature file. The last block is zero-padded to the\n",
    "full block size before it is checksummed.\n",
    "\n",
    "Options:\n",
    "  -i, --input FILE       Source file to sign.\n",
    "  -o, --output FILE      Base path of the signature file.\n",
    "  -b, --block-size MIB   Block size in MiB (default 1; values below 1 select 1).\n",
    "  -e, --engine ENGINE    stream, mapped or both (default stream).\n",
    "  -j, --threads N        Worker count (defaults to the available parallelism).\n",
    "  -v, --verbose          Increase diagnostic verbosity (repeatable).\n",
    "  -h, --help             Show this help message and exit.\n",
    "  -V, --version          Output version information and exit.\n",
    "\n",
    "Results:\n",
    "  The stream engine writes <output>.crc32-signature-sm and the mapped\n",
    "  engine writes <output>.crc32-signature-mp. Each file holds one 32-bit\n",
    "  checksum per block in native byte order.\n",
);

/// Renders the help text.
fn render_help() -> &'static str {
    HELP_TEXT
}

/// Failure reported on stderr with its exit status.
#[derive(Debug)]
struct Failure {
    code: i32,
    message: String,
}

impl Failure {
    fn usage(message: impl Into<String>) -> Self {
        Self {
            code: EXIT_INVALID_CONFIGURATION,
            message: message.into(),
        }
    }

    fn signature(error: &SignatureError, input: &Path) -> Self {
        let message = match error {
            SignatureError::InvalidConfiguration(_)
            | SignatureError::InputUnavailable { .. }
            | SignatureError::Io { .. } => error.to_string(),
            _ => format!("{}: {error}", input.display()),
        };
        Self {
            code: error.exit_code(),
            message,
        }
    }
}

impl From<io::Error> for Failure {
    fn from(error: io::Error) -> Self {
        Self {
            code: EXIT_IO_FAILURE,
            message: format!("failed to write to standard output: {error}"),
        }
    }
}

/// Runs the CLI using the provided argument iterator and output handles.
///
/// Returns the process exit code that should be used by the caller.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let result = match parse_args(arguments) {
        Ok(parsed) => execute(parsed, stdout),
        Err(error) => Err(Failure::usage(error.to_string().trim_end())),
    };

    match result {
        Ok(()) => 0,
        Err(failure) => {
            let _ = writeln!(
                stderr,
                "crcsig error: {} (code {})",
                failure.message, failure.code
            );
            failure.code
        }
    }
}

fn execute<Out: Write>(parsed: ParsedArgs, stdout: &mut Out) -> Result<(), Failure> {
    if parsed.show_help {
        stdout.write_all(render_help().as_bytes())?;
        return Ok(());
    }
    if parsed.show_version {
        stdout.write_all(VERSION_TEXT.as_bytes())?;
        return Ok(());
    }

    let _ = logging::init_tracing(VerbosityConfig::from_verbose_level(parsed.verbose));

    let input = parsed
        .input
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| Failure::usage("source file not specified (use -i FILE)"))?;
    let output = parsed
        .output
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| Failure::usage("destination file name not specified (use -o FILE)"))?;
    let engines = parsed.engine.engines();

    if output.exists()
        || engines
            .iter()
            .any(|engine| engine.output_path(&output).exists())
    {
        warn!(destination = %output.display(), "destination file already exists");
        writeln!(stdout, "warning: destination file already exists!")?;
    }

    let block_size = match parsed.block_size_mib {
        None => {
            writeln!(stdout, "default block size: 1Mb")?;
            MIB
        }
        Some(requested) => {
            let block_size = block_size_from_mib(requested);
            writeln!(stdout, "block size: {}Mb", block_size / MIB)?;
            block_size
        }
    };

    let mut config = SignatureConfig::new().with_block_size(block_size);
    if let Some(threads) = parsed.threads {
        let threads = NonZeroUsize::new(threads).ok_or_else(|| {
            Failure::signature(&SignatureError::from(ConfigError::ZeroParallelism), &input)
        })?;
        config = config.with_parallelism(threads);
    }
    debug!(?config, engines = engines.len(), "resolved configuration");

    let job = SignatureJob::prepare(&input, &output, config)
        .map_err(|error| Failure::signature(&error, &input))?;
    writeln!(
        stdout,
        "File size: {:.2}Mb {}",
        job.layout().file_size() as f64 / MIB as f64,
        display_name(&input)
    )?;

    for &engine in engines {
        let report = job
            .run(engine)
            .map_err(|error| Failure::signature(&error, &input))?;
        writeln!(
            stdout,
            "{engine} signature: {}",
            report.output_path().display()
        )?;
        writeln!(stdout, "elapsed: {:.3}s", report.elapsed().as_secs_f64())?;
    }

    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

/// Converts a numeric exit code into an [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    ExitCode::from(clamped as u8)
}
