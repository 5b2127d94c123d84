//! crates/cli/src/arguments.rs
//! Command-line definition and parsing.

use std::ffi::OsString;

use clap::builder::OsStringValueParser;
use clap::{Arg, ArgAction, Command, value_parser};
use signature::Engine;

/// Program name used when `argv` is empty.
pub(crate) const PROGRAM_NAME: &str = "crcsig";

/// Engines requested with `--engine`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum EngineSelection {
    /// Only the stream engine.
    #[default]
    Stream,
    /// Only the mapped-window engine.
    Mapped,
    /// Stream engine followed by the mapped-window engine.
    Both,
}

impl EngineSelection {
    /// Returns the engines to run, in order.
    #[must_use]
    pub const fn engines(self) -> &'static [Engine] {
        match self {
            Self::Stream => &[Engine::Stream],
            Self::Mapped => &[Engine::Mapped],
            Self::Both => &Engine::ALL,
        }
    }

    fn from_name(name: &str) -> Self {
        match name {
            "mapped" => Self::Mapped,
            "both" => Self::Both,
            _ => Self::Stream,
        }
    }
}

/// Parsed command-line arguments.
///
/// Required operands are kept optional here so that a missing `-i` or `-o`
/// produces a targeted diagnostic rather than a generic usage error.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParsedArgs {
    /// Display help and exit (`-h`, `--help`).
    pub show_help: bool,
    /// Display version and exit (`-V`, `--version`).
    pub show_version: bool,
    /// Source file (`-i`, `--input`).
    pub input: Option<OsString>,
    /// Output base path (`-o`, `--output`).
    pub output: Option<OsString>,
    /// Block size in MiB as typed (`-b`, `--block-size`); coerced later.
    pub block_size_mib: Option<i64>,
    /// Engines to run (`-e`, `--engine`).
    pub engine: EngineSelection,
    /// Worker count override (`-j`, `--threads`).
    pub threads: Option<usize>,
    /// Number of `-v` flags.
    pub verbose: u8,
}

/// Builds the `clap` command used for parsing.
pub(crate) fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .help("Show this help message and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .help("Output version information and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("input")
                .long("input")
                .short('i')
                .value_name("FILE")
                .help("Source file to sign.")
                .value_parser(OsStringValueParser::new())
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("FILE")
                .help("Base path of the signature file.")
                .value_parser(OsStringValueParser::new())
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("block-size")
                .long("block-size")
                .short('b')
                .value_name("MIB")
                .help("Block size in MiB (values below 1 select 1).")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("engine")
                .long("engine")
                .short('e')
                .value_name("ENGINE")
                .help("Engine to run: stream, mapped or both.")
                .value_parser(["stream", "mapped", "both"])
                .default_value("stream")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .short('j')
                .value_name("N")
                .help("Worker count (defaults to the available parallelism).")
                .value_parser(value_parser!(usize))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase diagnostic verbosity.")
                .action(ArgAction::Count),
        )
}

/// Parses command-line arguments into a [`ParsedArgs`] structure.
pub fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();

    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;

    let engine = matches
        .get_one::<String>("engine")
        .map(|name| EngineSelection::from_name(name))
        .unwrap_or_default();

    Ok(ParsedArgs {
        show_help: matches.get_flag("help"),
        show_version: matches.get_flag("version"),
        input: matches.remove_one::<OsString>("input"),
        output: matches.remove_one::<OsString>("output"),
        block_size_mib: matches.remove_one::<i64>("block-size"),
        engine,
        threads: matches.remove_one::<usize>("threads"),
        verbose: matches.get_count("verbose"),
    })
}
