//! Flags accepted by every subcommand.

use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Log more (`-v` info, `-vv` debug, `-vvv` trace).
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Log more (-v info, -vv debug, -vvv trace)",
        long_help = "Raise the log level written to stderr:
    (none)  - warnings and errors
    -v      - info: which template, how many files
    -vv     - debug: answers, conditions, skipped files
    -vvv    - trace

RUST_LOG overrides this when set."
    )]
    pub verbose: u8,

    /// Print nothing but errors and machine-readable payloads.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Only print errors and requested data"
    )]
    pub quiet: bool,

    /// Plain output. Also switched on by `NO_COLOR` unless it is empty, `0`, `false`, `no` or `off`.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new(),
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Read settings from this file instead of the usual locations.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Use this config file instead of the default locations"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "How to format results (json for scripts)"
    )]
    pub output_format: OutputFormat,
}

/// Rendering of command results on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human on a terminal, plain when piped.
    #[default]
    Auto,
    /// Colors, symbols and a spinner.
    Human,
    /// Same text without ANSI codes.
    Plain,
    /// One JSON document per command.
    Json,
}
