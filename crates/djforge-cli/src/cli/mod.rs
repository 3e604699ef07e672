//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "djforge",
    bin_name = "djforge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Answer-driven Django project generator",
    long_about = "djforge asks a short questionnaire and renders a production-ready \
                  Django project: settings, apps, Docker, CI and deployment manifests \
                  for the features you pick.",
    after_help = "EXAMPLES:\n\
        \x20 djforge new ./shop\n\
        \x20 djforge new ./shop --defaults --set api_style=both --set background_tasks=celery\n\
        \x20 djforge new ./shop --answers-file answers.yml --yes\n\
        \x20 djforge questions\n\
        \x20 djforge completions bash > /usr/share/bash-completion/completions/djforge",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new Django project.
    #[command(
        visible_alias = "n",
        about = "Generate a new Django project",
        after_help = "EXAMPLES:\n\
            \x20 djforge new ./shop\n\
            \x20 djforge new ./shop --defaults --set use_stripe=yes --set stripe_mode=advanced\n\
            \x20 djforge new ./shop --set deployment_targets=render,docker --dry-run"
    )]
    New(NewArgs),

    /// List available templates.
    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 djforge list\n\
            \x20 djforge list --format json"
    )]
    List(ListArgs),

    /// Show the questionnaire.
    #[command(
        visible_alias = "q",
        about = "Show every question with its choices and default",
        after_help = "EXAMPLES:\n\
            \x20 djforge questions\n\
            \x20 djforge questions --format json"
    )]
    Questions(QuestionsArgs),

    /// Initialise a djforge configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 djforge init           # platform config directory\n\
            \x20 djforge init --local   # .djforge.toml in the current directory"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 djforge completions bash > ~/.local/share/bash-completion/completions/djforge\n\
            \x20 djforge completions zsh  > ~/.zfunc/_djforge\n\
            \x20 djforge completions fish > ~/.config/fish/completions/djforge.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the djforge configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 djforge config get defaults.author_name\n\
            \x20 djforge config list\n\
            \x20 djforge config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `djforge new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Destination directory.  Its last component is the default project name.
    #[arg(value_name = "DEST", help = "Directory to generate the project into")]
    pub destination: PathBuf,

    /// Template to render.
    #[arg(
        short = 't',
        long = "template",
        value_name = "ID",
        help = "Template ID as name@version (default from config)"
    )]
    pub template: Option<String>,

    /// Answers file (YAML, JSON or TOML, picked by extension).
    #[arg(
        short = 'a',
        long = "answers-file",
        value_name = "FILE",
        help = "Read answers from a YAML, JSON or TOML file"
    )]
    pub answers_file: Option<PathBuf>,

    /// Individual answers; override the answers file.
    #[arg(
        short = 's',
        long = "set",
        value_name = "KEY=VALUE",
        help = "Answer a question, e.g. --set cache=none (repeatable)"
    )]
    pub set: Vec<String>,

    /// Never prompt; unanswered questions take their defaults.
    #[arg(short = 'd', long = "defaults", help = "Use defaults for unanswered questions")]
    pub defaults: bool,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and generate immediately"
    )]
    pub yes: bool,

    /// Write into an existing directory, overwriting files it already has.
    #[arg(long = "force", help = "Generate into an existing directory")]
    pub force: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `djforge list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One ID per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── questions ─────────────────────────────────────────────────────────────────

/// Arguments for `djforge questions`.
#[derive(Debug, Args)]
pub struct QuestionsArgs {
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: QuestionsFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum QuestionsFormat {
    Table,
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `djforge init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write `.djforge.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `djforge completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `djforge config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.author_name`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the user configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_new_command() {
        let cli = Cli::parse_from([
            "djforge",
            "new",
            "./shop",
            "--set",
            "cache=none",
            "-s",
            "use_i18n=yes",
            "--defaults",
        ]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert_eq!(args.destination, PathBuf::from("./shop"));
        assert_eq!(args.set, vec!["cache=none", "use_i18n=yes"]);
        assert!(args.defaults);
        assert!(!args.dry_run);
        assert!(args.template.is_none());
    }

    #[test]
    fn new_requires_destination() {
        assert!(Cli::try_parse_from(["djforge", "new"]).is_err());
    }

    #[test]
    fn list_format_defaults_to_table() {
        let cli = Cli::parse_from(["djforge", "list"]);
        assert!(matches!(
            cli.command,
            Commands::List(ListArgs {
                format: ListFormat::Table
            })
        ));
    }

    #[test]
    fn questions_alias() {
        let cli = Cli::parse_from(["djforge", "q", "--format", "json"]);
        assert!(matches!(
            cli.command,
            Commands::Questions(QuestionsArgs {
                format: QuestionsFormat::Json
            })
        ));
    }

    #[test]
    fn config_get_takes_key() {
        let cli = Cli::parse_from(["djforge", "config", "get", "defaults.license"]);
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommands::Get { key }) if key == "defaults.license"
        ));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["djforge", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
