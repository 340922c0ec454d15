//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Formfields CLI - validate form submissions against declarative form schemas
///
/// Decodes a form schema (JSON or YAML) and checks a set of submitted values
/// against it, reporting the first failing field or every failing field.
#[derive(Parser, Debug)]
#[command(
    name = "formfields",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "FORMFIELDS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results (defaults to the configured format)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate submitted values against a form schema
    Validate(ValidateArgs),

    /// Decode a form schema and print its fields
    Inspect(InspectArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the form schema (JSON or YAML)
    #[arg(short, long, value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Path to the submitted values (JSON, YAML, or a urlencoded .txt/.query file)
    #[arg(long, value_name = "VALUES")]
    pub values: PathBuf,

    /// Report every failing field instead of stopping at the first
    #[arg(short, long)]
    pub all: bool,

    /// Stop after this many errors when reporting every field (0 = unlimited)
    #[arg(long, value_name = "N")]
    pub max_errors: Option<usize>,
}

/// Arguments for the inspect command
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Path to the form schema (JSON or YAML)
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

impl OutputFormat {
    /// Parse a format name as written in a config file
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_validate_args() {
        let cli = Cli::parse_from([
            "formfields",
            "validate",
            "--schema",
            "form.json",
            "--values",
            "submission.yaml",
            "--all",
            "--max-errors",
            "3",
        ]);
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.schema, PathBuf::from("form.json"));
                assert_eq!(args.values, PathBuf::from("submission.yaml"));
                assert!(args.all);
                assert_eq!(args.max_errors, Some(3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["formfields", "inspect", "form.yaml", "-o", "json-pretty", "--no-color"]);
        assert_eq!(cli.output, Some(OutputFormat::JsonPretty));
        assert!(cli.no_color);
        assert!(!cli.use_color());
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli {
            verbose: 2,
            quiet: false,
            config: None,
            output: None,
            no_color: false,
            command: Commands::Inspect(InspectArgs {
                schema: PathBuf::from("form.json"),
            }),
        };
        assert_eq!(cli.verbosity_level(), 2);

        let quiet_cli = Cli {
            verbose: 2,
            quiet: true,
            ..cli
        };
        assert_eq!(quiet_cli.verbosity_level(), 0);
    }

    #[test]
    fn test_output_format_from_name() {
        assert_eq!(OutputFormat::from_name("human"), Some(OutputFormat::Human));
        assert_eq!(OutputFormat::from_name("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_name("json-pretty"), Some(OutputFormat::JsonPretty));
        assert_eq!(OutputFormat::from_name("xml"), None);
    }
}
