//! Formfields CLI - validate form submissions against declarative form schemas
//!
//! This is the main entry point for the `formfields` binary, providing
//! commands for validating submitted values and inspecting form schemas.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    let cli = Cli::parse_args();

    // Configuration is loaded before logging so its `logging` section applies
    let config = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", error::format_error(&e, cli.use_color()));
            process::exit(e.exit_code());
        }
    };

    let use_color = cli.use_color() && config.output.color;
    control::set_override(use_color);

    if let Err(e) = logging::init_logging(logging_config(&cli, &config)) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli, &config, use_color) {
        Ok(()) => process::exit(0),
        Err(e) => {
            if !e.is_reported() {
                eprintln!("{}", error::format_error(&e, use_color));
            }
            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
fn run(cli: Cli, config: &Config, use_color: bool) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = config.output_format(cli.output)?;
    let mut output = OutputWriter::new(format, use_color, cli.quiet);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    match cli.command {
        Commands::Validate(args) => handlers::handle_validate(args, config, &mut output),
        Commands::Inspect(args) => handlers::handle_inspect(args, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Build the logging configuration from flags, the config file and the environment
fn logging_config(cli: &Cli, config: &Config) -> LoggingConfig {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);
    logging_config.merge_with_file(&config.logging, verbosity);
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging_config
}
