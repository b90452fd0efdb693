//! wndkit CLI.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};

use wndkit_cli::cli::{Cli, Command, LogFormatArg};
use wndkit_cli::commands::{run_generate, run_update};
use wndkit_cli::logging::{LogConfig, LogFormat, init_logging};
use wndkit_cli::summary::{print_json, print_summary};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match &cli.command {
        Command::Generate(args) => run_generate(args).map(|summary| (summary, args.json)),
        Command::Update(args) => run_update(args).map(|summary| (summary, args.json)),
    };
    let exit_code = match result {
        Ok((summary, as_json)) => {
            if as_json {
                match print_json(&summary) {
                    Ok(()) => 0,
                    Err(error) => {
                        eprintln!("error: {error}");
                        1
                    }
                }
            } else {
                print_summary(&summary);
                0
            }
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent
/// precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !cli.verbosity.is_present();
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
