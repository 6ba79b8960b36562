mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::{Cli, ColorMode};
use output::{OutputMode, Reporter};
use secscan_core::{RunMode, SetupOptions, SystemRunner};

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .format_timestamp(None)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Human
    };

    match cli.color {
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Auto => {}
    }

    let mut reporter = Reporter::new(mode);

    let success = match std::env::current_dir() {
        Ok(root) => {
            let options = SetupOptions {
                root,
                mode: if cli.dry_run {
                    RunMode::DryRun
                } else {
                    RunMode::Apply
                },
            };
            commands::setup::run_setup_command(&options, &SystemRunner, &mut reporter)
        }
        Err(e) => {
            reporter.error(&format!("Cannot get current directory: {e}"));
            false
        }
    };

    reporter.finish();

    if !success {
        std::process::exit(1);
    }
}
