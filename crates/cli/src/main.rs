mod artifacts;
mod cli;
mod commands;
mod explain;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use seo_report_core::config::{self, Config};

use crate::cli::{CliArgs, Command};

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    config::load_dotenv();
    let config = Config::from_env();
    config.log_summary();

    let args = CliArgs::parse();
    match args.command {
        Command::Evaluate(args) => commands::evaluate(&config, args),
        Command::Validate(args) => commands::validate(&config, args),
        Command::Explain(args) => commands::explain(&config, args),
        Command::Diff(args) => commands::diff(args),
    }
}
