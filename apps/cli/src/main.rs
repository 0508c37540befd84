#![allow(clippy::print_stdout)]

mod args;
mod handlers;

use crate::args::{Cli, Commands};
use anyhow::{Context, Result};
use chub::domain::config::EngineConfig;
use chub::kernel::config::load_config;
use chub_logger::Logger;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config: EngineConfig =
        load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    let _log = Logger::from_config(&config.logging)?;

    match cli.command {
        Commands::Courses(args) => handlers::list_courses(config, &args)?,
        Commands::Upload { filename, size, material } => {
            handlers::check_upload(config, &filename, size, material)?;
        },
        Commands::Password { password, confirm } => {
            handlers::check_password(&config, &password, confirm.as_deref())?;
        },
    }

    Ok(())
}
