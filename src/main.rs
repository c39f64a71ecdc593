//! icommands-ci - iRODS icommands CI build driver
//!
//! Entry point for the icommands-ci command-line application.

use anyhow::Result;
use clap::Parser;

use icommands_ci::cli::output::{display_error, init_default_logging, register_log_handler};
use icommands_ci::cli::{self, Cli};

fn main() -> Result<()> {
    let config = match Cli::parse().to_config() {
        Ok(config) => config,
        Err(e) => {
            display_error(&e);
            std::process::exit(1);
        }
    };

    if config.verbose() {
        register_log_handler()?;
    } else {
        init_default_logging()?;
    }

    // Run the driver and handle errors
    match cli::run(&config) {
        Ok(()) => Ok(()),
        Err(e) => {
            display_error(&e);
            std::process::exit(1);
        }
    }
}
