//! Tally cart CLI

use std::{io, process};

use tracing::error;

use crate::config::Config;

mod commands;
mod config;
mod logging;

/// Tally CLI entry point
pub fn main() {
    let config = Config::load().unwrap_or_else(|error| error.exit());

    if let Err(error) = logging::init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for subscriber errors"
        )]
        {
            eprintln!("Logging error: {error}");
        }

        process::exit(1);
    }

    if let Err(error) = commands::run(config, io::stdout().lock()) {
        error!("{error}");

        process::exit(1);
    }
}
