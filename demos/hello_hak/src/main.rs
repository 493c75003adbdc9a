//! `hello_hak` entry point: start logging, load settings, parse the command
//! line, greet.

use std::io::{self, Write};

use hakcli::logging;
use hello_hak::cli::CommandLine;
use hello_hak::error::{HelloHakError, Result};
use hello_hak::settings;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    run().map_err(color_eyre::eyre::Report::from)
}

fn run() -> Result<()> {
    let initial = settings::initial_log_level();
    let log_level =
        logging::init_reloadable(initial).map_err(|err| HelloHakError::Logging(Box::new(err)))?;
    let settings = settings::load()?;
    let mut command_line = CommandLine::new(&settings)?;
    command_line.parse_env();
    log_level
        .set(command_line.log_level().max(initial))
        .map_err(|err| HelloHakError::Logging(Box::new(err)))?;

    let plan = command_line.plan();
    tracing::info!(?plan, "greeting");
    let mut stdout = io::stdout().lock();
    plan.write_to(&mut stdout)?;
    stdout.flush()?;
    Ok(())
}
