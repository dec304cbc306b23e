//! `clients` entry point.
//!
//! # Responsibility
//! - Resolve config, start logging, open the database once.
//! - Run the selected command and map failures to exit status 1.
//!
//! # Invariants
//! - Errors are printed once, as a single `Error: ...` line on stderr.
//! - Buffered log records are flushed before exit on every path.

use anyhow::{Context, Result};
use clap::Parser;
use clients_core::{
    init_from_config, open_database, shutdown_logging, CustomerStore, SqliteCustomerRepository,
};
use log::{error, info};
use std::io::Write;
use std::process::ExitCode;

mod cli;
mod commands;
mod report;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr().lock();

    let code = match run(&cli, &mut stdout, &mut stderr) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=command_finish module=cli status=error");
            let _ = stdout.flush();
            let _ = writeln!(stderr, "Error: {err:#}");
            ExitCode::FAILURE
        }
    };
    shutdown_logging();
    code
}

fn run(cli: &Cli, out: &mut impl Write, err: &mut impl Write) -> Result<()> {
    let config = cli.resolve_config()?;
    init_from_config(&config.logging).context("failed to initialize logging")?;

    let conn = open_database(&config.database)?;
    let store = CustomerStore::new(SqliteCustomerRepository::try_new(&conn)?);

    let command = cli.selected_command();
    info!(
        "event=command_start module=cli status=start command={}",
        command.name()
    );
    commands::execute(&command, &store, out, err)?;
    info!("event=command_finish module=cli status=ok");
    Ok(())
}
