//! lstree CLI Binary
//!
//! Command-line front end for tree selection, checksums and content lookups.

use anyhow::Context;
use clap::Parser;
use lstree::cli::{map_error, Cli, CommandOutput, RunContext};
use lstree::logging::init_logging;
use std::io::Write;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        match e.downcast_ref::<lstree::error::LsTreeError>() {
            Some(ls_error) => eprintln!("{}", map_error(ls_error)),
            None => eprintln!("{:#}", e),
        }
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = RunContext::load_config(cli)?;
    config.validate().map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        anyhow::anyhow!("Configuration validation failed:\n{}", messages.join("\n"))
    })?;

    // Initialize logging early
    init_logging(&config.logging).context("Failed to initialize logging")?;
    info!("lstree starting");

    let context = RunContext::new(&cli.repo, config)?;
    let output = context.execute(cli).map_err(|e| {
        error!("Command failed: {}", e);
        e
    })?;

    let mut stdout = std::io::stdout().lock();
    match output {
        CommandOutput::Text(text) => writeln!(stdout, "{}", text)?,
        CommandOutput::Bytes(bytes) => stdout.write_all(&bytes)?,
    }
    stdout.flush()?;

    info!("Command completed successfully");
    Ok(())
}
