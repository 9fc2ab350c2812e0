mod commands;
mod ops;
mod reports;
mod tracing_config;

use clap::Parser;
use eyre::Result;

use crate::commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    tracing_config::init_tracing(cli.verbose);
    cli.run()
}
