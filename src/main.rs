use anyhow::Result;
use clap::Parser;

mod app;
mod cli;
mod config;
mod fs;
mod input;
mod logging;
mod menu;
mod models;
mod scheduler;
mod shell;
mod ui;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // The guard flushes buffered log lines on drop, so it lives until exit.
    let _guard = match config::get_data_dir().and_then(|dir| logging::init(&dir)) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("⚠ diagnostics log disabled: {err:#}");
            None
        }
    };

    cli::run(cli)
}
