use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;

use crate::config::{self, Config, ShellKind};
use crate::fs::{FinishedLog, LogRecord};
use crate::menu::MenuShell;
use crate::scheduler::{PersistenceMode, Scheduler};
use crate::shell::{Driver, TerminalUi};

#[derive(Debug, Parser)]
#[command(name = "jsched", version, about = "Track tasks from staged to active to finished")]
pub struct Cli {
    /// Durable log of finished tasks (overrides the config file)
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Roll a finish back when its log record cannot be written
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Full-screen panel interface
    Tui,
    /// Numbered console menu
    Menu,
    /// Print every task recorded in the durable log
    History {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show or change the configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    Show,
    /// Set the durable log path
    LogFile { path: PathBuf },
    /// Enable or disable strict persistence
    Strict {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Set the default shell
    Shell { shell: ShellKind },
}

/// Settings after applying command-line overrides to the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_file: PathBuf,
    pub mode: PersistenceMode,
    pub shell: ShellKind,
}

impl Settings {
    pub fn resolve(cli: &Cli, config: &Config) -> Self {
        let mode = if cli.strict {
            PersistenceMode::Strict
        } else {
            config.persistence_mode()
        };
        let shell = match cli.command {
            Some(CliCommand::Menu) => ShellKind::Menu,
            Some(CliCommand::Tui) => ShellKind::Tui,
            _ => config.shell,
        };

        Self {
            log_file: cli.log_file.clone().unwrap_or_else(|| config.log_file.clone()),
            mode,
            shell,
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    // `config` must work even when the file it edits does not parse
    if let Some(CliCommand::Config { action }) = cli.command {
        return handle_config(action);
    }

    let settings = Settings::resolve(&cli, &config::load_config()?);
    match cli.command {
        Some(CliCommand::History { json }) => print_history(&FinishedLog::new(settings.log_file), json),
        _ => run_shell(&settings),
    }
}

fn run_shell(settings: &Settings) -> Result<()> {
    tracing::info!(
        log_file = %settings.log_file.display(),
        mode = ?settings.mode,
        shell = ?settings.shell,
        "starting scheduler"
    );
    let mut scheduler =
        Scheduler::new(FinishedLog::new(&settings.log_file)).with_mode(settings.mode);

    match settings.shell {
        ShellKind::Tui => TerminalUi::new().drive(&mut scheduler),
        ShellKind::Menu => {
            let stdin = io::stdin();
            MenuShell::new(stdin.lock(), io::stdout()).drive(&mut scheduler)
        }
    }
}

fn handle_config(action: Option<ConfigAction>) -> Result<()> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => config::show_config(),
        ConfigAction::LogFile { path } => config::set_log_file(path),
        ConfigAction::Strict { enabled } => config::set_strict(enabled),
        ConfigAction::Shell { shell } => config::set_shell(shell),
    }
}

fn print_history(log: &FinishedLog, json: bool) -> Result<()> {
    let records = log.read_history()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No finished tasks in {}.", log.path().display());
        return Ok(());
    }

    println!("{}", format_history(&records));
    Ok(())
}

fn format_history(records: &[LogRecord]) -> String {
    let mut out = format!(
        "{:<5}  {:<30}  {:>9}  {:<19}  {:<19}  {:>9}\n",
        "ID", "DESCRIPTION", "ESTIMATE", "START", "FINISH", "ACTUAL"
    );
    out.push_str(&format!(
        "{}  {}  {}  {}  {}  {}",
        "-".repeat(5),
        "-".repeat(30),
        "-".repeat(9),
        "-".repeat(19),
        "-".repeat(19),
        "-".repeat(9)
    ));

    for record in records {
        let description: String = record.description.replace('\n', " ").chars().take(30).collect();
        out.push_str(&format!(
            "\n{:<5}  {:<30}  {:>9}  {:<19}  {:<19}  {:>9}",
            record.id, description, record.estimate, record.start, record.finish, record.actual_seconds
        ));
    }
    out
}
