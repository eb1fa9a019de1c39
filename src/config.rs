/// Application configuration
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::fs::DEFAULT_LOG_FILE;
use crate::scheduler::PersistenceMode;

const APP_DIR: &str = "job-scheduler";

/// Which presentation shell to start when none is given on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ShellKind {
    #[default]
    Tui,
    Menu,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Durable log of finished tasks, relative to the working directory unless absolute
    pub log_file: PathBuf,
    /// Roll a finish back when its log record cannot be written
    pub strict_persistence: bool,
    /// Default shell
    pub shell: ShellKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            strict_persistence: false,
            shell: ShellKind::Tui,
        }
    }
}

impl Config {
    pub fn persistence_mode(&self) -> PersistenceMode {
        if self.strict_persistence {
            PersistenceMode::Strict
        } else {
            PersistenceMode::BestEffort
        }
    }
}

/// Config file location
/// Linux: ~/.config/job-scheduler/config.toml
/// macOS: ~/Library/Application Support/job-scheduler/config.toml
/// Windows: %APPDATA%\job-scheduler\config.toml
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("could not determine the user config directory")?;
    Ok(config_dir.join(APP_DIR).join("config.toml"))
}

/// Directory for diagnostics, next to other per-user application data.
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir().context("could not determine the user data directory")?;
    Ok(data_dir.join(APP_DIR))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_path()?)
}

/// A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))?;

    Ok(config)
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;

    Ok(())
}

/// Load `path` for an edit. A file that no longer parses is replaced by the
/// defaults so the `config` subcommands can repair it.
fn load_for_update(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "replacing unparsable config");
            eprintln!("⚠ invalid config {}, starting from defaults", path.display());
            Ok(Config::default())
        }
    }
}

/// Apply `edit` to the config at `path` and save it back.
pub fn update_config_at(path: &Path, edit: impl FnOnce(&mut Config)) -> Result<Config> {
    let mut config = load_for_update(path)?;
    edit(&mut config);
    save_config_to(&config, path)?;
    Ok(config)
}

pub fn set_log_file(log_file: PathBuf) -> Result<()> {
    let config = update_config_at(&get_config_path()?, |c| c.log_file = log_file)?;
    println!("✓ Log file set to: {}", config.log_file.display());
    Ok(())
}

pub fn set_strict(strict: bool) -> Result<()> {
    let config = update_config_at(&get_config_path()?, |c| c.strict_persistence = strict)?;
    println!("✓ Strict persistence: {}", config.strict_persistence);
    Ok(())
}

pub fn set_shell(shell: ShellKind) -> Result<()> {
    let config = update_config_at(&get_config_path()?, |c| c.shell = shell)?;
    println!("✓ Default shell set to: {:?}", config.shell);
    Ok(())
}

pub fn show_config() -> Result<()> {
    let config = load_config()?;
    println!("Current configuration:");
    println!("  Log file:           {}", config.log_file.display());
    println!("  Strict persistence: {}", config.strict_persistence);
    println!("  Default shell:      {:?}", config.shell);
    println!();
    println!("Config file: {}", get_config_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.persistence_mode(), PersistenceMode::BestEffort);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "strict_persistence = true\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert!(config.strict_persistence);
        assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(config.persistence_mode(), PersistenceMode::Strict);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            log_file: PathBuf::from("/var/tmp/done.csv"),
            strict_persistence: true,
            shell: ShellKind::Menu,
        };

        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_shell_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "shell = \"gui\"\n").unwrap();
        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn test_update_repairs_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "shell = \"gui\"\nlog_file = [\n").unwrap();

        let config = update_config_at(&path, |c| c.strict_persistence = true).unwrap();
        assert!(config.strict_persistence);
        assert_eq!(config.shell, ShellKind::Tui);
        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn test_update_keeps_other_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "shell = \"menu\"\n").unwrap();

        update_config_at(&path, |c| c.log_file = PathBuf::from("done.csv")).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.shell, ShellKind::Menu);
        assert_eq!(config.log_file, PathBuf::from("done.csv"));
    }
}
