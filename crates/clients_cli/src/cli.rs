//! Command-line surface and config resolution.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clients_core::{AppConfig, CustomerId};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "clients",
    version = clients_core::core_version(),
    about = "Customer and phone store backed by SQLite"
)]
pub struct Cli {
    /// TOML config file with `[database]` and `[logging]` sections
    #[arg(long, short, env = "CLIENTS_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database file, or `:memory:`
    #[arg(long, env = "CLIENTS_DB")]
    pub db: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "CLIENTS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files; logging is off without it
    #[arg(long, env = "CLIENTS_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the fixed demonstration sequence (default)
    Demo,
    /// Create the customers and phones tables
    Init,
    /// Add a customer and print its id
    Add {
        first_name: String,
        last_name: String,
        email: String,
    },
    /// Attach a phone number to a customer
    AddPhone {
        customer_id: CustomerId,
        phone_number: String,
    },
    /// Overwrite a customer's name and email
    Update {
        id: CustomerId,
        first_name: String,
        last_name: String,
        email: String,
    },
    /// Remove every matching phone number of a customer
    RemovePhone {
        customer_id: CustomerId,
        phone_number: String,
    },
    /// Remove a customer and all of its phones
    Remove { id: CustomerId },
    /// Exact-match search on first name, last name, email or phone
    Find { term: String },
    /// List all customers with their phones
    List,
}

impl Cli {
    /// Loads the config file (if any) and applies flag/env overrides.
    pub fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => AppConfig::default(),
        };

        if let Some(db) = &self.db {
            config.database.path = db.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(dir) = &self.log_dir {
            config.logging.dir = Some(dir.clone());
        }

        Ok(config)
    }

    pub fn selected_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Demo)
    }
}

impl Command {
    /// Stable subcommand name for log events; arguments are never logged.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Demo => "demo",
            Self::Init => "init",
            Self::Add { .. } => "add",
            Self::AddPhone { .. } => "add-phone",
            Self::Update { .. } => "update",
            Self::RemovePhone { .. } => "remove-phone",
            Self::Remove { .. } => "remove",
            Self::Find { .. } => "find",
            Self::List => "list",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_demo() {
        let cli = Cli::try_parse_from(["clients"]).unwrap();
        assert_eq!(cli.selected_command(), Command::Demo);
    }

    #[test]
    fn flags_override_config_defaults() {
        let cli = Cli::try_parse_from([
            "clients",
            "--db",
            ":memory:",
            "--log-level",
            "warn",
            "list",
        ])
        .unwrap();

        let config = cli.resolve_config().unwrap();
        assert!(config.database.is_memory());
        assert_eq!(config.logging.level, "warn");
        assert_eq!(cli.selected_command(), Command::List);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clients.toml");
        std::fs::write(
            &path,
            "[database]\npath = \"from-file.sqlite3\"\n\n[logging]\nlevel = \"error\"\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "clients",
            "--config",
            path.to_str().unwrap(),
            "--db",
            "from-flag.sqlite3",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.database.path, PathBuf::from("from-flag.sqlite3"));
        assert_eq!(config.logging.level, "error");
    }

    #[test]
    fn subcommand_arguments_are_positional() {
        let cli =
            Cli::try_parse_from(["clients", "add-phone", "7", "+1234567890"]).unwrap();
        assert_eq!(
            cli.selected_command(),
            Command::AddPhone {
                customer_id: 7,
                phone_number: "+1234567890".to_string(),
            }
        );
    }
}
