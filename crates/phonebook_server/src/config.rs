//! Server configuration from CLI flags and environment.
//!
//! # Invariants
//! - Every setting has a flag, an environment fallback, and (except the
//!   log directory) a default.
//! - `ServerConfig` is validated before the store is opened or a socket bound.

use anyhow::Result;
use clap::Parser;
use phonebook_core::db::IN_MEMORY_DATABASE;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_DATABASE: &str = "phonebook.sqlite3";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone, Parser)]
#[command(name = "phonebook-server", version, about = "Phonebook REST API server")]
pub struct CliArgs {
    #[arg(
        long,
        env = "PHONEBOOK_DATABASE",
        value_name = "CONN",
        default_value = DEFAULT_DATABASE,
        help = "SQLite database file, or `:memory:` for a throwaway database"
    )]
    pub database: String,

    #[arg(
        long,
        env = "PHONEBOOK_HOST",
        value_name = "ADDR",
        default_value = DEFAULT_HOST,
        help = "Interface address to listen on"
    )]
    pub host: IpAddr,

    #[arg(
        long,
        env = "PORT",
        value_name = "PORT",
        default_value_t = DEFAULT_PORT,
        help = "TCP port to listen on"
    )]
    pub port: u16,

    #[arg(
        long,
        env = "PHONEBOOK_LOG_LEVEL",
        value_name = "LEVEL",
        help = "trace|debug|info|warn|error (defaults by build mode)"
    )]
    pub log_level: Option<String>,

    #[arg(
        long,
        env = "PHONEBOOK_LOG_DIR",
        value_name = "DIR",
        help = "Absolute directory for rolling log files; stderr only when unset"
    )]
    pub log_dir: Option<String>,
}

/// Where person records live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    Memory,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database: DatabaseTarget,
    pub bind_address: SocketAddr,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl ServerConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let CliArgs {
            database,
            host,
            port,
            log_level,
            log_dir,
        } = args;

        let database = database.trim();
        anyhow::ensure!(!database.is_empty(), "database connection string cannot be empty");
        let database = if database == IN_MEMORY_DATABASE {
            DatabaseTarget::Memory
        } else {
            DatabaseTarget::File(PathBuf::from(database))
        };

        let log_level = log_level
            .map(|level| level.trim().to_string())
            .filter(|level| !level.is_empty())
            .unwrap_or_else(|| phonebook_core::default_log_level().to_string());

        let log_dir = log_dir
            .map(|dir| dir.trim().to_string())
            .filter(|dir| !dir.is_empty());

        Ok(Self {
            database,
            bind_address: SocketAddr::new(host, port),
            log_level,
            log_dir,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if let DatabaseTarget::File(path) = &self.database {
            anyhow::ensure!(
                !path.is_dir(),
                "database path `{}` is a directory",
                path.display()
            );
        }
        if let Some(dir) = &self.log_dir {
            anyhow::ensure!(
                std::path::Path::new(dir).is_absolute(),
                "log directory must be an absolute path, got `{dir}`"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CliArgs, DatabaseTarget, ServerConfig};
    use clap::Parser;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> ServerConfig {
        let argv = std::iter::once("phonebook-server").chain(args.iter().copied());
        let cli = CliArgs::try_parse_from(argv).expect("arguments should parse");
        ServerConfig::from_args(cli).expect("config should build")
    }

    #[test]
    fn explicit_flags_override_defaults() {
        let config = parse(&[
            "--database",
            "/tmp/people.sqlite3",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--log-level",
            "warn",
        ]);

        assert_eq!(
            config.database,
            DatabaseTarget::File(PathBuf::from("/tmp/people.sqlite3"))
        );
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "warn");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn memory_connection_string_selects_in_memory_database() {
        let config = parse(&["--database", ":memory:", "--port", "3001"]);
        assert_eq!(config.database, DatabaseTarget::Memory);
    }

    #[test]
    fn relative_log_dir_fails_validation() {
        let config = parse(&["--database", ":memory:", "--port", "3001", "--log-dir", "logs"]);
        let err = config.validate().expect_err("relative log dir must fail");
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn non_numeric_port_is_rejected_by_parser() {
        let result = CliArgs::try_parse_from([
            "phonebook-server",
            "--database",
            ":memory:",
            "--port",
            "http",
        ]);
        assert!(result.is_err());
    }
}
