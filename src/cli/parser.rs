//! Command-line definition for the `workforce-rs` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Environment;

#[derive(Parser, Debug)]
#[command(name = "workforce-rs")]
#[command(about = "HR backend: employees, departments and role-based access")]
#[command(long_about = "
HR backend serving authentication, employee and department records and
role dashboards over JSON, on PostgreSQL or an in-memory store.

Settings come from config/default.toml, config/{env}.toml, config/local.toml
and WORKFORCE_* variables, in that order; flags below win over all of them.

EXAMPLES:
    # Try the API without a database (data is lost on exit)
    workforce-rs serve --memory

    # Serve with the production overlay on all interfaces
    WORKFORCE_JWT__SECRET=... workforce-rs --env prod serve --host 0.0.0.0

    # Print the bind address, store and bootstrap admin, then exit
    workforce-rs serve --dry-run

    # Create or upgrade the users and departments tables
    workforce-rs migrate

    # Undo the newest migration
    workforce-rs migrate --rollback 1
")]
#[command(version = crate::build::CLAP_LONG_VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Read this TOML file instead of the layered config directory
    ///
    /// `WORKFORCE_*` variables still apply on top of it.
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Overlay to load from the config directory; replaces WORKFORCE_APP_ENV
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Log errors only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the HTTP API (the default when no command is given)
    ///
    /// Opens the store, creates the bootstrap administrator when one is
    /// configured and none exists, then listens until Ctrl+C or SIGTERM.
    Serve {
        /// Interface to bind, e.g. 127.0.0.1 or 0.0.0.0
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Use the in-memory store regardless of database.url
        #[arg(long)]
        memory: bool,

        /// Log level for this run; beats --verbose and --quiet
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate the settings, print a summary and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Apply, list or revert the PostgreSQL schema migrations
    ///
    /// Refuses to run when database.url is `memory://`.
    Migrate {
        /// List pending migrations without applying them
        #[arg(long, conflicts_with = "rollback")]
        dry_run: bool,

        /// Revert this many of the newest migrations (1 to 100)
        #[arg(long, value_name = "STEPS", value_parser = super::validation::validate_rollback_steps)]
        rollback: Option<u32>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    #[value(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Cli {
    /// Checks that span several arguments and so cannot be clap rules.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(Commands::Serve {
            host: Some(host),
            port: Some(port),
            ..
        }) = &self.command
            && host == "0.0.0.0"
            && *port < 1024
        {
            return Err(format!(
                "Port {} on 0.0.0.0 needs elevated privileges; pick a port of 1024 or above \
                 and put a reverse proxy in front",
                port
            ));
        }

        Ok(())
    }

    /// The command to run; no subcommand means a plain `serve`.
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve {
            host: None,
            port: None,
            memory: false,
            log_level: None,
            dry_run: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("workforce-rs").chain(args.iter().copied()))
    }

    #[test]
    fn test_command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command_means_serve() {
        let cli = parse(&[]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(
            cli.command_or_default(),
            Commands::Serve { memory: false, dry_run: false, .. }
        ));
    }

    #[test]
    fn test_serve_memory_flag() {
        let cli = parse(&["serve", "--memory", "--port", "9000"]).unwrap();
        match cli.command_or_default() {
            Commands::Serve { memory, port, host, .. } => {
                assert!(memory);
                assert_eq!(port, Some(9000));
                assert!(host.is_none());
            }
            other => panic!("Expected Serve, got {:?}", other),
        }

        assert_eq!(
            parse(&["migrate", "--memory"]).unwrap_err().kind(),
            ErrorKind::UnknownArgument
        );
    }

    #[test]
    fn test_env_accepts_config_names_and_aliases() {
        for (arg, expected) in [
            ("dev", Environment::Development),
            ("test", Environment::Test),
            ("stage", Environment::Staging),
            ("production", Environment::Production),
        ] {
            let cli = parse(&["--env", arg]).unwrap();
            assert_eq!(cli.env, Some(expected));
        }
        assert_eq!(
            parse(&["--env", "qa"]).unwrap_err().kind(),
            ErrorKind::InvalidValue
        );
    }

    #[test]
    fn test_migrate_flags() {
        let cli = parse(&["migrate", "--rollback", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Migrate { dry_run: false, rollback: Some(2) })
        ));

        assert_eq!(
            parse(&["migrate", "--dry-run", "--rollback", "1"]).unwrap_err().kind(),
            ErrorKind::ArgumentConflict
        );
        assert_eq!(
            parse(&["migrate", "--rollback", "500"]).unwrap_err().kind(),
            ErrorKind::ValueValidation
        );
    }

    #[test]
    fn test_log_level_flags() {
        let cli = parse(&["serve", "--log-level", "warning"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Serve { log_level: Some(LogLevel::Warn), .. })
        ));
        assert_eq!(LogLevel::Trace.as_str(), "trace");

        assert_eq!(
            parse(&["--verbose", "--quiet"]).unwrap_err().kind(),
            ErrorKind::ArgumentConflict
        );
    }

    #[test]
    fn test_privileged_port_on_all_interfaces() {
        let cli = parse(&["serve", "--host", "0.0.0.0", "--port", "80"]).unwrap();
        let reason = cli.validate().unwrap_err();
        assert!(reason.contains("Port 80"));

        assert!(parse(&["serve", "--host", "127.0.0.1", "--port", "80"])
            .unwrap()
            .validate()
            .is_ok());
        assert!(parse(&["serve", "--host", "0.0.0.0", "--port", "8080"])
            .unwrap()
            .validate()
            .is_ok());
    }

    #[test]
    fn test_help_describes_memory_store() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("serve --memory"));
        assert!(help.contains("WORKFORCE_*"));
    }
}
