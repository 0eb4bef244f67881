//! Merges CLI overrides on top of file and environment configuration
//!
//! Precedence, lowest first: config files, `WORKFORCE_*` variables, global
//! flags (`--verbose`/`--quiet`), then subcommand flags.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Settings};
use crate::db::MEMORY_URL;

pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the unvalidated base configuration the CLI points at.
    ///
    /// `--config` switches the loader to single-file mode and `--env`
    /// replaces `WORKFORCE_APP_ENV`; neither touches the process environment.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        Self::from_loader(Self::loader_for(cli))
    }

    pub fn from_loader(loader: ConfigLoader) -> Result<Self, ConfigError> {
        Ok(Self::new(loader.load_unvalidated()?))
    }

    pub fn loader_for(cli: &Cli) -> ConfigLoader {
        let mut loader = ConfigLoader::new();

        if let Some(path) = &cli.config {
            loader = loader.with_file(path);
        }

        if let Some(env) = cli.env {
            loader = loader.with_environment(env);
        }

        loader
    }

    /// Apply CLI overrides and validate the result.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        Self::apply_global_overrides(&mut config, cli);

        Self::apply_command_overrides(&mut config, &cli.command_or_default());

        config.validate()?;

        Ok(config)
    }

    fn apply_global_overrides(config: &mut Settings, cli: &Cli) {
        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }
    }

    fn apply_command_overrides(config: &mut Settings, command: &Commands) {
        match command {
            Commands::Serve {
                host,
                port,
                memory,
                log_level,
                dry_run: _,
            } => {
                if let Some(host_addr) = host {
                    config.server.host = host_addr.clone();
                }

                if let Some(port_num) = port {
                    config.server.port = *port_num;
                }

                if *memory {
                    config.database.url = MEMORY_URL.to_string();
                }

                // Subcommand level beats --verbose/--quiet
                if let Some(level) = log_level {
                    config.logger.level = level.as_str().to_string();
                }
            }
            Commands::Migrate { .. } => {}
        }
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parser::Cli;
    use crate::config::Environment;
    use clap::Parser;

    fn valid_base_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "memory://".to_string();
        config.jwt.secret = "s".repeat(32);
        config
    }

    fn merge(args: &[&str]) -> Result<Settings, ConfigError> {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(valid_base_config()).merge_cli_args(&cli)
    }

    #[test]
    fn test_merger_keeps_base_config() {
        let base_config = valid_base_config();
        let merger = ConfigurationMerger::new(base_config.clone());
        assert_eq!(merger.config(), &base_config);
    }

    #[test]
    fn test_verbose_and_quiet_flags() {
        assert_eq!(merge(&["workforce-rs", "--verbose"]).unwrap().logger.level, "debug");
        assert_eq!(merge(&["workforce-rs", "--quiet"]).unwrap().logger.level, "error");
    }

    #[test]
    fn test_serve_host_and_port() {
        let merged = merge(&["workforce-rs", "serve", "--host", "0.0.0.0", "--port", "9090"]).unwrap();
        assert_eq!(merged.server.host, "0.0.0.0");
        assert_eq!(merged.server.port, 9090);
    }

    #[test]
    fn test_serve_memory_replaces_database_url() {
        let mut base = valid_base_config();
        base.database.url = "postgres://db.internal/workforce".to_string();
        let cli = Cli::try_parse_from(["workforce-rs", "serve", "--memory"]).unwrap();

        let merged = ConfigurationMerger::new(base.clone()).merge_cli_args(&cli).unwrap();
        assert!(merged.database.is_memory());

        let cli = Cli::try_parse_from(["workforce-rs", "serve"]).unwrap();
        let merged = ConfigurationMerger::new(base).merge_cli_args(&cli).unwrap();
        assert!(!merged.database.is_memory());
    }

    #[test]
    fn test_command_log_level_overrides_global() {
        let merged = merge(&["workforce-rs", "--verbose", "serve", "--log-level", "warn"]).unwrap();
        assert_eq!(merged.logger.level, "warn");
    }

    #[test]
    fn test_merged_config_is_validated() {
        let cli = Cli::try_parse_from(["workforce-rs", "serve"]).unwrap();
        let result = ConfigurationMerger::new(Settings::default()).merge_cli_args(&cli);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_loader_for_env_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("single.toml");
        std::fs::write(
            &file,
            "[database]\nurl = \"memory://\"\n[jwt]\nsecret = \"0123456789abcdef0123456789abcdef\"\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "workforce-rs",
            "--env",
            "staging",
            "--config",
            file.to_str().unwrap(),
            "serve",
        ])
        .unwrap();

        let loader = ConfigurationMerger::loader_for(&cli);
        assert_eq!(loader.environment(), Environment::Staging);

        let merged = ConfigurationMerger::from_loader(loader)
            .unwrap()
            .merge_cli_args(&cli)
            .unwrap();
        assert!(merged.database.is_memory());
    }
}
