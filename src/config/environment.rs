//! Deployment environment.
//!
//! Picks the `config/{name}.toml` overlay and can come from
//! `WORKFORCE_APP_ENV` or `--env`; both accept the same names and aliases.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local work; ships a throwaway JWT secret and the bootstrap admin
    #[default]
    #[value(alias = "dev")]
    Development,
    /// Automated test runs against the in-memory store
    Test,
    #[value(alias = "stage")]
    Staging,
    /// Secrets must come from `WORKFORCE_*` variables
    #[value(alias = "prod")]
    Production,
}

impl Environment {
    /// Variable consulted by [`Environment::from_env`].
    pub const ENV_VAR: &'static str = "WORKFORCE_APP_ENV";

    pub const ALL: [Environment; 4] = [
        Environment::Development,
        Environment::Test,
        Environment::Staging,
        Environment::Production,
    ];

    /// `WORKFORCE_APP_ENV`, or `Development` when unset or unrecognised.
    pub fn from_env() -> Self {
        std::env::var(Self::ENV_VAR)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    fn alias(&self) -> Option<&'static str> {
        match self {
            Environment::Development => Some("dev"),
            Environment::Test => None,
            Environment::Staging => Some("stage"),
            Environment::Production => Some("prod"),
        }
    }

    /// Overlay file layered over `default.toml`.
    pub fn overlay_file(&self) -> String {
        format!("{}.toml", self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|env| {
                wanted.eq_ignore_ascii_case(env.as_str())
                    || env.alias().is_some_and(|a| wanted.eq_ignore_ascii_case(a))
            })
            .ok_or_else(|| ConfigError::UnknownEnvironment(value.to_string()))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
