//! Errors raised while assembling [`Settings`](crate::config::Settings).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// `default.toml` or the `--config` file is absent
    #[error("Configuration file {} does not exist", .path.display())]
    MissingFile { path: PathBuf },

    /// A source could not be read, or the merged result does not fit `Settings`
    #[error("Could not load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value broke one of the settings rules
    #[error("Invalid setting `{field}`: {message}")]
    Invalid { field: String, message: String },

    #[error("Unknown environment '{0}'; use development, test, staging or production")]
    UnknownEnvironment(String),
}

impl ConfigError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn missing_file(path: impl Into<PathBuf>) -> Self {
        ConfigError::MissingFile { path: path.into() }
    }

    /// Dotted settings key the error is about, e.g. `jwt.secret`.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::Invalid { field, .. } => Some(field),
            ConfigError::UnknownEnvironment(_) => Some("environment"),
            ConfigError::MissingFile { .. } | ConfigError::Load(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_of_invalid_setting() {
        let err = ConfigError::validation("server.port", "Port must be between 1 and 65535");
        assert_eq!(err.field(), Some("server.port"));
        assert_eq!(
            err.to_string(),
            "Invalid setting `server.port`: Port must be between 1 and 65535"
        );
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let err = ConfigError::missing_file("config/default.toml");
        assert!(err.field().is_none());
        assert!(err.to_string().contains("config/default.toml"));
    }

    #[test]
    fn test_load_errors_convert() {
        let err: ConfigError = config::ConfigError::NotFound("jwt.secret".to_string()).into();
        assert!(matches!(err, ConfigError::Load(_)));
        assert!(err.field().is_none());
    }
}
