//! Serve command handler
//!
//! Starts the HTTP server, or with `--dry-run` only reports what it would do.

use crate::config::settings::Settings;
use crate::error::{AppError, AppResult};
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Run the server until a shutdown signal, or validate and return when
    /// `dry_run` is set.
    ///
    /// # Errors
    /// - Configuration validation errors
    /// - Store, bind or runtime errors from [`Server::run`]
    pub async fn execute(&self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            return self.validate_only();
        }

        Server::new(self.config.clone())
            .run()
            .await
            .map_err(|source| AppError::Internal { source })
    }

    /// Validate configuration without starting the server
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        let backend = if self.config.database.is_memory() {
            "in-memory store"
        } else {
            "PostgreSQL"
        };

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!("✓ Storage backend: {}", backend);
        println!(
            "✓ Bootstrap administrator: {}",
            match self.config.bootstrap.admin_credentials() {
                Some((email, _)) => email,
                None => "not configured",
            }
        );
        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
