//! Configuration Loader
//!
//! Layers an optional configuration file (format taken from its extension)
//! under `ACTORS__SECTION__KEY` environment overrides, then validates.

use std::collections::HashMap;
use std::env;
use std::path::Path;

use config::{Config, Environment, File};
use tracing::debug;

use super::ActorsConfig;
use crate::error::Result;

/// Prefix for environment overrides, e.g. `ACTORS__SCHEDULER__MAX_CONCURRENT=4`
pub const ENV_PREFIX: &str = "ACTORS";

/// Detect the deployment environment
pub fn detect_environment() -> String {
    env::var("ACTORS_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
        .to_lowercase()
}

impl ActorsConfig {
    /// Load from an optional file plus process environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_overrides(path, None)
    }

    /// Defaults plus process environment overrides
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Load with an explicit override map instead of the process environment
    ///
    /// Keys use the same shape as environment variables
    /// (`ACTORS__WORKER__ERROR_MODE`). Useful for tests that must not touch
    /// global state.
    pub fn load_with_overrides(
        path: Option<&Path>,
        overrides: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading actor configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }

        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .source(overrides);

        let config: ActorsConfig = builder.add_source(environment).build()?.try_deserialize()?;
        config.validate()?;

        debug!(
            environment = %detect_environment(),
            mailbox_capacity = config.mailbox.capacity,
            scheduler_max_concurrent = config.scheduler.max_concurrent,
            error_mode = %config.worker.error_mode,
            throttles = config.throttles.len(),
            "Actor configuration loaded"
        );

        Ok(config)
    }
}
