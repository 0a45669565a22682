//! Environment variable sources.
//!
//! Fallback credentials come from environment-style key-value
//! configuration. The [`EnvSource`] seam keeps descriptor construction
//! testable without mutating the process environment, and the typed
//! accessors carry the fallback defaults (a local postgres instance) so
//! every caller resolves the same keys the same way.

use std::collections::HashMap;

use crate::descriptor::DEFAULT_PORT;

/// Environment key for the fallback database host.
pub const ENV_DB_HOST: &str = "DB_HOST";
/// Environment key for the fallback database port.
pub const ENV_PORT: &str = "PORT";
/// Environment key for the fallback database name.
pub const ENV_DB_NAME: &str = "DB_NAME";
/// Environment key for the fallback database user.
pub const ENV_DB_USER: &str = "DB_USER";
/// Environment key for the fallback database password.
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";

/// Source for environment variables.
pub trait EnvSource: Send + Sync {
    /// Get an environment variable value.
    fn get(&self, name: &str) -> Option<String>;

    /// Check if a variable exists.
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Get a variable, treating an empty value as absent.
    fn get_nonempty(&self, name: &str) -> Option<String> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// The fallback database host (`DB_HOST`), default `localhost`.
    fn db_host(&self) -> String {
        self.get_nonempty(ENV_DB_HOST)
            .unwrap_or_else(|| "localhost".to_string())
    }

    /// The fallback database port (`PORT`), default 5432.
    ///
    /// Unparseable values fall back to the default rather than fail.
    fn db_port(&self) -> u16 {
        self.get(ENV_PORT)
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT)
    }

    /// The fallback database name (`DB_NAME`), default `postgres`.
    fn db_name(&self) -> String {
        self.get_nonempty(ENV_DB_NAME)
            .unwrap_or_else(|| "postgres".to_string())
    }

    /// The fallback database user (`DB_USER`), default `postgres`.
    fn db_user(&self) -> String {
        self.get_nonempty(ENV_DB_USER)
            .unwrap_or_else(|| "postgres".to_string())
    }

    /// The fallback database password (`DB_PASSWORD`), default empty.
    fn db_password(&self) -> String {
        self.get(ENV_DB_PASSWORD).unwrap_or_default()
    }
}

/// Default environment source using std::env.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Environment source backed by a HashMap.
#[derive(Debug, Clone, Default)]
pub struct MapEnvSource {
    vars: HashMap<String, String>,
}

impl MapEnvSource {
    /// Create a new map-based environment source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Add multiple variables.
    pub fn with_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.vars.extend(vars);
        self
    }
}

impl EnvSource for MapEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}
