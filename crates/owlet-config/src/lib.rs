//! Parent settings parsing and validation for owlet
//!
//! Supports TOML settings with:
//! - Versioned schema
//! - Daily viewing budget and grid size
//! - Validation with clear error messages
//!
//! Settings are owned by the admin side of the deployment and must take
//! effect immediately when changed, so the host re-reads them for every
//! computation and hands the engine a fresh `&Settings`. Nothing in this
//! crate caches.

mod schema;
mod validation;

pub use schema::*;
pub use validation::*;

use std::path::Path;
use thiserror::Error;

/// Settings errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<ValidationError> },

    #[error("Unsupported settings version: {0}")]
    UnsupportedVersion(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Validated settings handed to every engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Countable viewing allowed per UTC day, in minutes
    pub daily_limit_minutes: u32,

    /// How many items the on-screen grid presents
    pub grid_size: usize,
}

impl Settings {
    pub fn from_raw(raw: RawSettings) -> Self {
        Self {
            daily_limit_minutes: raw.budget.daily_minutes,
            grid_size: raw.grid.size,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            daily_limit_minutes: 30,
            grid_size: 9,
        }
    }
}

/// Load and validate settings from a TOML file
pub fn load_settings(path: impl AsRef<Path>) -> ConfigResult<Settings> {
    let content = std::fs::read_to_string(path)?;
    parse_settings(&content)
}

/// Parse and validate settings from a TOML string
pub fn parse_settings(content: &str) -> ConfigResult<Settings> {
    let raw: RawSettings = toml::from_str(content)?;

    if raw.config_version != CURRENT_CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion(raw.config_version));
    }

    let errors = validate_settings(&raw);
    if !errors.is_empty() {
        return Err(ConfigError::ValidationFailed { errors });
    }

    tracing::debug!(
        daily_minutes = raw.budget.daily_minutes,
        grid_size = raw.grid.size,
        "Settings parsed"
    );

    Ok(Settings::from_raw(raw))
}

/// Current supported settings version
pub const CURRENT_CONFIG_VERSION: u32 = 1;
