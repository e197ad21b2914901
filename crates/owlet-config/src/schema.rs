//! Raw settings schema (as parsed from TOML)

use serde::{Deserialize, Serialize};

/// Raw settings as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawSettings {
    /// Settings schema version
    pub config_version: u32,

    /// Daily viewing budget
    pub budget: RawBudget,

    /// On-screen grid
    #[serde(default)]
    pub grid: RawGrid,
}

/// Daily budget section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawBudget {
    /// Countable minutes allowed per UTC day
    pub daily_minutes: u32,
}

/// Grid section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawGrid {
    /// Number of items presented at once
    pub size: usize,
}

impl Default for RawGrid {
    fn default() -> Self {
        Self { size: 9 }
    }
}
