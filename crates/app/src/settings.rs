//! Handles settings for the application. Configuration is read from
//! `config/budget.toml` (or the file given with `--config`) and can be
//! overridden with `SEMESTER_BUDGET_*` environment variables, using `__` to
//! separate nested keys, e.g. `SEMESTER_BUDGET_APP__LEVEL=debug`.
//!
//! See `config/budget.toml` for the configuration.
use config::{Config, Environment, File};
use serde::Deserialize;

use engine::BudgetConfig;

use crate::error::Result;

pub const DEFAULT_CONFIG_PATH: &str = "config/budget.toml";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    /// Log level of the application crates.
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub budget: BudgetConfig,
}

impl Settings {
    pub fn load(path: Option<&str>) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path.unwrap_or(DEFAULT_CONFIG_PATH)).required(false))
            .add_source(
                Environment::with_prefix("SEMESTER_BUDGET")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
