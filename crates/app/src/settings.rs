//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` and from `FINDING_TORY__*` environment variables,
//! the latter taking precedence.
//!
//! ```toml
//! read_only = false
//!
//! [app]
//! level = "info"
//!
//! [database]
//! sqlite = "finding_tory.db"
//! ```
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub database: Database,
    /// Reads work as usual, writes are skipped.
    pub read_only: bool,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("database", "memory")?
            .set_default("read_only", false)?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("FINDING_TORY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
