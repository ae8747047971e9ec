//! Configuration management for the orchard engine service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with ORCHARD_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{EngineSettings, HarvestCalendar, DEFAULT_MAX_RELOCATION_METERS};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Engine thresholds and the fallback harvest calendar
    #[serde(default)]
    pub engine: EngineSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("ORCHARD_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let calendar = HarvestCalendar::default();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("engine.max_relocation_meters", DEFAULT_MAX_RELOCATION_METERS)?
            .set_default(
                "engine.harvest_calendar.cutoff_month",
                i64::from(calendar.cutoff_month),
            )?
            .set_default(
                "engine.harvest_calendar.season_end_month",
                i64::from(calendar.season_end_month),
            )?
            .set_default(
                "engine.harvest_calendar.season_end_day",
                i64::from(calendar.season_end_day),
            )?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (ORCHARD_ prefix)
            .add_source(
                Environment::with_prefix("ORCHARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            engine: EngineSettings::default(),
        }
    }
}
