//! Configuration loading from TOML with environment variable overrides.
//!
//! Every section has built-in defaults, so an empty file (or no file at
//! all) yields a working setup against the public Nominatim instance.

use crate::estimation::tables::PricingTables;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub geocoding: GeocodingConfig,
    pub notification: NotificationConfig,
    pub pricing: PricingTables,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// When false every estimate uses the static fallback
    pub enabled: bool,
    pub base_url: String,
    /// Appended to every free-text query
    pub country: String,
    pub country_code: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://nominatim.openstreetmap.org/search".to_string(),
            country: "Switzerland".to_string(),
            country_code: "ch".to_string(),
            user_agent: "EstimationImmo/1.0".to_string(),
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub recipient: String,
    pub subject: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            recipient: "info@immo-rama.ch".to_string(),
            subject: "Nouvelle estimation immobilière".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.check()?;
        Ok(config)
    }

    /// Load `.env`, the file named by `ESTIMATE_CONFIG` (defaults otherwise),
    /// then apply environment overrides
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = match env::var("ESTIMATE_CONFIG") {
            Ok(path) => Self::load(&path)?,
            Err(_) => AppConfig::default(),
        };

        config.apply_overrides(|key| env::var(key).ok())?;
        config.check()?;
        Ok(config)
    }

    /// Apply `HOST`, `PORT`, `GEOCODER_URL`, `GEOCODER_TIMEOUT_SECS`,
    /// `GEOCODING_ENABLED` and `NOTIFY_RECIPIENT` from a variable source
    pub fn apply_overrides<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("PORT") {
            self.server.port = port.parse().context("PORT must be a valid port number")?;
        }
        if let Some(url) = var("GEOCODER_URL") {
            self.geocoding.base_url = url;
        }
        if let Some(secs) = var("GEOCODER_TIMEOUT_SECS") {
            self.geocoding.timeout_secs = secs
                .parse()
                .context("GEOCODER_TIMEOUT_SECS must be a whole number of seconds")?;
        }
        if let Some(enabled) = var("GEOCODING_ENABLED") {
            self.geocoding.enabled = enabled
                .parse()
                .context("GEOCODING_ENABLED must be true or false")?;
        }
        if let Some(recipient) = var("NOTIFY_RECIPIENT") {
            self.notification.recipient = recipient;
        }
        Ok(())
    }

    fn check(&self) -> Result<()> {
        if self.geocoding.timeout_secs == 0 {
            anyhow::bail!("geocoding.timeout_secs must be greater than 0");
        }
        if !(self.pricing.global_baseline.is_finite() && self.pricing.global_baseline > 0.0) {
            anyhow::bail!("pricing.global_baseline must be greater than 0");
        }
        Ok(())
    }
}
