// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Credential for the legacy keyed XML reports (margin forecast, system
    /// warnings). Leave unset to skip those categories.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Carbon intensity region id to track alongside the national figure
    #[serde(default)]
    pub carbon_region_id: Option<u32>,

    /// System configuration
    #[serde(default)]
    pub system: SystemConfig,
}

/// System configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Outer tick period (seconds); the per-category scheduler decides the
    /// finer-grained no-ops within it
    #[serde(default = "default_update_interval_secs")]
    pub update_interval_secs: u64,

    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Where the published snapshot JSON lands
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            update_interval_secs: default_update_interval_secs(),
            log_level: default_log_level(),
            snapshot_path: default_snapshot_path(),
        }
    }
}

fn default_update_interval_secs() -> u64 {
    120 // 2-minute outer tick; the tightest category interval matches it
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_snapshot_path() -> String {
    "snapshot.json".to_owned()
}

impl AppConfig {
    /// Load configuration from config.toml or config.json, falling back to
    /// defaults with environment overrides.
    pub fn load() -> Result<Self> {
        if let Ok(config_str) = std::fs::read_to_string("config.toml") {
            let config: AppConfig =
                toml::from_str(&config_str).context("Failed to parse config.toml")?;
            info!("Loaded configuration from config.toml");
            config.validate()?;
            return Ok(config);
        }

        if let Ok(config_str) = std::fs::read_to_string("config.json") {
            let config: AppConfig =
                serde_json::from_str(&config_str).context("Failed to parse config.json")?;
            info!("Loaded configuration from config.json");
            config.validate()?;
            return Ok(config);
        }

        warn!("No configuration file found, using defaults with environment overrides");
        let config = Self::from_env();
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables (development/testing)
    fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(key) = std::env::var("GRIDION_API_KEY") {
            config.api_key = Some(key);
        }
        if let Ok(region) = std::env::var("GRIDION_REGION_ID")
            && let Ok(id) = region.parse::<u32>()
        {
            config.carbon_region_id = Some(id);
        }
        if let Ok(path) = std::env::var("GRIDION_SNAPSHOT_PATH") {
            config.system.snapshot_path = path;
        }
        if let Ok(interval) = std::env::var("UPDATE_INTERVAL_SECS")
            && let Ok(secs) = interval.parse::<u64>()
        {
            config.system.update_interval_secs = secs;
        }

        config
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.system.update_interval_secs < 30 {
            anyhow::bail!("update_interval_secs must be at least 30 seconds");
        }
        if self.system.update_interval_secs > 600 {
            warn!(
                "update_interval_secs is very high ({}s), most categories will lag their cadence",
                self.system.update_interval_secs
            );
        }

        if self.system.snapshot_path.is_empty() {
            anyhow::bail!("snapshot_path cannot be empty");
        }

        if let Some(region_id) = self.carbon_region_id
            && !(1..=17).contains(&region_id)
        {
            anyhow::bail!(
                "carbon_region_id must be between 1 and 17, got {}",
                region_id
            );
        }

        if let Some(ref key) = self.api_key
            && key.is_empty()
        {
            anyhow::bail!("api_key must not be an empty string; omit it instead");
        }

        Ok(())
    }

    /// Get update interval as Duration
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.system.update_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.system.update_interval_secs, 120);
        assert_eq!(config.system.snapshot_path, "snapshot.json");
        assert!(config.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_interval_too_low() {
        let mut config = AppConfig::default();
        config.system.update_interval_secs = 10;

        assert!(config.validate().is_err());
        assert!(
            config
                .validate()
                .unwrap_err()
                .to_string()
                .contains("at least 30 seconds")
        );
    }

    #[test]
    fn test_validate_empty_snapshot_path() {
        let mut config = AppConfig::default();
        config.system.snapshot_path = String::new();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_region_out_of_range() {
        let mut config = AppConfig::default();
        config.carbon_region_id = Some(42);

        assert!(config.validate().is_err());

        config.carbon_region_id = Some(13);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_api_key() {
        let mut config = AppConfig::default();
        config.api_key = Some(String::new());

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AppConfig {
            api_key: Some("key-123".to_owned()),
            carbon_region_id: Some(13),
            system: SystemConfig {
                update_interval_secs: 180,
                log_level: "debug".to_owned(),
                snapshot_path: "/var/lib/gridion/snapshot.json".to_owned(),
            },
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(deserialized.api_key.as_deref(), Some("key-123"));
        assert_eq!(deserialized.carbon_region_id, Some(13));
        assert_eq!(deserialized.system.update_interval_secs, 180);
    }

    #[test]
    fn test_json_partial_config_uses_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"carbon_region_id": 7}"#).unwrap();

        assert_eq!(config.carbon_region_id, Some(7));
        assert_eq!(config.system.update_interval_secs, 120);
        assert!(config.validate().is_ok());
    }
}
