use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::TrackerError;

/// Default config file, next to the binary's working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Pool of selectable hours in a UTC day
pub const HOURS_PER_DAY: u8 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_url: String,
    pub quote_currency: String,
    pub primary: AssetConfig,
    pub secondary: AssetConfig,
    pub schedule: ScheduleConfig,
    pub request_timeout_secs: u64,
    pub csv_path: String,
}

/// One tracked asset: CoinGecko id plus the label used in the CSV header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Salt mixed into the per-date seed so unrelated deployments get
    /// unrelated plans
    pub salt: String,
    /// Inclusive bounds for the number of runs per day
    pub min_runs: u8,
    pub max_runs: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "https://api.coingecko.com/api/v3/simple/price".to_string(),
            quote_currency: "usd".to_string(),
            primary: AssetConfig {
                id: "bitcoin".to_string(),
                label: "Bitcoin".to_string(),
            },
            secondary: AssetConfig {
                id: "ethereum".to_string(),
                label: "Ethereum".to_string(),
            },
            schedule: ScheduleConfig {
                salt: "crypto-price-tracker-v1".to_string(),
                // [1,5] keeps free-tier API volume low; the historical
                // variant with [1,15] is a config change away
                min_runs: 1,
                max_runs: 5,
            },
            request_timeout_secs: 20,
            csv_path: "prices.csv".to_string(),
        }
    }
}

impl Config {
    /// Loads the config file, writing defaults first if it does not exist
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            let default_config = Self::default();
            default_config.save(path)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .with_context(|| "Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }

    /// Startup validation, must pass before any fetch is attempted
    pub fn validate(&self) -> Result<(), TrackerError> {
        self.schedule.validate()?;

        if self.primary.id.is_empty() || self.secondary.id.is_empty() {
            return Err(TrackerError::Config("asset ids must be non-empty".to_string()));
        }
        if self.api_url.is_empty() {
            return Err(TrackerError::Config("api_url must be non-empty".to_string()));
        }
        if self.csv_path.is_empty() {
            return Err(TrackerError::Config("csv_path must be non-empty".to_string()));
        }

        Ok(())
    }
}

impl ScheduleConfig {
    /// Rejects run-count ranges that the 24-hour pool cannot satisfy
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.salt.is_empty() {
            return Err(TrackerError::Config("schedule.salt must be non-empty".to_string()));
        }
        if self.min_runs == 0 {
            return Err(TrackerError::Config("schedule.min_runs must be at least 1".to_string()));
        }
        if self.min_runs > self.max_runs {
            return Err(TrackerError::Config(format!(
                "schedule.min_runs ({}) exceeds schedule.max_runs ({})",
                self.min_runs, self.max_runs
            )));
        }
        if self.max_runs > HOURS_PER_DAY {
            return Err(TrackerError::Config(format!(
                "schedule.max_runs ({}) exceeds the {} available hour slots",
                self.max_runs, HOURS_PER_DAY
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.schedule.salt, "crypto-price-tracker-v1");
        assert_eq!(config.request_timeout_secs, 20);
    }

    #[test]
    fn test_zero_min_runs_rejected() {
        let mut config = Config::default();
        config.schedule.min_runs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut config = Config::default();
        config.schedule.min_runs = 10;
        config.schedule.max_runs = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_range_beyond_hour_pool_rejected() {
        let mut config = Config::default();
        config.schedule.max_runs = 25;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_full_day_range_allowed() {
        let mut config = Config::default();
        config.schedule.min_runs = 24;
        config.schedule.max_runs = 24;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_salt_rejected() {
        let mut config = Config::default();
        config.schedule.salt = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let path_str = path.to_str().unwrap();

        let loaded = Config::load(path_str).unwrap();
        assert!(path.exists());
        assert_eq!(loaded.primary.id, "bitcoin");

        // Second load reads the file instead of rewriting it
        let reloaded = Config::load(path_str).unwrap();
        assert_eq!(reloaded.secondary.id, "ethereum");
        assert_eq!(reloaded.schedule.max_runs, 5);
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Config::load(path.to_str().unwrap()).is_err());
    }
}
