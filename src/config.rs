use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const SETTINGS_FILE: &str = "settings.json";

/// Operator preferences persisted between runs. Anything absent falls back
/// to the environment, then to the built-in default.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SavedSettings {
    pub api_base: Option<String>,
    pub market_poll_interval_secs: Option<u64>,
    pub exposure_poll_interval_secs: Option<u64>,
    pub require_live_data: Option<bool>,
    pub execution_pacing_ms: Option<u64>,
    pub round_contracts: Option<bool>,
}

impl SavedSettings {
    pub fn load() -> Self {
        let path = Path::new(SETTINGS_FILE);
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str(&contents) {
                    Ok(s) => return s,
                    Err(e) => tracing::warn!("failed to parse {SETTINGS_FILE}: {e}"),
                },
                Err(e) => tracing::warn!("failed to read {SETTINGS_FILE}: {e}"),
            }
        }
        Self::default()
    }

    pub fn save(&self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(SETTINGS_FILE, json) {
                    tracing::warn!("failed to write {SETTINGS_FILE}: {e}");
                }
            }
            Err(e) => tracing::warn!("failed to serialize settings: {e}"),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            api_base: Some(config.api_base.clone()),
            market_poll_interval_secs: Some(config.market_poll_interval_secs),
            exposure_poll_interval_secs: Some(config.exposure_poll_interval_secs),
            require_live_data: Some(config.require_live_data),
            execution_pacing_ms: Some(config.execution_pacing_ms),
            round_contracts: Some(config.round_contracts),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Base URL of the Atticus backend, e.g. http://localhost:5000
    pub api_base: String,
    pub request_timeout_secs: u64,

    pub market_poll_interval_secs: u64,
    pub exposure_poll_interval_secs: u64,

    /// Refuse workflow-advancing calls unless the last market poll was live
    /// and the backend echoes a LIVE_MARKET_DATA tag.
    pub require_live_data: bool,
    /// Pause between strategy selection and execution. UX pacing only.
    pub execution_pacing_ms: u64,
    /// Show contract counts as whole BTC instead of two decimals.
    pub round_contracts: bool,

    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let saved = SavedSettings::load();

        Ok(Self {
            api_base: saved.api_base
                .unwrap_or_else(|| env_or("ATTICUS_API_BASE", "http://localhost:5000")),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", "10")
                .parse()
                .context("invalid REQUEST_TIMEOUT_SECS")?,

            market_poll_interval_secs: saved.market_poll_interval_secs
                .unwrap_or_else(|| env_or("MARKET_POLL_INTERVAL_SECS", "30").parse().unwrap_or(30)),
            exposure_poll_interval_secs: saved.exposure_poll_interval_secs
                .unwrap_or_else(|| env_or("EXPOSURE_POLL_INTERVAL_SECS", "30").parse().unwrap_or(30)),

            require_live_data: saved.require_live_data
                .unwrap_or_else(|| env_or("REQUIRE_LIVE_DATA", "true").parse().unwrap_or(true)),
            execution_pacing_ms: saved.execution_pacing_ms
                .unwrap_or_else(|| env_or("EXECUTION_PACING_MS", "1200").parse().unwrap_or(1200)),
            round_contracts: saved.round_contracts
                .unwrap_or_else(|| env_or("ROUND_CONTRACTS", "false").parse().unwrap_or(false)),

            log_level: env_or("LOG_LEVEL", "info"),
        })
    }

    pub fn persist(&self) {
        SavedSettings::from_config(self).save();
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
