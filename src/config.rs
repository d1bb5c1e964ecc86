//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (the Telegram bot token and chat id) are referenced by env-var
//! name in the config and resolved at runtime via `std::env::var`, so the
//! file itself never carries credentials.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use crate::types::Instrument;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub scanner: ScannerConfig,
    pub feed: FeedConfig,
    pub telegram: TelegramConfig,
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub keepalive: KeepAliveConfig,
    pub watchlist: Vec<Instrument>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScannerConfig {
    /// Seconds between scan cycles. Cycles never overlap — a slow cycle
    /// delays the next tick rather than running concurrently with it.
    pub interval_secs: u64,
    /// Score at or above which an instrument is published and eligible
    /// to alert.
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: u8,
    /// Score below which an alerted instrument is cleared and may alert
    /// again. Must be strictly lower than `alert_threshold`; the gap is
    /// the dead band that stops alert flapping.
    #[serde(default = "default_clear_threshold")]
    pub clear_threshold: u8,
    /// Per-cycle probability of wiping the alert book, letting strong
    /// repeat signals re-notify without a score dip.
    #[serde(default = "default_reset_probability")]
    pub reset_probability: f64,
}

fn default_alert_threshold() -> u8 {
    75
}

fn default_clear_threshold() -> u8 {
    60
}

fn default_reset_probability() -> f64 {
    0.01
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    /// Base URL of the quote endpoint; the instrument code is appended as
    /// a query parameter.
    pub base_url: String,
    /// Per-request timeout. The only timeout boundary in the scan path.
    #[serde(default = "default_feed_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_feed_timeout_secs() -> u64 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    pub bot_token_env: String,
    pub chat_id_env: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub enabled: bool,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct KeepAliveConfig {
    /// Env var holding the externally reachable URL to self-ping. Absent
    /// means no keep-alive task.
    pub url_env: Option<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Sanity-check the threshold pair and the watch-list.
    fn validate(&self) -> Result<()> {
        if self.scanner.clear_threshold >= self.scanner.alert_threshold {
            anyhow::bail!(
                "clear_threshold ({}) must be strictly below alert_threshold ({})",
                self.scanner.clear_threshold,
                self.scanner.alert_threshold,
            );
        }
        if !(0.0..=1.0).contains(&self.scanner.reset_probability) {
            anyhow::bail!(
                "reset_probability ({}) must be within [0, 1]",
                self.scanner.reset_probability,
            );
        }
        if self.watchlist.is_empty() {
            anyhow::bail!("watchlist is empty");
        }
        Ok(())
    }

    /// Resolve an environment variable name to its value.
    /// Useful for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}
