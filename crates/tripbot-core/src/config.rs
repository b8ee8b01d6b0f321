//! TripBot configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, TripBotError};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TripBotConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl TripBotConfig {
    /// Load config from the default path (~/.tripbot/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TripBotError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| TripBotError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| TripBotError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tripbot")
            .join("config.toml")
    }

    /// Apply process-environment overrides. `PORT` (or `TRIPBOT_PORT`) and
    /// the bridge connection settings can be supplied without a config file.
    pub fn apply_env_overrides(&mut self) {
        if let Some(port) = std::env::var("TRIPBOT_PORT")
            .or_else(|_| std::env::var("PORT"))
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
        {
            self.gateway.port = port;
        }
        if let Ok(url) = std::env::var("TRIPBOT_BRIDGE_URL") {
            self.bridge.base_url = url;
        }
        if let Ok(token) = std::env::var("TRIPBOT_BRIDGE_TOKEN") {
            self.bridge.api_token = token;
        }
    }
}

/// Gateway (HTTP surface) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 { 3000 }
fn default_host() -> String { "0.0.0.0".into() }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// WhatsApp bridge connection configuration. The bridge process owns the
/// WhatsApp Web session (pairing, persistence); we only talk HTTP to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_bridge_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_token: String,
    /// Country prefix used when building individual-chat ids from raw
    /// numeric input (`/set-chat-id`).
    #[serde(default = "default_country_code")]
    pub country_code: String,
}

fn default_bridge_url() -> String { "http://127.0.0.1:8089".into() }
fn default_country_code() -> String { "91".into() }

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: default_bridge_url(),
            api_token: String::new(),
            country_code: default_country_code(),
        }
    }
}

/// Dispatch poller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Poller tick period. One minute matches the width of the minute-match
    /// window, so an armed schedule fires at most once.
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
    /// Settle delay between time match and dispatch, absorbs startup jitter.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Fixed body for automatic (scheduled) sends and GET /send-message.
    #[serde(default = "default_message")]
    pub default_message: String,
}

fn default_tick_secs() -> u64 { 60 }
fn default_settle_delay_ms() -> u64 { 1500 }
fn default_message() -> String { "1st trip".into() }

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_secs: default_tick_secs(),
            settle_delay_ms: default_settle_delay_ms(),
            default_message: default_message(),
        }
    }
}
