//! Configuration management for robopi.
//!
//! Loads settings from /etc/robopi/config.toml, then the user config
//! directory, or uses defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// System-wide config file path
pub const CONFIG_PATH: &str = "/etc/robopi/config.toml";

/// IRC connection and identity settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrcConfig {
    #[serde(default = "default_nick")]
    pub nick: String,

    #[serde(default = "default_nick")]
    pub user: String,

    #[serde(default = "default_nick")]
    pub real_name: String,

    /// Channels joined after registration
    #[serde(default = "default_channels")]
    pub channels: Vec<String>,

    /// Sent to NickServ when it says the nick is registered
    #[serde(default)]
    pub nickserv_password: Option<String>,

    /// Token that marks a chat line as a command. Defaults to "<nick>:"
    #[serde(default)]
    pub address: Option<String>,

    /// Port used when the server argument has none
    #[serde(default = "default_port")]
    pub default_port: u16,

    /// PEM bundle of trusted roots for --secure
    #[serde(default = "default_ca_bundle")]
    pub ca_bundle: PathBuf,
}

fn default_nick() -> String {
    "robopi".to_string()
}

fn default_channels() -> Vec<String> {
    vec!["#robopi".to_string()]
}

fn default_port() -> u16 {
    6667
}

fn default_ca_bundle() -> PathBuf {
    PathBuf::from("/etc/ssl/certs/ca-certificates.crt")
}

impl Default for IrcConfig {
    fn default() -> Self {
        Self {
            nick: default_nick(),
            user: default_nick(),
            real_name: default_nick(),
            channels: default_channels(),
            nickserv_password: None,
            address: None,
            default_port: default_port(),
            ca_bundle: default_ca_bundle(),
        }
    }
}

impl IrcConfig {
    pub fn address_token(&self) -> String {
        self.address
            .clone()
            .unwrap_or_else(|| format!("{}:", self.nick))
    }
}

/// USB arm settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmConfig {
    /// Maplin/OWI robot arm
    #[serde(default = "default_vendor_id")]
    pub vendor_id: u16,

    #[serde(default)]
    pub product_id: u16,

    #[serde(default = "default_transfer_timeout")]
    pub transfer_timeout_ms: u32,

    /// Skip the device and use the simulated arm
    #[serde(default)]
    pub simulate: bool,
}

fn default_vendor_id() -> u16 {
    0x1267
}

fn default_transfer_timeout() -> u32 {
    1000
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            vendor_id: default_vendor_id(),
            product_id: 0,
            transfer_timeout_ms: default_transfer_timeout(),
            simulate: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Read commands from stdin
    #[serde(default = "default_console_enabled")]
    pub enabled: bool,
}

fn default_console_enabled() -> bool {
    true
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: default_console_enabled(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub irc: IrcConfig,

    #[serde(default)]
    pub arm: ArmConfig,

    #[serde(default)]
    pub console: ConsoleConfig,
}

impl Config {
    /// Load config from an explicit path, or the first existing search path.
    ///
    /// An explicit path must exist. A file that exists but does not parse is
    /// an error either way.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        for path in Self::search_paths() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        warn!("Config not found, using defaults");
        Ok(Config::default())
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_PATH)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("robopi").join("config.toml"));
        }
        paths
    }

    /// Load config from specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
