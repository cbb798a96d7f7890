//! Engine configuration loaded from JSON

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::products::loader::DEFAULT_PRODUCTS_PATH;

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_PRODUCTS_PATH)
}

fn default_enabled() -> bool {
    true
}

fn default_sender() -> String {
    "noreply@premium-engine.local".to_string()
}

/// Notification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Send quotes to the contact address supplied with the request
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Sender address on outgoing messages
    #[serde(default = "default_sender")]
    pub sender: String,

    /// Spool file for outgoing messages; messages are only logged when unset
    #[serde(default)]
    pub outbox: Option<PathBuf>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            sender: default_sender(),
            outbox: None,
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding the product CSV files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Record the year-by-year trajectory in pension projections
    #[serde(default)]
    pub detailed_pension: bool,

    #[serde(default)]
    pub notifications: NotificationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            detailed_pension: false,
            notifications: NotificationConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn from_json_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(file)?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
