//! # Notification Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     GYMDESK_WHATSAPP_ENABLED=false                                     │
//! │     GYMDESK_WHATSAPP_COUNTRY_CODE=91                                   │
//! │     GYMDESK_WHATSAPP_INTERVAL_MS=3000                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/gymdesk/notify.toml (Linux)                              │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [whatsapp]
//! enabled = true
//! default_country_code = "91"
//! interval_ms = 3000      # one message per interval
//! max_attempts = 3
//! queue_capacity = 256
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{NotifyError, NotifyResult};

pub const ENV_ENABLED: &str = "GYMDESK_WHATSAPP_ENABLED";
pub const ENV_COUNTRY_CODE: &str = "GYMDESK_WHATSAPP_COUNTRY_CODE";
pub const ENV_INTERVAL_MS: &str = "GYMDESK_WHATSAPP_INTERVAL_MS";

/// Shortest allowed gap between two outgoing messages.
const MIN_INTERVAL_MS: u64 = 100;

// =============================================================================
// WhatsApp Settings
// =============================================================================

/// Outbound WhatsApp behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatsAppSettings {
    /// Master switch. When off, `enqueue` refuses new messages.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Calling code prepended to local 10-digit numbers.
    #[serde(default = "default_country_code")]
    pub default_country_code: String,

    /// Gap between dispatches (milliseconds).
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Delivery attempts per message before it is counted as failed.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Messages that may wait in the channel.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_true() -> bool {
    true
}
fn default_country_code() -> String {
    "91".to_string()
}
fn default_interval_ms() -> u64 {
    3000
}
fn default_max_attempts() -> u32 {
    3
}
fn default_queue_capacity() -> usize {
    256
}

impl Default for WhatsAppSettings {
    fn default() -> Self {
        WhatsAppSettings {
            enabled: default_true(),
            default_country_code: default_country_code(),
            interval_ms: default_interval_ms(),
            max_attempts: default_max_attempts(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl WhatsAppSettings {
    /// Returns the dispatch interval.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

// =============================================================================
// Main Notification Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub whatsapp: WhatsAppSettings,
}

impl NotifyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (notify.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> NotifyResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading notification config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load notification config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> NotifyResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| NotifyError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Notification config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> NotifyResult<()> {
        let wa = &self.whatsapp;

        let code = &wa.default_country_code;
        if code.is_empty() || code.len() > 3 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(NotifyError::InvalidConfig(format!(
                "default_country_code must be 1-3 digits, got: '{}'",
                code
            )));
        }

        if wa.interval_ms < MIN_INTERVAL_MS {
            return Err(NotifyError::InvalidConfig(format!(
                "interval_ms must be at least {}",
                MIN_INTERVAL_MS
            )));
        }

        if wa.max_attempts == 0 {
            return Err(NotifyError::InvalidConfig(
                "max_attempts must be greater than 0".into(),
            ));
        }

        if wa.queue_capacity == 0 {
            return Err(NotifyError::InvalidConfig(
                "queue_capacity must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies overrides from `lookup` (the process environment in `load`).
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(ENV_ENABLED) {
            match value.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.whatsapp.enabled = true,
                "0" | "false" | "no" | "off" => self.whatsapp.enabled = false,
                _ => warn!(value = %value, "Unknown {} value", ENV_ENABLED),
            }
        }

        if let Some(code) = lookup(ENV_COUNTRY_CODE) {
            debug!(code = %code, "Overriding country code from environment");
            self.whatsapp.default_country_code = code.trim_start_matches('+').to_string();
        }

        if let Some(ms) = lookup(ENV_INTERVAL_MS) {
            match ms.parse::<u64>() {
                Ok(ms) => self.whatsapp.interval_ms = ms,
                Err(_) => warn!(value = %ms, "Ignoring non-numeric {}", ENV_INTERVAL_MS),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "gymdesk", "gymdesk")
            .map(|dirs| dirs.config_dir().join("notify.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = NotifyConfig::default();
        assert!(config.whatsapp.enabled);
        assert_eq!(config.whatsapp.default_country_code, "91");
        assert_eq!(config.whatsapp.interval(), Duration::from_secs(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = NotifyConfig::default();
        config.apply_overrides(env(&[
            (ENV_ENABLED, "off"),
            (ENV_COUNTRY_CODE, "+44"),
            (ENV_INTERVAL_MS, "500"),
        ]));

        assert!(!config.whatsapp.enabled);
        assert_eq!(config.whatsapp.default_country_code, "44");
        assert_eq!(config.whatsapp.interval_ms, 500);
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut config = NotifyConfig::default();
        config.apply_overrides(env(&[(ENV_ENABLED, "maybe"), (ENV_INTERVAL_MS, "soon")]));
        assert_eq!(config, NotifyConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = NotifyConfig::default();

        config.whatsapp.default_country_code = "9a".into();
        assert!(config.validate().is_err());

        config.whatsapp.default_country_code = "1".into();
        config.whatsapp.interval_ms = 10;
        assert!(config.validate().is_err());

        config.whatsapp.interval_ms = MIN_INTERVAL_MS;
        config.whatsapp.max_attempts = 0;
        assert!(config.validate().is_err());

        config.whatsapp.max_attempts = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: NotifyConfig = toml::from_str("[whatsapp]\ninterval_ms = 1000\n").unwrap();
        assert_eq!(config.whatsapp.interval_ms, 1000);
        assert_eq!(config.whatsapp.max_attempts, 3);

        let empty: NotifyConfig = toml::from_str("").unwrap();
        assert_eq!(empty, NotifyConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("gymdesk-notify-{}", uuid::Uuid::new_v4()))
            .join("notify.toml");

        let mut config = NotifyConfig::default();
        config.whatsapp.queue_capacity = 16;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[whatsapp]"));

        let loaded: NotifyConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.whatsapp.queue_capacity, 16);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}
