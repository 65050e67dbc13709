//! # Café Configuration Module
//!
//! Loads the café configuration (name, phone, admin chat, menu, work hours)
//! from a JSON file. Missing or malformed configuration falls back to the
//! built-in defaults so the bot always starts with a servable menu; the
//! fallback is logged at warning level rather than swallowed.

use std::fmt;
use std::fs;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use tracing::{info, warn};

use crate::catalog::{Catalog, CatalogEntry};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_MAX_QUANTITY: u32 = 5;
pub const DEFAULT_MAX_PARTY_SIZE: u32 = 12;

/// Opening hours as a `[open, close)` pair of hours on a 24h clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WorkHours(pub u8, pub u8);

impl WorkHours {
    pub fn open(&self) -> u8 {
        self.0
    }

    pub fn close(&self) -> u8 {
        self.1
    }

    pub fn contains(&self, hour: u8) -> bool {
        self.0 <= hour && hour < self.1
    }
}

/// Café configuration loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct CafeConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_phone")]
    pub phone: String,
    /// Chat that receives order and booking notifications. Zero means
    /// unconfigured; the bot still serves customers and logs the failures.
    #[serde(default, deserialize_with = "chat_id_from_number_or_string")]
    pub admin_chat_id: i64,
    #[serde(default = "default_menu")]
    pub menu: Catalog,
    #[serde(default)]
    pub work_hours: Option<WorkHours>,
    #[serde(default = "default_max_quantity")]
    pub max_quantity: u32,
    #[serde(default = "default_max_party_size")]
    pub max_party_size: u32,
}

impl Default for CafeConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            phone: default_phone(),
            admin_chat_id: 0,
            menu: default_menu(),
            work_hours: None,
            max_quantity: DEFAULT_MAX_QUANTITY,
            max_party_size: DEFAULT_MAX_PARTY_SIZE,
        }
    }
}

fn default_name() -> String {
    "Кофейня".to_string()
}

fn default_phone() -> String {
    "+7 (900) 000-00-00".to_string()
}

fn default_menu() -> Catalog {
    Catalog::from_entries(vec![
        CatalogEntry::new("Эспрессо", 150),
        CatalogEntry::new("Капучино", 200),
        CatalogEntry::new("Латте", 250),
        CatalogEntry::new("Чай", 120),
        CatalogEntry::new("Чизкейк", 300),
    ])
}

fn default_max_quantity() -> u32 {
    DEFAULT_MAX_QUANTITY
}

fn default_max_party_size() -> u32 {
    DEFAULT_MAX_PARTY_SIZE
}

/// The configuration file wraps everything in a `cafe` object.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    cafe: CafeConfig,
}

impl CafeConfig {
    /// Parse and validate a configuration document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        file.cafe.validate()?;
        Ok(file.cafe)
    }

    /// Eager validation of required fields, so a broken file is rejected at
    /// startup instead of deep inside a dialogue.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("cafe name is empty".to_string()));
        }
        if self.menu.is_empty() {
            return Err(ConfigError::Invalid("menu has no items".to_string()));
        }
        if let Some(entry) = self.menu.items().iter().find(|e| e.price == 0) {
            return Err(ConfigError::Invalid(format!(
                "menu item has zero price: {}",
                entry.name
            )));
        }
        if self.max_quantity == 0 {
            return Err(ConfigError::Invalid("max_quantity must be at least 1".to_string()));
        }
        if self.max_party_size == 0 {
            return Err(ConfigError::Invalid(
                "max_party_size must be at least 1".to_string(),
            ));
        }
        if let Some(hours) = self.work_hours {
            if hours.open() >= hours.close() || hours.close() > 24 {
                return Err(ConfigError::Invalid(format!(
                    "work_hours out of order: [{}, {}]",
                    hours.open(),
                    hours.close()
                )));
            }
        }
        Ok(())
    }

    /// Whether the café is open at the given hour. No configured hours means
    /// always open.
    pub fn is_open_at(&self, hour: u8) -> bool {
        self.work_hours.map_or(true, |hours| hours.contains(hour))
    }
}

/// Load the configuration from `path`, falling back to the built-in defaults
/// on any error. The process always ends up with a usable configuration.
pub fn load_config(path: &str) -> CafeConfig {
    match fs::read_to_string(path) {
        Ok(raw) => match CafeConfig::from_json(&raw) {
            Ok(config) => {
                info!(path, cafe = %config.name, "configuration loaded");
                config
            }
            Err(e) => {
                warn!(path, error = %e, "configuration rejected, using built-in defaults");
                CafeConfig::default()
            }
        },
        Err(e) => {
            warn!(path, error = %e, "configuration not readable, using built-in defaults");
            CafeConfig::default()
        }
    }
}

// Deployed config files have carried the admin chat id both as a JSON
// number and as a quoted string; both spellings are accepted.
fn chat_id_from_number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct ChatIdVisitor;

    impl<'de> Visitor<'de> for ChatIdVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a chat id as an integer or a string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            v.trim().parse().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(ChatIdVisitor)
}

/// Custom error type for configuration loading
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// The file could not be parsed as JSON
    Parse(String),
    /// The file parsed but a required field is unusable
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
