//! `relaybox.toml` configuration.

use std::fs;
use std::path::{Path, PathBuf};

use rb_engine::{FrequencyTable, SpeedPercent};
use rb_ir::RELAY_COUNT;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "relaybox.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Player settings. Every field is optional in the file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Speed at power-on, clamped to 50..=300.
    pub speed_percent: i32,
    /// Buzz frequency in Hz for relays 0..7.
    pub frequencies: [u16; RELAY_COUNT],
    /// GPIO for each relay, used to label relay activity.
    pub relay_pins: [u8; RELAY_COUNT],
    pub status_led_pin: u8,
    /// Host driver sleep between polls.
    pub idle_sleep_us: u64,
    /// Start playing as soon as the driver is up.
    pub autoplay: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speed_percent: SpeedPercent::DEFAULT.get() as i32,
            frequencies: FrequencyTable::DEFAULT.0,
            // LC ESP32_Relay_X8 wiring
            relay_pins: [32, 33, 25, 26, 27, 14, 12, 13],
            status_led_pin: 23,
            idle_sleep_us: 200,
            autoplay: false,
        }
    }
}

impl Config {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn speed(&self) -> SpeedPercent {
        SpeedPercent::new(self.speed_percent)
    }

    pub fn frequency_table(&self) -> FrequencyTable {
        if self.frequencies.contains(&0) {
            log::warn!("frequency table has a 0 Hz entry; notes on that relay will be silent");
        }
        FrequencyTable(self.frequencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn partial_file_overrides_some_fields() {
        let config = Config::from_toml_str(
            r#"
            speed_percent = 90
            autoplay = true
            "#,
        )
        .unwrap();
        assert_eq!(config.speed_percent, 90);
        assert!(config.autoplay);
        assert_eq!(config.frequencies, FrequencyTable::DEFAULT.0);
        assert_eq!(config.status_led_pin, 23);
    }

    #[test]
    fn frequencies_are_configurable() {
        let config =
            Config::from_toml_str("frequencies = [10, 20, 30, 40, 50, 60, 70, 80]").unwrap();
        assert_eq!(
            config.frequency_table(),
            FrequencyTable([10, 20, 30, 40, 50, 60, 70, 80])
        );
    }

    #[test]
    fn speed_is_clamped() {
        let config = Config::from_toml_str("speed_percent = 5000").unwrap();
        assert_eq!(config.speed().get(), 300);
    }

    #[test]
    fn wrong_table_length_is_an_error() {
        let err = Config::from_toml_str("frequencies = [1, 2, 3]").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn wrong_type_is_an_error() {
        assert!(Config::from_toml_str("autoplay = \"yes\"").is_err());
    }

    #[test]
    fn missing_file_uses_defaults() {
        let path = Path::new("definitely/not/here/relaybox.toml");
        assert_eq!(Config::load(path).unwrap(), Config::default());
    }

    #[test]
    fn roundtrips_through_toml() {
        let mut config = Config::default();
        config.idle_sleep_us = 50;
        let text = toml::to_string(&config).unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }
}
