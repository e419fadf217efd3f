//! Configuration for controller discovery
//!
//! Identifiers used to recognise the gamepad's device nodes live here as named
//! values instead of being scattered through the discovery code. The file is
//! optional: a missing `config.toml` falls back to [`Config::default`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CONFIG_DIR: &str = "dualshock3";
const CONFIG_FILE: &str = "config.toml";

/// Sony Computer Entertainment
pub const SONY_VENDOR_ID: u16 = 0x054c;
/// DualShock 3 / SIXAXIS over USB
pub const DUALSHOCK3_PRODUCT_ID: u16 = 0x0268;

pub const WIRELESS_PRIMARY_NAME: &str = "Sony Computer Entertainment Wireless Controller";
pub const WIRELESS_MOTION_NAME: &str =
    "Sony Computer Entertainment Wireless Controller Motion Sensors";
/// PlayStation Move. Recognised, never bound.
pub const POINTER_CONTROLLER_NAME: &str = "Motion Controller";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub discovery: DiscoveryConfig,
}

/// Where to look for input nodes and how to recognise the controller among them.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Directory holding the input device nodes
    pub device_dir: PathBuf,
    /// Only files starting with this prefix are considered (`event*`)
    pub device_prefix: String,

    /// USB identifiers of the wired controller
    pub wired_vendor: u16,
    pub wired_product: u16,

    /// Bluetooth nodes are matched by their exact device name
    pub wireless_primary_name: String,
    pub wireless_motion_name: String,

    pub pointer_controller_name: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            device_dir: PathBuf::from("/dev/input"),
            device_prefix: "event".to_string(),
            wired_vendor: SONY_VENDOR_ID,
            wired_product: DUALSHOCK3_PRODUCT_ID,
            wireless_primary_name: WIRELESS_PRIMARY_NAME.to_string(),
            wireless_motion_name: WIRELESS_MOTION_NAME.to_string(),
            pointer_controller_name: POINTER_CONTROLLER_NAME.to_string(),
        }
    }
}

impl Config {
    /// Default location: `$XDG_CONFIG_HOME/dualshock3/config.toml`
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| {
            warn!("Could not determine config directory, using current directory");
            PathBuf::from(".")
        });
        path.push(CONFIG_DIR);
        path.push(CONFIG_FILE);
        path
    }

    /// Loads the config from the default location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads the config from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(
                "No config file at {}, using default discovery settings",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content)?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Writes the defaults to `path`, creating parent directories as needed
    pub fn write_default(path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(&Self::default())?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Wrote default config to {}", path.display());
        Ok(())
    }
}
