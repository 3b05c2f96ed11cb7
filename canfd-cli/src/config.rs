//! Configuration loading and parsing

use anyhow::{bail, Context, Result};
use canfd_decoder::{ChannelHandle, FdBitrate, MonitorConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub bitrate: FdBitrate,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChannelConfig {
    /// USB channel number (1-8)
    #[serde(default = "default_usb_bus")]
    pub usb_bus: u8,
}

fn default_usb_bus() -> u8 {
    1
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            usb_bus: default_usb_bus(),
        }
    }
}

impl ChannelConfig {
    /// Resolve the configured channel number to a handle
    pub fn handle(&self) -> Result<ChannelHandle> {
        match ChannelHandle::usb_bus(self.usb_bus) {
            Some(handle) => Ok(handle),
            None => bail!("USB channel must be between 1 and 8, got {}", self.usb_bus),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One labelled block per frame
    #[default]
    Txt,
    /// One JSON object per line
    Json,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config.channel.handle()?;
    config
        .bitrate
        .validate()
        .with_context(|| format!("Invalid [bitrate] section in {:?}", path))?;

    Ok(config)
}
