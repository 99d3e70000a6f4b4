//! Startup configuration
//!
//! Values come from CLI flags, then an optional TOML file, then defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default listen port
pub const DEFAULT_PORT: u16 = 8080;

/// Default bind address (all interfaces)
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Settings where every value is optional, as read from one source
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialSettings {
    pub kubeconfig: Option<PathBuf>,
    pub port: Option<u16>,
    pub host: Option<String>,
    pub log_level: Option<String>,
}

impl PartialSettings {
    /// Read settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Fill unset values from `fallback`
    pub fn or(self, fallback: PartialSettings) -> Self {
        Self {
            kubeconfig: self.kubeconfig.or(fallback.kubeconfig),
            port: self.port.or(fallback.port),
            host: self.host.or(fallback.host),
            log_level: self.log_level.or(fallback.log_level),
        }
    }

    /// Apply defaults to anything still unset
    pub fn finish(self) -> Settings {
        Settings {
            kubeconfig: self.kubeconfig.unwrap_or_else(default_kubeconfig_path),
            port: self.port.unwrap_or(DEFAULT_PORT),
            host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            log_level: self
                .log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

/// Fully resolved settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub kubeconfig: PathBuf,
    pub port: u16,
    pub host: String,
    pub log_level: String,
}

/// `$HOME/.kube/config`
pub fn default_kubeconfig_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".kube")
        .join("config")
}
