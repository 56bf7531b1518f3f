//! Configuration management for vhostctl.
//!
//! Settings come from, in increasing precedence:
//! 1. Built-in defaults
//! 2. The YAML file (`/etc/vhostctl/vhostctl.yaml` unless `--config` is given)
//! 3. Environment (`OVS_SOCKDIR`)
//! 4. Command-line flags

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use vhostctl_switch::ovs::RUNTIME_DIR_ENV;
use vhostctl_switch::{BackendKind, OvsSettings, VppSettings};

use crate::cli::Args;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/vhostctl/vhostctl.yaml";

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Switch backend
    pub backend: BackendKind,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log format
    pub log_format: LogFormat,
    /// Open vSwitch settings
    pub ovs: OvsSettings,
    /// VPP settings
    pub vpp: VppSettings,
}

/// Log format options.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            // Stderr stays quiet unless something goes wrong.
            log_level: "warn".to_string(),
            log_format: LogFormat::default(),
            ovs: OvsSettings::default(),
            vpp: VppSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Resolve the effective configuration for this invocation.
    ///
    /// An explicit `--config` must exist; the default path is optional.
    pub fn resolve(args: &Args) -> Result<Self> {
        let config = match &args.config {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH)?,
            None => Self::default(),
        };

        let config = config
            .with_env_overrides(std::env::var_os(RUNTIME_DIR_ENV).map(PathBuf::from))
            .with_cli_overrides(args);

        config.validate()?;

        Ok(config)
    }

    /// Apply the OVS socket directory override from the environment.
    pub fn with_env_overrides(mut self, ovs_sockdir: Option<PathBuf>) -> Self {
        if let Some(dir) = ovs_sockdir {
            self.ovs.runtime_dir = dir;
        }
        self
    }

    /// Apply CLI argument overrides to the configuration.
    pub fn with_cli_overrides(mut self, args: &Args) -> Self {
        if let Some(backend) = args.backend {
            self.backend = backend;
        }

        if let Some(ref level) = args.log_level {
            self.log_level = level.clone();
        }

        if let Some(ref bridge) = args.bridge {
            self.ovs.bridge = bridge.clone();
        }

        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ovs.bridge.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "ovs.bridge".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if self.vpp.loopback.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "vpp.loopback".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if !vhostctl_common::is_valid_level(&self.log_level) {
            return Err(ConfigError::InvalidValue {
                field: "log_level".to_string(),
                message: format!("must be one of: {:?}", vhostctl_common::LOG_LEVELS),
            });
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
