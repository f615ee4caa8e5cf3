// Configuration Types
// All configuration type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use proxyshim_channel_protocol::DEFAULT_CHANNEL_NAME;

use crate::error::ConfigError;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Message channel settings
    pub channel: ChannelConfig,
    /// Where proxy snapshots come from
    pub provider: ProviderConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "channel.name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.provider.source == ProviderSource::Static && self.provider.snapshot_path.is_none() {
            return Err(ConfigError::MissingSnapshotPath);
        }
        Ok(())
    }
}

// ============================================================================
// CHANNEL CONFIGURATION
// ============================================================================

/// Channel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Name the shell addresses the channel by
    pub name: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_CHANNEL_NAME.to_string(),
        }
    }
}

// ============================================================================
// PROVIDER CONFIGURATION
// ============================================================================

/// Proxy provider configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider source
    pub source: ProviderSource,
    /// JSON snapshot read by the `static` source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
}

/// Provider sources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderSource {
    /// Native OS facility for the build target
    #[default]
    System,
    /// `*_proxy` environment variables
    Env,
    /// Fixed snapshot file
    Static,
}

// ============================================================================
// LOGGING CONFIGURATION
// ============================================================================

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
