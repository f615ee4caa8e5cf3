// Configuration Loader
// Layered configuration loading system

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::layered::{ConfigLayer, ConfigLayerSource, LayeredConfig};
use crate::types::Config;

/// Keys accepted as CLI overrides
pub const OVERRIDE_KEYS: &[&str] = &[
    "channel.name",
    "provider.source",
    "provider.snapshot_path",
    "logging.level",
];

const CONFIG_DIR: &str = ".proxyshim";
const CONFIG_FILE: &str = "config.toml";

/// Configuration loader with layered support
pub struct ConfigLoader {
    /// Global config directory
    global_dir: PathBuf,
    /// Project config directory
    project_dir: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        let global_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR);

        Self {
            global_dir,
            project_dir: None,
        }
    }

    /// Set global config directory
    pub fn with_global_dir(mut self, dir: PathBuf) -> Self {
        self.global_dir = dir;
        self
    }

    /// Set project directory
    pub fn with_project_dir(mut self, dir: PathBuf) -> Self {
        self.project_dir = Some(dir);
        self
    }

    /// Load configuration without CLI overrides
    pub fn load(&self) -> Result<Config> {
        self.load_with_cli_overrides(Vec::new())
    }

    /// Load configuration with CLI overrides
    pub fn load_with_cli_overrides(&self, cli_overrides: Vec<(String, String)>) -> Result<Config> {
        let layered = self.layers(cli_overrides)?;
        tracing::debug!("Merging config layers: {:?}", layered.sources());

        let config: Config = toml::Value::Table(layered.merge())
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::InvalidValue {
                key: "config".to_string(),
                reason: e.to_string().trim().to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Collect layers in order:
    /// 1. Built-in defaults
    /// 2. Global config (~/.proxyshim/config.toml)
    /// 3. Project config (.proxyshim/config.toml)
    /// 4. CLI overrides
    pub fn layers(&self, cli_overrides: Vec<(String, String)>) -> Result<LayeredConfig> {
        let mut layered = LayeredConfig::new();
        layered.add_layer(ConfigLayer {
            source: ConfigLayerSource::Default,
            values: Self::default_values()?,
        });

        let global_path = self.global_dir.join(CONFIG_FILE);
        if let Some(values) = Self::load_file(&global_path)? {
            layered.add_layer(ConfigLayer {
                source: ConfigLayerSource::GlobalConfig,
                values,
            });
        }

        if let Some(project_dir) = &self.project_dir {
            let project_path = project_dir.join(CONFIG_DIR).join(CONFIG_FILE);
            if let Some(values) = Self::load_file(&project_path)? {
                layered.add_layer(ConfigLayer {
                    source: ConfigLayerSource::ProjectConfig,
                    values,
                });
            }
        }

        if !cli_overrides.is_empty() {
            let mut values = toml::Table::new();
            for (key, value) in cli_overrides {
                Self::apply_override(&mut values, &key, value)?;
            }
            layered.add_layer(ConfigLayer {
                source: ConfigLayerSource::CliOverride,
                values,
            });
        }

        Ok(layered)
    }

    fn default_values() -> Result<toml::Table> {
        match toml::Value::try_from(Config::default())? {
            toml::Value::Table(table) => Ok(table),
            _ => anyhow::bail!("default configuration did not serialize to a table"),
        }
    }

    /// Parse a config file; a missing file is not an error
    fn load_file(path: &Path) -> Result<Option<toml::Table>> {
        if !path.exists() {
            tracing::debug!("No config file at {}", path.display());
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let values: toml::Table = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        tracing::debug!("Loaded config file {}", path.display());
        Ok(Some(values))
    }

    /// Apply a single CLI override
    fn apply_override(
        values: &mut toml::Table,
        key: &str,
        value: String,
    ) -> Result<(), ConfigError> {
        if !OVERRIDE_KEYS.contains(&key) {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }
        let Some((section, field)) = key.split_once('.') else {
            return Err(ConfigError::UnknownKey(key.to_string()));
        };
        let table = values
            .entry(section.to_string())
            .or_insert(toml::Value::Table(toml::Table::new()));
        match table {
            toml::Value::Table(table) => {
                table.insert(field.to_string(), toml::Value::String(value));
                Ok(())
            }
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a `KEY=VALUE` override
pub fn parse_override(raw: &str) -> Result<(String, String), ConfigError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(ConfigError::MalformedOverride(raw.to_string())),
    }
}
