// Layered Configuration
// Support for layered configuration with precedence

use serde::{Deserialize, Serialize};

/// Layered configuration wrapper
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayeredConfig {
    /// Configuration layers, lowest precedence first
    layers: Vec<ConfigLayer>,
}

/// Configuration layer with source tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigLayer {
    /// Layer source
    pub source: ConfigLayerSource,
    /// Configuration values
    pub values: toml::Table,
}

/// Configuration layer source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigLayerSource {
    /// Built-in defaults
    Default,
    /// Global user config
    GlobalConfig,
    /// Project-specific config
    ProjectConfig,
    /// CLI override
    CliOverride,
}

impl LayeredConfig {
    /// Create a new layered configuration
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Add a layer on top of the existing ones
    pub fn add_layer(&mut self, layer: ConfigLayer) {
        self.layers.push(layer);
    }

    pub fn sources(&self) -> Vec<ConfigLayerSource> {
        self.layers.iter().map(|layer| layer.source).collect()
    }

    /// Merge all layers; later layers replace only the keys they set
    pub fn merge(&self) -> toml::Table {
        let mut merged = toml::Table::new();
        for layer in &self.layers {
            Self::merge_tables(&mut merged, &layer.values);
        }
        merged
    }

    fn merge_tables(base: &mut toml::Table, overlay: &toml::Table) {
        for (key, value) in overlay {
            match (base.get_mut(key), value) {
                (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                    Self::merge_tables(base_table, overlay_table);
                }
                _ => {
                    base.insert(key.clone(), value.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn layer(source: ConfigLayerSource, text: &str) -> ConfigLayer {
        ConfigLayer {
            source,
            values: toml::from_str(text).unwrap(),
        }
    }

    #[test]
    fn nested_tables_merge_key_by_key() {
        let mut layered = LayeredConfig::new();
        layered.add_layer(layer(
            ConfigLayerSource::Default,
            "[provider]\nsource = \"system\"\n[logging]\nlevel = \"info\"\n",
        ));
        layered.add_layer(layer(
            ConfigLayerSource::GlobalConfig,
            "[provider]\nsnapshot_path = \"a.json\"\n",
        ));
        layered.add_layer(layer(
            ConfigLayerSource::CliOverride,
            "[logging]\nlevel = \"debug\"\n",
        ));

        let merged = layered.merge();
        assert_eq!(merged["provider"]["source"].as_str(), Some("system"));
        assert_eq!(merged["provider"]["snapshot_path"].as_str(), Some("a.json"));
        assert_eq!(merged["logging"]["level"].as_str(), Some("debug"));
        assert_eq!(
            layered.sources(),
            vec![
                ConfigLayerSource::Default,
                ConfigLayerSource::GlobalConfig,
                ConfigLayerSource::CliOverride,
            ]
        );
    }
}
