use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Override not in `key=value` form
    #[error("Invalid override `{0}`, expected KEY=VALUE")]
    MalformedOverride(String),

    /// Override names a key that does not exist
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    /// A key holds a value it cannot take
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// Static provider selected without a snapshot file
    #[error("provider.source = \"static\" requires provider.snapshot_path")]
    MissingSnapshotPath,
}
