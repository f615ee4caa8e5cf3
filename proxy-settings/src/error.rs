//! Provider error types

use std::path::PathBuf;

use thiserror::Error;

/// Failures while obtaining a proxy snapshot from the host
#[derive(Error, Debug)]
pub enum ProviderError {
  /// The OS facility returned nothing
  #[error("system proxy configuration unavailable: {0}")]
  Unavailable(String),

  /// Reading a snapshot source failed
  #[error("failed to read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A snapshot source could not be decoded
  #[error("invalid proxy snapshot: {0}")]
  Parse(String),

  /// The requested provider does not exist on this platform
  #[error("proxy provider `{0}` is not supported on {os}", os = std::env::consts::OS)]
  Unsupported(String),
}

impl From<serde_json::Error> for ProviderError {
  fn from(error: serde_json::Error) -> Self {
    ProviderError::Parse(error.to_string())
  }
}

/// Alias for Result<T, ProviderError>
pub type Result<T> = std::result::Result<T, ProviderError>;
