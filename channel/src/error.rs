//! Channel error types

use thiserror::Error;

/// Failures a method handler can report back over the channel
#[derive(Error, Debug)]
pub enum ChannelError {
  /// The handler's result could not be encoded
  #[error("failed to encode result: {0}")]
  Encode(#[from] serde_json::Error),

  /// The handler ran and failed
  #[error("{0}")]
  Handler(String),
}

impl ChannelError {
  /// Code reported in the error response
  pub fn code(&self) -> &'static str {
    match self {
      ChannelError::Encode(_) => "encode_failed",
      ChannelError::Handler(_) => "handler_failed",
    }
  }
}
