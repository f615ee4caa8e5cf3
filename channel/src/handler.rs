use serde_json::Value;

use proxyshim_channel_protocol::MethodCall;

use crate::error::ChannelError;

/// Handles one named method on a channel
pub trait MethodHandler: Send + Sync {
  fn handle(&self, call: &MethodCall) -> Result<Value, ChannelError>;
}

impl<F> MethodHandler for F
where
  F: Fn(&MethodCall) -> Result<Value, ChannelError> + Send + Sync,
{
  fn handle(&self, call: &MethodCall) -> Result<Value, ChannelError> {
    self(call)
  }
}
