use std::sync::Arc;

use serde_json::Value;

use proxyshim_channel_protocol::{GET_PROXY_SETTINGS, MethodCall};
use proxyshim_settings::{ProxySettingsReader, SystemProxyProvider};

use crate::channel::MethodChannel;
use crate::error::ChannelError;
use crate::handler::MethodHandler;

/// Answers `getProxySettings` with the current settings mapping
pub struct GetProxySettingsHandler<P> {
  reader: Arc<ProxySettingsReader<P>>,
}

impl<P: SystemProxyProvider> GetProxySettingsHandler<P> {
  pub fn new(reader: Arc<ProxySettingsReader<P>>) -> Self {
    Self { reader }
  }
}

impl<P: SystemProxyProvider> MethodHandler for GetProxySettingsHandler<P> {
  fn handle(&self, call: &MethodCall) -> Result<Value, ChannelError> {
    if !call.arguments.is_null() {
      tracing::debug!("Ignoring arguments passed to {}", call.method);
    }
    let settings = self.reader.read();
    Ok(serde_json::to_value(settings.to_map())?)
  }
}

/// Channel named `name` serving proxy settings from `reader`
pub fn proxy_settings_channel<P>(name: impl Into<String>, reader: Arc<ProxySettingsReader<P>>) -> MethodChannel
where
  P: SystemProxyProvider + 'static,
{
  MethodChannel::new(name).with_handler(
    GET_PROXY_SETTINGS,
    Arc::new(GetProxySettingsHandler::new(reader)),
  )
}
