//! Proxy settings reader
//!
//! Turns whatever the provider reports into [`ProxySettings`]. A provider
//! failure reads as an empty configuration; callers never see an error.

use std::collections::BTreeMap;

use crate::kind::ProxyKind;
use crate::model::{ProxySettings, SystemProxyConfig};
use crate::provider::SystemProxyProvider;
use crate::snapshot::ProxySnapshot;

pub struct ProxySettingsReader<P> {
  provider: P,
}

impl<P: SystemProxyProvider> ProxySettingsReader<P> {
  pub fn new(provider: P) -> Self {
    Self { provider }
  }

  /// Current snapshot, or an empty one when the provider fails
  pub fn snapshot(&self) -> ProxySnapshot {
    match self.provider.snapshot() {
      Ok(snapshot) => snapshot,
      Err(e) => {
        tracing::warn!(
          "Failed to read proxy configuration from {} provider, treating it as empty: {}",
          self.provider.name(),
          e
        );
        ProxySnapshot::new()
      }
    }
  }

  pub fn read(&self) -> ProxySettings {
    let config = SystemProxyConfig::from_snapshot(&self.snapshot());
    let settings = ProxySettings::from_config(&config);

    for kind in ProxyKind::ALL {
      match settings.get(kind) {
        Some(endpoint) => tracing::debug!("{} proxy enabled at {}", kind, endpoint),
        None if config.kind(kind).is_enabled() => {
          tracing::debug!("{} proxy enabled but host or port is missing", kind)
        }
        None => tracing::debug!("{} proxy not enabled", kind),
      }
    }
    settings
  }

  /// Settings as the flat mapping handed back over the channel
  pub fn read_map(&self) -> BTreeMap<String, String> {
    self.read().to_map()
  }
}
