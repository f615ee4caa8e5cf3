//! Typed proxy configuration and the settings mapping built from it

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::kind::ProxyKind;
use crate::snapshot::ProxySnapshot;

/// Value of the enable flag that marks a kind as active
pub const ENABLED: i64 = 1;

/// Configuration of one proxy kind as found in a snapshot.
///
/// Each field is `None` when the key is missing or holds a value of the
/// wrong type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyKindConfig {
  pub enabled: Option<i64>,
  pub host: Option<String>,
  pub port: Option<i64>,
}

impl ProxyKindConfig {
  pub fn from_snapshot(snapshot: &ProxySnapshot, kind: ProxyKind) -> Self {
    Self {
      enabled: snapshot.integer(&kind.enable_key()),
      host: snapshot.string(&kind.host_key()).map(str::to_string),
      port: snapshot.integer(&kind.port_key()),
    }
  }

  pub fn is_enabled(&self) -> bool {
    self.enabled == Some(ENABLED)
  }

  /// Endpoint this kind routes through, if it is enabled and complete
  pub fn endpoint(&self) -> Option<ProxyEndpoint> {
    if !self.is_enabled() {
      return None;
    }
    let host = self.host.as_deref()?;
    let port = u16::try_from(self.port?).ok()?;
    ProxyEndpoint::new(host, port)
  }
}

/// Per-kind view over a whole snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemProxyConfig {
  pub http: ProxyKindConfig,
  pub https: ProxyKindConfig,
  pub socks: ProxyKindConfig,
}

impl SystemProxyConfig {
  pub fn from_snapshot(snapshot: &ProxySnapshot) -> Self {
    Self {
      http: ProxyKindConfig::from_snapshot(snapshot, ProxyKind::Http),
      https: ProxyKindConfig::from_snapshot(snapshot, ProxyKind::Https),
      socks: ProxyKindConfig::from_snapshot(snapshot, ProxyKind::Socks),
    }
  }

  pub fn kind(&self, kind: ProxyKind) -> &ProxyKindConfig {
    match kind {
      ProxyKind::Http => &self.http,
      ProxyKind::Https => &self.https,
      ProxyKind::Socks => &self.socks,
    }
  }
}

/// A `host:port` pair with a non-blank host and a non-zero port
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ProxyEndpoint {
  host: String,
  port: u16,
}

impl ProxyEndpoint {
  pub fn new(host: impl Into<String>, port: u16) -> Option<Self> {
    let host = host.into();
    if host.trim().is_empty() || port == 0 {
      return None;
    }
    Some(Self { host, port })
  }

  pub fn host(&self) -> &str {
    &self.host
  }

  pub fn port(&self) -> u16 {
    self.port
  }
}

impl fmt::Display for ProxyEndpoint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.host, self.port)
  }
}

impl FromStr for ProxyEndpoint {
  type Err = ProviderError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (host, port) = s
      .rsplit_once(':')
      .ok_or_else(|| ProviderError::Parse(format!("missing port in `{s}`")))?;
    let port = port
      .parse::<u16>()
      .map_err(|e| ProviderError::Parse(format!("invalid port in `{s}`: {e}")))?;
    ProxyEndpoint::new(host, port)
      .ok_or_else(|| ProviderError::Parse(format!("incomplete proxy endpoint `{s}`")))
  }
}

impl From<ProxyEndpoint> for String {
  fn from(endpoint: ProxyEndpoint) -> Self {
    endpoint.to_string()
  }
}

impl TryFrom<String> for ProxyEndpoint {
  type Error = ProviderError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

/// Proxies the host currently routes through, one optional entry per kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxySettings {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub http_proxy: Option<ProxyEndpoint>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub https_proxy: Option<ProxyEndpoint>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub socks_proxy: Option<ProxyEndpoint>,
}

impl ProxySettings {
  pub fn from_config(config: &SystemProxyConfig) -> Self {
    Self {
      http_proxy: config.http.endpoint(),
      https_proxy: config.https.endpoint(),
      socks_proxy: config.socks.endpoint(),
    }
  }

  pub fn get(&self, kind: ProxyKind) -> Option<&ProxyEndpoint> {
    match kind {
      ProxyKind::Http => self.http_proxy.as_ref(),
      ProxyKind::Https => self.https_proxy.as_ref(),
      ProxyKind::Socks => self.socks_proxy.as_ref(),
    }
  }

  pub fn is_empty(&self) -> bool {
    ProxyKind::ALL.iter().all(|kind| self.get(*kind).is_none())
  }

  /// Flat `settings key -> "host:port"` mapping with zero to three entries
  pub fn to_map(&self) -> BTreeMap<String, String> {
    ProxyKind::ALL
      .iter()
      .filter_map(|kind| {
        self
          .get(*kind)
          .map(|endpoint| (kind.settings_key().to_string(), endpoint.to_string()))
      })
      .collect()
  }
}
