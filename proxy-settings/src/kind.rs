use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of proxy the host can be configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyKind {
  Http,
  Https,
  Socks,
}

impl ProxyKind {
  pub const ALL: [ProxyKind; 3] = [ProxyKind::Http, ProxyKind::Https, ProxyKind::Socks];

  /// Prefix of this kind's keys in the system snapshot (`HTTPEnable`, `HTTPProxy`, ...)
  pub fn snapshot_prefix(self) -> &'static str {
    match self {
      ProxyKind::Http => "HTTP",
      ProxyKind::Https => "HTTPS",
      ProxyKind::Socks => "SOCKS",
    }
  }

  pub fn enable_key(self) -> String {
    format!("{}Enable", self.snapshot_prefix())
  }

  pub fn host_key(self) -> String {
    format!("{}Proxy", self.snapshot_prefix())
  }

  pub fn port_key(self) -> String {
    format!("{}Port", self.snapshot_prefix())
  }

  /// Key this kind is reported under in the settings mapping
  pub fn settings_key(self) -> &'static str {
    match self {
      ProxyKind::Http => "httpProxy",
      ProxyKind::Https => "httpsProxy",
      ProxyKind::Socks => "socksProxy",
    }
  }
}

impl fmt::Display for ProxyKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.snapshot_prefix())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn keys_follow_system_naming() {
    assert_eq!(ProxyKind::Https.enable_key(), "HTTPSEnable");
    assert_eq!(ProxyKind::Https.host_key(), "HTTPSProxy");
    assert_eq!(ProxyKind::Https.port_key(), "HTTPSPort");
    assert_eq!(ProxyKind::Socks.settings_key(), "socksProxy");
  }
}
