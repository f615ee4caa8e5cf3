use core_foundation::base::{CFType, TCFType};
use core_foundation::dictionary::CFDictionary;
use core_foundation::number::CFNumber;
use core_foundation::string::CFString;
use serde_json::Value;
use system_configuration::dynamic_store::SCDynamicStoreBuilder;

use crate::error::{ProviderError, Result};
use crate::kind::ProxyKind;
use crate::provider::SystemProxyProvider;
use crate::snapshot::{ProxySnapshot, SnapshotValue};

/// Reads the proxy dictionary published by `SCDynamicStoreCopyProxies`
#[derive(Debug, Clone)]
pub struct MacosProxyProvider {
  session_name: String,
}

impl MacosProxyProvider {
  pub fn new() -> Self {
    Self {
      session_name: "proxyshim".to_string(),
    }
  }
}

impl Default for MacosProxyProvider {
  fn default() -> Self {
    Self::new()
  }
}

impl SystemProxyProvider for MacosProxyProvider {
  fn name(&self) -> &'static str {
    "macos"
  }

  fn snapshot(&self) -> Result<ProxySnapshot> {
    let store = SCDynamicStoreBuilder::new(self.session_name.as_str()).build();
    let proxies = store.get_proxies().ok_or_else(|| {
      ProviderError::Unavailable("SCDynamicStoreCopyProxies returned no dictionary".to_string())
    })?;

    let mut snapshot = ProxySnapshot::new();
    for kind in ProxyKind::ALL {
      for key in [kind.enable_key(), kind.host_key(), kind.port_key()] {
        if let Some(value) = lookup(&proxies, &key) {
          snapshot.insert(key, value);
        }
      }
    }
    Ok(snapshot)
  }
}

fn lookup(proxies: &CFDictionary<CFString, CFType>, key: &str) -> Option<SnapshotValue> {
  let value = proxies.find(CFString::new(key))?;
  if let Some(number) = value.downcast::<CFNumber>() {
    return Some(match (number.to_i64(), number.to_f64()) {
      (Some(integer), _) => SnapshotValue::Integer(integer),
      (None, Some(float)) => SnapshotValue::Other(Value::from(float)),
      (None, None) => SnapshotValue::unsupported("CFNumber"),
    });
  }
  if let Some(text) = value.downcast::<CFString>() {
    return Some(SnapshotValue::String(text.to_string()));
  }
  let type_name = format!("CFTypeID {}", value.type_of());
  tracing::debug!(
    "Proxy key {} holds an unsupported CoreFoundation type ({})",
    key,
    type_name
  );
  Some(SnapshotValue::unsupported(type_name))
}
