use crate::kind::ProxyKind;
use crate::snapshot::ProxySnapshot;

#[cfg(target_os = "windows")]
const INTERNET_SETTINGS_PATH: &str = r"Software\Microsoft\Windows\CurrentVersion\Internet Settings";

/// Normalize the per-user Internet Settings values into snapshot keys.
///
/// `ProxyServer` is either a bare `host:port`, which Windows applies to HTTP
/// and HTTPS, or a `scheme=host:port;...` list. `ProxyEnable` becomes the
/// enable flag of every kind that has a server entry.
pub fn snapshot_from_internet_settings(enable: Option<u32>, server: Option<&str>) -> ProxySnapshot {
  let mut snapshot = ProxySnapshot::new();
  let enable = i64::from(enable.unwrap_or(0));
  let server = match server.map(str::trim).filter(|server| !server.is_empty()) {
    Some(server) => server,
    None => return snapshot,
  };

  if server.contains('=') {
    for entry in server.split(';').map(str::trim).filter(|entry| !entry.is_empty()) {
      let Some((scheme, address)) = entry.split_once('=') else {
        continue;
      };
      let kind = match scheme.trim().to_ascii_lowercase().as_str() {
        "http" => ProxyKind::Http,
        "https" => ProxyKind::Https,
        "socks" | "socks4" | "socks5" => ProxyKind::Socks,
        other => {
          tracing::debug!("Skipping unsupported Windows proxy scheme {}", other);
          continue;
        }
      };
      insert_address(&mut snapshot, kind, enable, address);
    }
  } else {
    insert_address(&mut snapshot, ProxyKind::Http, enable, server);
    insert_address(&mut snapshot, ProxyKind::Https, enable, server);
  }
  snapshot
}

fn insert_address(snapshot: &mut ProxySnapshot, kind: ProxyKind, enable: i64, address: &str) {
  let address = address.trim();
  let address = address
    .split_once("://")
    .map_or(address, |(_, rest)| rest)
    .trim_end_matches('/');
  let (host, port) = match address.rsplit_once(':') {
    Some((host, port)) if !host.ends_with(':') => match port.parse::<i64>() {
      Ok(port) => (host, Some(port)),
      Err(_) => (address, None),
    },
    _ => (address, None),
  };
  snapshot.insert_kind(kind, enable, host, port);
}

/// Reads `HKCU\...\Internet Settings` through the registry
#[cfg(target_os = "windows")]
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsProxyProvider;

#[cfg(target_os = "windows")]
impl WindowsProxyProvider {
  pub fn new() -> Self {
    Self
  }
}

#[cfg(target_os = "windows")]
impl crate::provider::SystemProxyProvider for WindowsProxyProvider {
  fn name(&self) -> &'static str {
    "windows"
  }

  fn snapshot(&self) -> crate::error::Result<ProxySnapshot> {
    use winreg::RegKey;
    use winreg::enums::HKEY_CURRENT_USER;

    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    let settings = hkcu
      .open_subkey(INTERNET_SETTINGS_PATH)
      .map_err(|source| crate::error::ProviderError::Io {
        path: std::path::PathBuf::from(INTERNET_SETTINGS_PATH),
        source,
      })?;

    let enable: Option<u32> = settings.get_value("ProxyEnable").ok();
    let server: Option<String> = settings.get_value("ProxyServer").ok();
    tracing::debug!(
      "Windows Internet Settings: ProxyEnable={:?} ProxyServer={:?}",
      enable,
      server
    );
    Ok(snapshot_from_internet_settings(enable, server.as_deref()))
  }
}
