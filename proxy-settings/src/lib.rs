//! System proxy settings
//!
//! Reads the host's configured HTTP, HTTPS and SOCKS proxies through an
//! injected [`SystemProxyProvider`] and reduces them to a flat
//! `kind -> "host:port"` mapping.

pub mod error;
pub mod kind;
pub mod model;
pub mod provider;
pub mod reader;
pub mod snapshot;

pub use error::{ProviderError, Result};
pub use kind::ProxyKind;
pub use model::{ProxyEndpoint, ProxyKindConfig, ProxySettings, SystemProxyConfig};
#[cfg(target_os = "macos")]
pub use provider::MacosProxyProvider;
#[cfg(target_os = "windows")]
pub use provider::WindowsProxyProvider;
pub use provider::{
  EnvProxyProvider, StaticProxyProvider, SystemProxyProvider, default_provider, provider_for,
  snapshot_from_internet_settings,
};
pub use reader::ProxySettingsReader;
pub use snapshot::{ProxySnapshot, SnapshotValue};
