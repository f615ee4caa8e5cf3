//! Sources of system proxy snapshots
//!
//! The OS is reached only through [`SystemProxyProvider`], so the reader can
//! be driven by a fixed snapshot in tests.

mod env;
#[cfg(target_os = "macos")]
mod macos;
mod static_snapshot;
mod windows;

use std::sync::Arc;

use proxyshim_config::{ProviderConfig, ProviderSource};

use crate::error::{ProviderError, Result};
use crate::snapshot::ProxySnapshot;

pub use env::EnvProxyProvider;
#[cfg(target_os = "macos")]
pub use macos::MacosProxyProvider;
pub use static_snapshot::StaticProxyProvider;
#[cfg(target_os = "windows")]
pub use windows::WindowsProxyProvider;
pub use windows::snapshot_from_internet_settings;

/// Capability to read the host's current proxy configuration
pub trait SystemProxyProvider: Send + Sync {
  /// Short name used in logs
  fn name(&self) -> &'static str;

  /// Take a fresh snapshot of the proxy configuration
  fn snapshot(&self) -> Result<ProxySnapshot>;
}

impl<T: SystemProxyProvider + ?Sized> SystemProxyProvider for Box<T> {
  fn name(&self) -> &'static str {
    (**self).name()
  }

  fn snapshot(&self) -> Result<ProxySnapshot> {
    (**self).snapshot()
  }
}

impl<T: SystemProxyProvider + ?Sized> SystemProxyProvider for Arc<T> {
  fn name(&self) -> &'static str {
    (**self).name()
  }

  fn snapshot(&self) -> Result<ProxySnapshot> {
    (**self).snapshot()
  }
}

/// Native provider for the build target
#[cfg(target_os = "macos")]
pub fn default_provider() -> Box<dyn SystemProxyProvider> {
  Box::new(MacosProxyProvider::new())
}

/// Native provider for the build target
#[cfg(target_os = "windows")]
pub fn default_provider() -> Box<dyn SystemProxyProvider> {
  Box::new(WindowsProxyProvider::new())
}

/// Native provider for the build target
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub fn default_provider() -> Box<dyn SystemProxyProvider> {
  Box::new(EnvProxyProvider::new())
}

/// Build the provider selected in configuration
pub fn provider_for(config: &ProviderConfig) -> Result<Box<dyn SystemProxyProvider>> {
  match config.source {
    ProviderSource::System => Ok(default_provider()),
    ProviderSource::Env => Ok(Box::new(EnvProxyProvider::new())),
    ProviderSource::Static => {
      let path = config.snapshot_path.as_deref().ok_or_else(|| {
        ProviderError::Unavailable("provider.snapshot_path is not set".to_string())
      })?;
      Ok(Box::new(StaticProxyProvider::from_json_file(path)?))
    }
  }
}
