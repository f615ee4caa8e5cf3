use std::path::Path;

use crate::error::Result;
use crate::provider::SystemProxyProvider;
use crate::snapshot::ProxySnapshot;

/// Provider that always answers with the same snapshot
#[derive(Debug, Clone, Default)]
pub struct StaticProxyProvider {
  snapshot: ProxySnapshot,
}

impl StaticProxyProvider {
  pub fn new(snapshot: ProxySnapshot) -> Self {
    Self { snapshot }
  }

  pub fn from_json_file(path: &Path) -> Result<Self> {
    let snapshot = ProxySnapshot::from_json_file(path)?;
    tracing::debug!(
      "Loaded {} proxy snapshot entries from {}",
      snapshot.len(),
      path.display()
    );
    Ok(Self::new(snapshot))
  }
}

impl SystemProxyProvider for StaticProxyProvider {
  fn name(&self) -> &'static str {
    "static"
  }

  fn snapshot(&self) -> Result<ProxySnapshot> {
    Ok(self.snapshot.clone())
  }
}
