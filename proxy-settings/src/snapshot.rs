//! Generic key/value view of the host's proxy configuration
//!
//! Every provider reduces whatever the OS hands back to a [`ProxySnapshot`]
//! keyed the way macOS names its proxy entries (`HTTPEnable`, `HTTPProxy`,
//! `HTTPPort`, ...). Typed extraction happens later in [`crate::model`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::kind::ProxyKind;

/// One value of a snapshot entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum SnapshotValue {
  Integer(i64),
  String(String),
  /// Anything that is neither an integer nor a string
  Other(Value),
}

impl SnapshotValue {
  /// Placeholder for an OS value with no JSON form, recording its type
  pub fn unsupported(type_name: impl AsRef<str>) -> Self {
    SnapshotValue::Other(Value::String(format!("<{}>", type_name.as_ref())))
  }

  pub fn as_integer(&self) -> Option<i64> {
    match self {
      SnapshotValue::Integer(value) => Some(*value),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      SnapshotValue::String(value) => Some(value),
      _ => None,
    }
  }
}

impl From<Value> for SnapshotValue {
  fn from(value: Value) -> Self {
    match value {
      Value::Number(number) => match number.as_i64() {
        Some(integer) => SnapshotValue::Integer(integer),
        None => SnapshotValue::Other(Value::Number(number)),
      },
      Value::String(text) => SnapshotValue::String(text),
      other => SnapshotValue::Other(other),
    }
  }
}

impl From<SnapshotValue> for Value {
  fn from(value: SnapshotValue) -> Self {
    match value {
      SnapshotValue::Integer(integer) => Value::from(integer),
      SnapshotValue::String(text) => Value::String(text),
      SnapshotValue::Other(other) => other,
    }
  }
}

impl From<i64> for SnapshotValue {
  fn from(value: i64) -> Self {
    SnapshotValue::Integer(value)
  }
}

impl From<i32> for SnapshotValue {
  fn from(value: i32) -> Self {
    SnapshotValue::Integer(i64::from(value))
  }
}

impl From<&str> for SnapshotValue {
  fn from(value: &str) -> Self {
    SnapshotValue::String(value.to_string())
  }
}

impl From<String> for SnapshotValue {
  fn from(value: String) -> Self {
    SnapshotValue::String(value)
  }
}

/// Point-in-time copy of the host proxy configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProxySnapshot {
  entries: BTreeMap<String, SnapshotValue>,
}

impl ProxySnapshot {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SnapshotValue>) {
    self.entries.insert(key.into(), value.into());
  }

  pub fn with(mut self, key: impl Into<String>, value: impl Into<SnapshotValue>) -> Self {
    self.insert(key, value);
    self
  }

  pub fn get(&self, key: &str) -> Option<&SnapshotValue> {
    self.entries.get(key)
  }

  /// Integer stored under `key`; `None` when missing or of another type
  pub fn integer(&self, key: &str) -> Option<i64> {
    self.get(key).and_then(SnapshotValue::as_integer)
  }

  /// String stored under `key`; `None` when missing or of another type
  pub fn string(&self, key: &str) -> Option<&str> {
    self.get(key).and_then(SnapshotValue::as_str)
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &SnapshotValue)> {
    self.entries.iter().map(|(key, value)| (key.as_str(), value))
  }

  /// Record a kind as enabled with the given host and optional port
  pub(crate) fn insert_kind(&mut self, kind: ProxyKind, enabled: i64, host: &str, port: Option<i64>) {
    self.insert(kind.enable_key(), enabled);
    self.insert(kind.host_key(), host);
    if let Some(port) = port {
      self.insert(kind.port_key(), port);
    }
  }

  /// Decode a snapshot from a JSON object
  pub fn from_json_value(value: Value) -> Result<Self> {
    match value {
      Value::Object(map) => Ok(Self {
        entries: map
          .into_iter()
          .map(|(key, value)| (key, SnapshotValue::from(value)))
          .collect(),
      }),
      other => Err(ProviderError::Parse(format!(
        "expected a JSON object, found {}",
        json_type_name(&other)
      ))),
    }
  }

  pub fn from_json_str(text: &str) -> Result<Self> {
    let value: Value = serde_json::from_str(text)?;
    Self::from_json_value(value)
  }

  pub fn from_json_file(path: &Path) -> Result<Self> {
    let text = std::fs::read_to_string(path).map_err(|source| ProviderError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_json_str(&text)
  }
}

impl<K, V> FromIterator<(K, V)> for ProxySnapshot
where
  K: Into<String>,
  V: Into<SnapshotValue>,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut snapshot = ProxySnapshot::new();
    for (key, value) in iter {
      snapshot.insert(key, value);
    }
    snapshot
  }
}

fn json_type_name(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use serde_json::json;

  use super::*;

  #[test]
  fn typed_lookups_reject_mismatched_values() {
    let snapshot = ProxySnapshot::from_json_value(json!({
      "HTTPEnable": 1,
      "HTTPProxy": 8080,
      "HTTPPort": "8080",
      "HTTPSPort": 443.5,
    }))
    .unwrap();

    assert_eq!(snapshot.integer("HTTPEnable"), Some(1));
    assert_eq!(snapshot.string("HTTPProxy"), None);
    assert_eq!(snapshot.integer("HTTPPort"), None);
    assert_eq!(snapshot.integer("HTTPSPort"), None);
    assert_eq!(
      snapshot.get("HTTPSPort"),
      Some(&SnapshotValue::Other(json!(443.5)))
    );
  }

  #[test]
  fn unsupported_values_keep_their_type_name() {
    let snapshot = ProxySnapshot::new()
      .with("HTTPEnable", 1)
      .with("HTTPPort", SnapshotValue::unsupported("CFTypeID 21"));

    assert_eq!(snapshot.integer("HTTPPort"), None);
    assert_eq!(
      serde_json::to_value(&snapshot).unwrap(),
      json!({"HTTPEnable": 1, "HTTPPort": "<CFTypeID 21>"})
    );
  }

  #[test]
  fn rejects_non_object_json() {
    let err = ProxySnapshot::from_json_str("[1, 2]").unwrap_err();
    assert_eq!(
      err.to_string(),
      "invalid proxy snapshot: expected a JSON object, found an array"
    );
  }

  #[test]
  fn serializes_as_plain_object() {
    let snapshot = ProxySnapshot::new()
      .with("SOCKSEnable", 1)
      .with("SOCKSProxy", "127.0.0.1")
      .with("SOCKSPort", 1080);

    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(
      value,
      json!({"SOCKSEnable": 1, "SOCKSPort": 1080, "SOCKSProxy": "127.0.0.1"})
    );
  }

  #[test]
  fn reads_snapshot_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("proxies.json");
    std::fs::write(&path, r#"{"HTTPEnable": 0}"#).unwrap();

    let snapshot = ProxySnapshot::from_json_file(&path).unwrap();
    assert_eq!(snapshot.integer("HTTPEnable"), Some(0));

    let missing = ProxySnapshot::from_json_file(&dir.path().join("missing.json"));
    assert!(matches!(missing, Err(ProviderError::Io { .. })));
  }
}
