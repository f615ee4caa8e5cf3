// proxyshim Channel Protocol
// Messages exchanged with the application shell

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Channel name the shell binds to unless configured otherwise
pub const DEFAULT_CHANNEL_NAME: &str = "com.activebook.clash_forge/proxy_settings";

/// Method returning the host's proxy settings
pub const GET_PROXY_SETTINGS: &str = "getProxySettings";

/// Error code for a request line that could not be decoded
pub const INVALID_REQUEST: &str = "invalid_request";

/// A named request with optional arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
  pub method: String,
  #[serde(default)]
  pub arguments: Value,
}

impl MethodCall {
  pub fn new(method: impl Into<String>) -> Self {
    Self {
      method: method.into(),
      arguments: Value::Null,
    }
  }

  pub fn with_arguments(mut self, arguments: Value) -> Self {
    self.arguments = arguments;
    self
  }
}

/// Outcome of a method call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodResponse {
  Success {
    value: Value,
  },
  Error {
    code: String,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
  },
  /// No handler is registered for the method
  NotImplemented,
}

impl MethodResponse {
  pub fn success(value: Value) -> Self {
    MethodResponse::Success { value }
  }

  pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
    MethodResponse::Error {
      code: code.into(),
      message: message.into(),
      details: None,
    }
  }

  pub fn is_success(&self) -> bool {
    matches!(self, MethodResponse::Success { .. })
  }
}

/// Request line on a stream transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRequest {
  pub id: u64,
  #[serde(flatten)]
  pub call: MethodCall,
}

/// Response line on a stream transport; `id` is null when the request could not be read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelReply {
  pub id: Option<u64>,
  pub result: MethodResponse,
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use serde_json::json;

  use super::*;

  #[test]
  fn request_without_arguments_decodes() {
    let request: ChannelRequest =
      serde_json::from_value(json!({"id": 7, "method": "getProxySettings"})).unwrap();
    assert_eq!(request.id, 7);
    assert_eq!(request.call, MethodCall::new(GET_PROXY_SETTINGS));
  }

  #[test]
  fn responses_are_tagged_by_status() {
    let reply = ChannelReply {
      id: Some(1),
      result: MethodResponse::NotImplemented,
    };
    assert_eq!(
      serde_json::to_value(&reply).unwrap(),
      json!({"id": 1, "result": {"status": "notImplemented"}})
    );

    let success = MethodResponse::success(json!({"httpProxy": "10.0.0.1:8080"}));
    assert_eq!(
      serde_json::to_value(&success).unwrap(),
      json!({"status": "success", "value": {"httpProxy": "10.0.0.1:8080"}})
    );

    let error = MethodResponse::error(INVALID_REQUEST, "bad line");
    assert_eq!(
      serde_json::to_value(&error).unwrap(),
      json!({"status": "error", "code": "invalid_request", "message": "bad line"})
    );
  }
}
