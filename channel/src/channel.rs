use std::collections::HashMap;
use std::sync::Arc;

use proxyshim_channel_protocol::{MethodCall, MethodResponse};

use crate::handler::MethodHandler;

/// In-process request/response channel keyed by method name
pub struct MethodChannel {
  name: String,
  handlers: HashMap<String, Arc<dyn MethodHandler>>,
}

impl MethodChannel {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      handlers: HashMap::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Register `handler` for `method`, replacing any previous one
  pub fn register(&mut self, method: impl Into<String>, handler: Arc<dyn MethodHandler>) {
    self.handlers.insert(method.into(), handler);
  }

  pub fn with_handler(mut self, method: impl Into<String>, handler: Arc<dyn MethodHandler>) -> Self {
    self.register(method, handler);
    self
  }

  pub fn methods(&self) -> Vec<String> {
    let mut methods: Vec<String> = self.handlers.keys().cloned().collect();
    methods.sort();
    methods
  }

  /// Dispatch a call; unknown methods answer `NotImplemented`
  pub fn invoke(&self, call: &MethodCall) -> MethodResponse {
    let Some(handler) = self.handlers.get(&call.method) else {
      tracing::debug!("{}: no handler for method {}", self.name, call.method);
      return MethodResponse::NotImplemented;
    };

    match handler.handle(call) {
      Ok(value) => MethodResponse::success(value),
      Err(e) => {
        tracing::warn!("{}: method {} failed: {}", self.name, call.method, e);
        MethodResponse::error(e.code(), e.to_string())
      }
    }
  }
}
