use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use proxyshim_channel::stdio::{handle_line, serve};
use proxyshim_channel::{MethodCall, MethodChannel, MethodResponse, proxy_settings_channel};
use proxyshim_channel_protocol::{ChannelReply, DEFAULT_CHANNEL_NAME, GET_PROXY_SETTINGS};
use proxyshim_settings::{
  ProviderError, ProxySettingsReader, ProxySnapshot, StaticProxyProvider, SystemProxyProvider,
};

fn channel_for(snapshot: Value) -> MethodChannel {
  let snapshot = ProxySnapshot::from_json_value(snapshot).unwrap_or_default();
  let reader = Arc::new(ProxySettingsReader::new(StaticProxyProvider::new(snapshot)));
  proxy_settings_channel(DEFAULT_CHANNEL_NAME, reader)
}

#[test]
fn get_proxy_settings_returns_flat_mapping() {
  let channel = channel_for(json!({
    "HTTPEnable": 1, "HTTPProxy": "10.0.0.1", "HTTPPort": 8080,
    "HTTPSEnable": 0,
  }));

  assert_eq!(channel.name(), "com.activebook.clash_forge/proxy_settings");
  assert_eq!(
    channel.invoke(&MethodCall::new(GET_PROXY_SETTINGS)),
    MethodResponse::success(json!({"httpProxy": "10.0.0.1:8080"}))
  );
}

#[test]
fn get_proxy_settings_with_nothing_enabled_is_empty_object() {
  let channel = channel_for(json!({}));
  assert_eq!(
    channel.invoke(&MethodCall::new(GET_PROXY_SETTINGS)),
    MethodResponse::success(json!({}))
  );
}

#[test]
fn arguments_do_not_change_the_answer() {
  let channel = channel_for(json!({
    "SOCKSEnable": 1, "SOCKSProxy": "127.0.0.1", "SOCKSPort": 7890,
  }));
  let plain = channel.invoke(&MethodCall::new(GET_PROXY_SETTINGS));
  let with_args =
    channel.invoke(&MethodCall::new(GET_PROXY_SETTINGS).with_arguments(json!({"kind": "socks"})));
  assert_eq!(plain, with_args);
}

#[test]
fn unrecognized_method_is_not_implemented() {
  let channel = channel_for(json!({"HTTPEnable": 1}));
  for method in ["setProxySettings", "getproxysettings", "getProxySettings "] {
    assert_eq!(
      channel.invoke(&MethodCall::new(method)),
      MethodResponse::NotImplemented,
      "{method}"
    );
  }
}

struct UnavailableProvider;

impl SystemProxyProvider for UnavailableProvider {
  fn name(&self) -> &'static str {
    "unavailable"
  }

  fn snapshot(&self) -> proxyshim_settings::Result<ProxySnapshot> {
    Err(ProviderError::Unavailable("no dynamic store".to_string()))
  }
}

#[test]
fn provider_failure_still_succeeds_with_empty_mapping() {
  let reader = Arc::new(ProxySettingsReader::new(UnavailableProvider));
  let channel = proxy_settings_channel("test", reader);
  assert_eq!(
    channel.invoke(&MethodCall::new(GET_PROXY_SETTINGS)),
    MethodResponse::success(json!({}))
  );
}

#[test]
fn malformed_line_is_rejected_with_null_id() {
  let channel = channel_for(json!({}));
  let reply = handle_line(&channel, r#"{"method": "getProxySettings"}"#);
  assert_eq!(reply.id, None);
  assert!(matches!(
    reply.result,
    MethodResponse::Error { ref code, .. } if code == "invalid_request"
  ));
}

#[tokio::test]
async fn serve_answers_each_line_in_order() {
  let channel = channel_for(json!({
    "HTTPSEnable": 1, "HTTPSProxy": "secure.corp", "HTTPSPort": 443,
  }));
  let input = concat!(
    "{\"id\": 1, \"method\": \"getProxySettings\"}\n",
    "\n",
    "{\"id\": 2, \"method\": \"openSettings\", \"arguments\": null}\n",
    "not json\n",
    "{\"id\": 3, \"method\": \"getProxySettings\", \"arguments\": {}}\n",
  );
  let mut output = Vec::new();

  let answered = serve(&channel, input.as_bytes(), &mut output).await.unwrap();
  assert_eq!(answered, 4);

  let replies: Vec<ChannelReply> = String::from_utf8(output)
    .unwrap()
    .lines()
    .map(|line| serde_json::from_str(line).unwrap())
    .collect();

  let ids: Vec<Option<u64>> = replies.iter().map(|reply| reply.id).collect();
  assert_eq!(ids, vec![Some(1), Some(2), None, Some(3)]);
  assert_eq!(
    replies[0].result,
    MethodResponse::success(json!({"httpsProxy": "secure.corp:443"}))
  );
  assert_eq!(replies[1].result, MethodResponse::NotImplemented);
  assert!(!replies[2].result.is_success());
  assert_eq!(replies[3].result, replies[0].result);
}

#[tokio::test]
async fn serve_on_empty_input_answers_nothing() {
  let channel = channel_for(json!({}));
  let mut output = Vec::new();
  let answered = serve(&channel, "".as_bytes(), &mut output).await.unwrap();
  assert_eq!(answered, 0);
  assert!(output.is_empty());
}

#[tokio::test]
async fn serve_keeps_going_after_a_line_that_is_not_utf8() {
  let channel = channel_for(json!({}));
  let mut input = b"{\"id\": 1, \"method\": \"getProxySettings\"}\n".to_vec();
  input.extend_from_slice(b"\xff\xfe garbage\n");
  input.extend_from_slice(b"{\"id\": 2, \"method\": \"getProxySettings\"}");
  let mut output = Vec::new();

  let answered = serve(&channel, input.as_slice(), &mut output).await.unwrap();
  assert_eq!(answered, 3);

  let replies: Vec<ChannelReply> = String::from_utf8(output)
    .unwrap()
    .lines()
    .map(|line| serde_json::from_str(line).unwrap())
    .collect();

  let ids: Vec<Option<u64>> = replies.iter().map(|reply| reply.id).collect();
  assert_eq!(ids, vec![Some(1), None, Some(2)]);
  assert_eq!(replies[0].result, MethodResponse::success(json!({})));
  assert!(matches!(
    replies[1].result,
    MethodResponse::Error { ref code, .. } if code == "invalid_request"
  ));
  assert_eq!(replies[2].result, replies[0].result);
}
