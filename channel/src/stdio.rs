//! Newline-delimited JSON host for a [`MethodChannel`]
//!
//! Each input line is a [`ChannelRequest`]; each non-blank line gets exactly
//! one [`ChannelReply`] line back, in order.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use proxyshim_channel_protocol::{ChannelReply, ChannelRequest, INVALID_REQUEST, MethodResponse};

use crate::channel::MethodChannel;

/// Serve requests from `reader` until end of input, returning how many were answered
pub async fn serve<R, W>(
  channel: &MethodChannel,
  mut reader: R,
  mut writer: W,
) -> io::Result<usize>
where
  R: AsyncBufRead + Unpin,
  W: AsyncWrite + Unpin,
{
  let mut buf = Vec::new();
  let mut answered = 0;

  loop {
    buf.clear();
    if reader.read_until(b'\n', &mut buf).await? == 0 {
      break;
    }

    let reply = match std::str::from_utf8(&buf) {
      Ok(line) if line.trim().is_empty() => continue,
      Ok(line) => handle_line(channel, line.trim()),
      Err(e) => {
        tracing::warn!("{}: rejecting request that is not UTF-8: {}", channel.name(), e);
        invalid_request(format!("request is not valid UTF-8: {e}"))
      }
    };

    let mut encoded = serde_json::to_vec(&reply).map_err(io::Error::other)?;
    encoded.push(b'\n');
    writer.write_all(&encoded).await?;
    writer.flush().await?;
    answered += 1;
  }

  tracing::debug!("{}: input closed after {} requests", channel.name(), answered);
  Ok(answered)
}

fn invalid_request(message: String) -> ChannelReply {
  ChannelReply {
    id: None,
    result: MethodResponse::error(INVALID_REQUEST, message),
  }
}

/// Decode one request line and dispatch it
pub fn handle_line(channel: &MethodChannel, line: &str) -> ChannelReply {
  match serde_json::from_str::<ChannelRequest>(line) {
    Ok(request) => ChannelReply {
      id: Some(request.id),
      result: channel.invoke(&request.call),
    },
    Err(e) => {
      tracing::warn!("{}: rejecting malformed request: {}", channel.name(), e);
      invalid_request(e.to_string())
    }
  }
}
