// proxyshim Channel
// Named method channel connecting the application shell to platform code

pub mod channel;
pub mod error;
pub mod handler;
pub mod proxy;
pub mod stdio;

pub use channel::MethodChannel;
pub use error::ChannelError;
pub use handler::MethodHandler;
pub use proxy::{GetProxySettingsHandler, proxy_settings_channel};
pub use proxyshim_channel_protocol::{MethodCall, MethodResponse};
