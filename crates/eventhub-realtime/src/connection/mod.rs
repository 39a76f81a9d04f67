//! Realtime connection lifecycle: transport seam, WebSocket transport,
//! endpoint derivation, and the channel manager.

pub mod endpoint;
pub mod manager;
pub mod state;
pub mod transport;
pub mod websocket;

pub use endpoint::channel_endpoint;
pub use manager::ChannelManager;
pub use state::{ConnectionSnapshot, ConnectionState};
pub use transport::{ChannelLink, ChannelTransport};
pub use websocket::WsTransport;
