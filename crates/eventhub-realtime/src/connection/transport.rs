//! Transport seam between the channel manager and the wire.

use async_trait::async_trait;

use eventhub_core::result::AppResult;

use crate::message::types::WireFrame;

/// Opens connections to the realtime endpoint.
#[async_trait]
pub trait ChannelTransport: Send + Sync + std::fmt::Debug + 'static {
    /// Open a new connection. The handshake is driven by the caller.
    async fn connect(&self) -> AppResult<Box<dyn ChannelLink>>;
}

/// One open connection.
#[async_trait]
pub trait ChannelLink: Send {
    /// Send a frame.
    async fn send(&mut self, frame: WireFrame) -> AppResult<()>;

    /// Next inbound frame.
    ///
    /// `None` means the peer closed the connection. A `Serialization` error
    /// is a single bad frame and the link stays usable; any other error is
    /// fatal to the link.
    async fn recv(&mut self) -> Option<AppResult<WireFrame>>;

    /// Close the connection. Errors are ignored.
    async fn close(&mut self);
}
