//! WebSocket transport built on `tokio-tungstenite`.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace};
use url::Url;

use eventhub_core::error::{AppError, ErrorKind};
use eventhub_core::result::AppResult;

use super::transport::{ChannelLink, ChannelTransport};
use crate::message::types::WireFrame;
use crate::message::validator::validate_inbound;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Map a tungstenite error into the application taxonomy.
fn ws_error(context: &str, e: tungstenite::Error) -> AppError {
    AppError::with_source(ErrorKind::Transport, format!("{context}: {e}"), e)
}

/// Transport opening JSON-framed WebSocket connections to one endpoint.
#[derive(Debug, Clone)]
pub struct WsTransport {
    endpoint: Url,
}

impl WsTransport {
    /// Transport for `endpoint` (a `ws://` or `wss://` URL).
    pub fn new(endpoint: Url) -> Self {
        Self { endpoint }
    }

    /// The endpoint connections are opened to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChannelTransport for WsTransport {
    async fn connect(&self) -> AppResult<Box<dyn ChannelLink>> {
        debug!(endpoint = %self.endpoint, "Opening realtime connection");
        let (stream, response) = connect_async(self.endpoint.as_str())
            .await
            .map_err(|e| ws_error("WebSocket connect failed", e))?;
        trace!(status = %response.status(), "WebSocket upgrade complete");
        Ok(Box::new(WsLink { stream }))
    }
}

/// An open WebSocket carrying [`WireFrame`]s as JSON text messages.
struct WsLink {
    stream: WsStream,
}

impl WsLink {
    fn decode(raw: &str) -> AppResult<WireFrame> {
        validate_inbound(raw)?;
        serde_json::from_str(raw).map_err(|e| {
            AppError::with_source(ErrorKind::Serialization, "Undecodable channel frame", e)
        })
    }
}

#[async_trait]
impl ChannelLink for WsLink {
    async fn send(&mut self, frame: WireFrame) -> AppResult<()> {
        let text = serde_json::to_string(&frame)?;
        self.stream
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| ws_error("WebSocket send failed", e))
    }

    async fn recv(&mut self) -> Option<AppResult<WireFrame>> {
        loop {
            let message = match self.stream.next().await? {
                Ok(message) => message,
                Err(e) => return Some(Err(ws_error("WebSocket receive failed", e))),
            };
            match message {
                Message::Text(text) => return Some(Self::decode(text.as_str())),
                Message::Binary(bytes) => {
                    return Some(match std::str::from_utf8(&bytes) {
                        Ok(text) => Self::decode(text),
                        Err(e) => Err(AppError::with_source(
                            ErrorKind::Serialization,
                            "Binary channel frame is not UTF-8",
                            e,
                        )),
                    });
                }
                Message::Close(frame) => {
                    debug!(?frame, "Server closed realtime connection");
                    return None;
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            trace!(error = %e, "Ignoring error while closing WebSocket");
        }
    }
}
