//! A live WebSocket as a registry channel.

use std::sync::Arc;

use tessera_protocol::{Codec, ErrorEnvelope, JsonCodec, Notification};
use tessera_registry::{ChannelClosed, GameChannel};
use tessera_transport::{Connection, ConnectionId, WebSocketConnection};

use crate::TesseraError;

/// Cloneable handle to one player's WebSocket, encoding notifications as
/// JSON text frames.
///
/// All clones share the underlying connection, so the registry can hand
/// out snapshots for delivery while the reader task keeps its own handle.
#[derive(Clone)]
pub struct WsChannel {
    conn: Arc<WebSocketConnection>,
    codec: JsonCodec,
}

impl WsChannel {
    pub fn new(conn: WebSocketConnection) -> Self {
        Self {
            conn: Arc::new(conn),
            codec: JsonCodec,
        }
    }

    /// The underlying connection, for the reader side.
    pub fn connection(&self) -> &WebSocketConnection {
        &self.conn
    }

    /// Sends an [`ErrorEnvelope`] with the given detail text.
    pub async fn send_error(&self, detail: &str) -> Result<(), TesseraError> {
        let text = self.codec.encode(&ErrorEnvelope::new(detail))?;
        self.conn.send(&text).await?;
        Ok(())
    }

    /// Closes the underlying connection.
    pub async fn close(&self) -> Result<(), TesseraError> {
        self.conn.close().await?;
        Ok(())
    }
}

impl GameChannel for WsChannel {
    fn id(&self) -> ConnectionId {
        self.conn.id()
    }

    /// Encodes and sends one notification.
    ///
    /// Any failure to get the frame onto the socket means the peer is no
    /// longer reachable through this handle, which is exactly what
    /// [`ChannelClosed`] tells the registry.
    async fn deliver(&self, msg: &Notification) -> Result<(), ChannelClosed> {
        let text = match self.codec.encode(msg) {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(conn = %self.conn.id(), error = %err, "notification failed to encode");
                return Err(ChannelClosed(self.conn.id()));
            }
        };
        self.conn
            .send(&text)
            .await
            .map_err(|_| ChannelClosed(self.conn.id()))
    }
}
