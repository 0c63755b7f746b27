//! Connection acceptance and release flows.
//!
//! A freshly accepted WebSocket is either a player joining their match's
//! session or an anonymous lobby viewer. These functions take the raw
//! connection the transport produced and either admit it into the
//! coordinator or reject it on the wire with an [`ErrorEnvelope`] before
//! closing it, so a refused client always learns why.

use std::sync::Arc;

use tessera_protocol::{MatchId, MatchSummary, Notification, PlayerId};
use tessera_registry::{GameChannel, MatchSessionCoordinator, RegistryError};
use tessera_transport::WebSocketConnection;

use crate::{TesseraError, WsChannel};

/// Admits a player connection into their match's session.
///
/// On a refused bind (no such session, or the player is already bound
/// elsewhere) the rejection is written to the socket as an error envelope
/// and the socket is closed before the error propagates.
pub async fn accept_player(
    coordinator: &Arc<MatchSessionCoordinator<WsChannel>>,
    match_id: MatchId,
    player: PlayerId,
    conn: WebSocketConnection,
) -> Result<WsChannel, TesseraError> {
    let channel = WsChannel::new(conn);
    match coordinator.bind(match_id, player, channel.clone()).await {
        Ok(()) => Ok(channel),
        Err(err) => {
            tracing::info!(%match_id, %player, error = %err, "player connection refused");
            if let Err(send_err) = channel.send_error(&err.to_string()).await {
                tracing::debug!(error = %send_err, "rejection did not reach the peer");
            }
            if let Err(close_err) = channel.close().await {
                tracing::debug!(error = %close_err, "close after rejection failed");
            }
            Err(err.into())
        }
    }
}

/// Releases a player connection, closing the socket.
///
/// Used by the disconnect path. A player already unbound (their leave
/// workflow ran first) is not an error here.
pub async fn release_player(
    coordinator: &Arc<MatchSessionCoordinator<WsChannel>>,
    match_id: MatchId,
    player: PlayerId,
) -> Result<(), TesseraError> {
    match coordinator.unbind(match_id, player).await {
        Ok(channel) => {
            if let Err(err) = channel.close().await {
                tracing::debug!(%player, error = %err, "close on release failed");
            }
            Ok(())
        }
        Err(RegistryError::PlayerNotBound { .. }) | Err(RegistryError::SessionNotFound(_)) => {
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// Admits an anonymous lobby connection and immediately sends it the
/// current match listing.
pub async fn accept_lobby(
    coordinator: &Arc<MatchSessionCoordinator<WsChannel>>,
    conn: WebSocketConnection,
    matches: Vec<MatchSummary>,
) -> Result<WsChannel, TesseraError> {
    let channel = WsChannel::new(conn);
    coordinator.add_anonymous(channel.clone()).await;
    if let Err(closed) = channel.deliver(&Notification::MatchesList { matches }).await {
        // The peer vanished before the listing went out; drop it again.
        coordinator.remove_anonymous(channel.id()).await;
        return Err(RegistryError::from(closed).into());
    }
    Ok(channel)
}

/// Releases an anonymous lobby connection.
///
/// Removal is idempotent, so a disconnect racing an explicit release is
/// harmless; the socket close is attempted either way.
pub async fn release_lobby(
    coordinator: &Arc<MatchSessionCoordinator<WsChannel>>,
    channel: &WsChannel,
) {
    coordinator.remove_anonymous(channel.id()).await;
    if let Err(err) = channel.close().await {
        tracing::debug!(conn = %channel.id(), error = %err, "close on lobby release failed");
    }
}
