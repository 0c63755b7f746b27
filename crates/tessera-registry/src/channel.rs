//! The channel abstraction the registry stores.

use tessera_protocol::Notification;
use tessera_transport::ConnectionId;

/// Recoverable delivery failure: the peer is gone but the registry entry
/// may still exist. The caller decides whether to also unbind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("channel {0} is closed")]
pub struct ChannelClosed(pub ConnectionId);

/// A cloneable outbound handle to one live connection.
///
/// The registry stores these and clones them out before delivering, so a
/// slow or stuck peer never blocks the registry maps. Implementations must
/// make `deliver` report a closed peer as [`ChannelClosed`] rather than
/// panicking — a stale binding racing a disconnect is an expected state,
/// not a bug.
pub trait GameChannel: Clone + Send + Sync + 'static {
    /// The identity of the underlying physical connection.
    fn id(&self) -> ConnectionId;

    /// Delivers one notification to the peer.
    async fn deliver(&self, msg: &Notification) -> Result<(), ChannelClosed>;
}
