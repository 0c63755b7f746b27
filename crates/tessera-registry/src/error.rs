//! Error types for the registry layer.

use tessera_protocol::{MatchId, PlayerId};

use crate::ChannelClosed;

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// `open_session` on a match that already has one.
    #[error("session for match {0} is already open")]
    SessionAlreadyOpen(MatchId),

    /// No session is open for the match.
    #[error("no session open for match {0}")]
    SessionNotFound(MatchId),

    /// The player already owns a channel — in this session or another.
    /// A player id appears in at most one match-slot at a time.
    #[error("player {player} already has an active connection to match {existing}")]
    PlayerAlreadyBound {
        player: PlayerId,
        existing: MatchId,
    },

    /// The player has no channel in this session. Some call sites treat
    /// this as benign (a disconnect racing an explicit leave), others
    /// surface it.
    #[error("player {player} is not connected to match {match_id}")]
    PlayerNotBound {
        player: PlayerId,
        match_id: MatchId,
    },

    /// Transport-level delivery failure. Recoverable: the registry state
    /// is intact, only the message did not arrive.
    #[error(transparent)]
    Delivery(#[from] ChannelClosed),
}
