//! The persistence seam.
//!
//! Workflows read and write match and player records exclusively through
//! [`MatchStore`], which keeps this crate independent of the actual
//! database and lets tests run against a plain in-memory map.

use tessera_protocol::{MatchId, PlayerId};
use tessera_turns::{MatchRecord, MatchState, PlayerRecord};

/// A failure inside the storage backend.
#[derive(Debug, thiserror::Error)]
#[error("storage backend failure: {0}")]
pub struct StoreError(pub String);

/// Read and write access to persisted match and player records.
///
/// Callers hold the per-match guard across any sequence of these calls,
/// so implementations do not need their own cross-call consistency.
pub trait MatchStore: Send + Sync {
    /// Loads a match record, `None` if no such match exists.
    async fn find_match(&self, id: MatchId) -> Result<Option<MatchRecord>, StoreError>;

    /// Loads a player record, `None` if no such player exists.
    async fn find_player(&self, id: PlayerId) -> Result<Option<PlayerRecord>, StoreError>;

    /// Every player currently seated in the match, in no particular order.
    async fn players_in_match(&self, id: MatchId) -> Result<Vec<PlayerRecord>, StoreError>;

    /// Writes the match's state and player count.
    async fn update_match(
        &self,
        id: MatchId,
        state: MatchState,
        current_players: u8,
    ) -> Result<(), StoreError>;

    /// Writes the match's turn pointer.
    async fn update_turn(&self, id: MatchId, turn: u8) -> Result<(), StoreError>;

    /// Writes one player's seat number.
    async fn set_turn_order(&self, player: PlayerId, order: u8) -> Result<(), StoreError>;

    /// Deletes a player record.
    async fn delete_player(&self, player: PlayerId) -> Result<(), StoreError>;
}
