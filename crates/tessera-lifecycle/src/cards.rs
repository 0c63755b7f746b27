//! The deck-engine seam.

use tessera_protocol::PlayerId;

/// A failure while dealing a card.
#[derive(Debug, thiserror::Error)]
#[error("card issuance failed for {player}: {detail}")]
pub struct CardError {
    pub player: PlayerId,
    pub detail: String,
}

/// Deals cards to players at the points the turn flow requires.
///
/// Issuance happens strictly after the turn's notifications have been
/// broadcast, so implementations may themselves push card messages to the
/// affected player without racing the turn announcement. Deals are
/// fire-and-forget from the turn flow's perspective: an error here is
/// logged by the caller, and the already-completed turn stands.
pub trait CardIssuer: Send + Sync {
    /// Deals a movement card to the player who just finished their turn.
    async fn issue_movement_card(&self, player: PlayerId) -> Result<(), CardError>;

    /// Deals a shape card to a player. `initial_deal` marks the hand
    /// dealt at match start, which follows different sizing rules than
    /// the single per-turn top-up.
    async fn issue_shape_card(&self, player: PlayerId, initial_deal: bool)
    -> Result<(), CardError>;
}
