//! Error types for turn and lifecycle decisions.

use tessera_protocol::PlayerId;

/// Business-rule violations surfaced by the decision functions.
///
/// None of these mutate anything; a rejected request leaves the match
/// exactly as it was loaded.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    /// The acting player does not hold the current turn.
    #[error("it's not player {0}'s turn")]
    NotPlayersTurn(PlayerId),

    /// The match owner may not leave while the match is WAITING.
    #[error("owner {0} cannot leave a waiting match")]
    OwnerCannotLeave(PlayerId),

    /// The operation needs an active (or at least non-finished) match.
    #[error("match is {state}, operation requires an active match")]
    MatchNotActive { state: crate::MatchState },

    /// The computed next seat has no player in it. Seat numbering is
    /// supposed to stay densely packed; hitting this means the persisted
    /// records are inconsistent.
    #[error("no player seated at turn {0}")]
    SeatVacant(u8),
}
