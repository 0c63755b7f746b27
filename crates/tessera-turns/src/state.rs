//! Match lifecycle state and the records the decision logic reads.

use serde::{Deserialize, Serialize};
use tessera_protocol::{MatchId, PlayerId};

// ---------------------------------------------------------------------------
// MatchState
// ---------------------------------------------------------------------------

/// The lifecycle state of a match.
///
/// Transitions are strictly forward — no regression:
///
/// ```text
/// WAITING → STARTED → FINISHED
/// ```
///
/// - **Waiting**: the lobby phase. Players join and leave (except the
///   owner); `current_turn` is meaningless here.
/// - **Started**: play is active. `current_turn` points at the turn holder.
/// - **Finished**: the match ended (win, forfeit, or emptied out).
///
/// Serialized as SCREAMING_SNAKE_CASE because that is what the persisted
/// records and the clients use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchState {
    Waiting,
    Started,
    Finished,
}

impl MatchState {
    /// Returns `true` while play is active and turns rotate.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Started)
    }

    /// Returns `true` if new players may still join.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Attempts to transition to the next state.
    ///
    /// Returns `Some(next)` if a forward transition exists, `None` at the
    /// end of the lifecycle.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Waiting => Some(Self::Started),
            Self::Started => Some(Self::Finished),
            Self::Finished => None,
        }
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }
}

impl std::fmt::Display for MatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "WAITING"),
            Self::Started => write!(f, "STARTED"),
            Self::Finished => write!(f, "FINISHED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// The business data of one match, as loaded from storage.
///
/// Invariants the decision logic relies on:
/// - `current_players <= max_players`
/// - `current_turn` is in `1..=current_players` while [`MatchState::Started`]
/// - seat numbering is densely packed `1..=current_players`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub name: String,
    pub state: MatchState,
    pub current_players: u8,
    pub max_players: u8,
    /// Seat number of the turn holder. Meaningful only while STARTED.
    pub current_turn: u8,
    pub is_public: bool,
}

/// The business data of one player, as loaded from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    /// The match this player belongs to; `None` once removed.
    pub match_id: Option<MatchId>,
    /// Seat number, unique within a match while present. 0 until seats are
    /// dealt at match start.
    pub turn_order: u8,
    /// Exactly one owner per match while WAITING.
    pub is_owner: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_state_next_follows_strict_order() {
        assert_eq!(MatchState::Waiting.next(), Some(MatchState::Started));
        assert_eq!(MatchState::Started.next(), Some(MatchState::Finished));
        assert_eq!(MatchState::Finished.next(), None);
    }

    #[test]
    fn test_match_state_can_transition_to() {
        assert!(MatchState::Waiting.can_transition_to(MatchState::Started));
        assert!(!MatchState::Waiting.can_transition_to(MatchState::Finished));
        assert!(!MatchState::Finished.can_transition_to(MatchState::Waiting));
        assert!(!MatchState::Started.can_transition_to(MatchState::Waiting));
    }

    #[test]
    fn test_match_state_predicates() {
        assert!(MatchState::Waiting.is_joinable());
        assert!(!MatchState::Started.is_joinable());
        assert!(MatchState::Started.is_active());
        assert!(!MatchState::Finished.is_active());
    }

    #[test]
    fn test_match_state_wire_values() {
        assert_eq!(
            serde_json::to_string(&MatchState::Waiting).unwrap(),
            "\"WAITING\""
        );
        assert_eq!(
            serde_json::to_string(&MatchState::Started).unwrap(),
            "\"STARTED\""
        );
        assert_eq!(
            serde_json::to_string(&MatchState::Finished).unwrap(),
            "\"FINISHED\""
        );
    }

    #[test]
    fn test_match_state_display_matches_wire() {
        assert_eq!(MatchState::Waiting.to_string(), "WAITING");
        assert_eq!(MatchState::Finished.to_string(), "FINISHED");
    }
}
