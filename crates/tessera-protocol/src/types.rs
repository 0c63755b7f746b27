//! Core wire types for Tessera notifications.
//!
//! Every structure here has an exact JSON shape that the client expects.
//! Notifications travel as `{"key": "...", "payload": {...}}` envelopes;
//! the tests at the bottom pin those shapes against literal JSON, because a
//! drift here silently breaks every connected client.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Unique identifier for a match.
///
/// Newtype over `u64` so a match id can never be passed where a player id
/// is expected. `#[serde(transparent)]` keeps the wire form a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub u64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M-{}", self.0)
    }
}

/// Unique identifier for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Winning reasons
// ---------------------------------------------------------------------------

/// Why a match ended with a winner.
///
/// The wire values are SCREAMING_SNAKE_CASE strings; `FORFEIT` is what the
/// session layer itself produces (all opponents left an active match).
/// `NORMAL` is reserved for a regular end-of-game win decided by the game
/// rules, which live outside this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WinReason {
    Normal,
    Forfeit,
}

impl fmt::Display for WinReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Forfeit => write!(f, "FORFEIT"),
        }
    }
}

// ---------------------------------------------------------------------------
// Lobby listing
// ---------------------------------------------------------------------------

/// A summary of one match in a `MATCHES_LIST` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub id: MatchId,
    pub name: String,
    pub current_players: u8,
    pub max_players: u8,
    pub is_public: bool,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// A server-to-client notification.
///
/// `#[serde(tag = "key", content = "payload")]` produces the adjacently
/// tagged envelope the clients parse:
///
/// ```json
/// { "key": "PLAYER_LEFT", "payload": { "name": "alice" } }
/// ```
///
/// Variant names render as SCREAMING_SNAKE_CASE keys. The `Reason` field of
/// `Winner` is capitalized on the wire; that casing is part of the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "key", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Notification {
    /// A player left their match (voluntarily or eliminated).
    PlayerLeft { name: String },

    /// The match ended with a winner.
    Winner {
        player_id: PlayerId,
        #[serde(rename = "Reason")]
        reason: WinReason,
    },

    /// The turn passed from one player to the next.
    EndPlayerTurn {
        current_player_name: String,
        next_player_name: String,
        next_player_turn: u8,
    },

    /// Lobby listing, delivered to anonymous connections.
    MatchesList { matches: Vec<MatchSummary> },
}

// ---------------------------------------------------------------------------
// Error envelope
// ---------------------------------------------------------------------------

/// Sent in place of acceptance when a connection attempt is rejected
/// (nonexistent session, already-bound player).
///
/// Shape on the wire: `{"Error": "human-readable reason"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(rename = "Error")]
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The wire shapes are a contract with the client. These tests compare
    //! against literal JSON, not round-trips alone, so a serde-attribute
    //! regression shows up as a readable diff.

    use super::*;

    // =====================================================================
    // Identity types
    // =====================================================================

    #[test]
    fn test_match_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&MatchId(3)).unwrap();
        assert_eq!(json, "3");
    }

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_player_id_deserializes_from_plain_number() {
        let pid: PlayerId = serde_json::from_str("42").unwrap();
        assert_eq!(pid, PlayerId(42));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(MatchId(1).to_string(), "M-1");
        assert_eq!(PlayerId(7).to_string(), "P-7");
    }

    // =====================================================================
    // WinReason
    // =====================================================================

    #[test]
    fn test_win_reason_wire_values() {
        let json = serde_json::to_string(&WinReason::Forfeit).unwrap();
        assert_eq!(json, "\"FORFEIT\"");
        let json = serde_json::to_string(&WinReason::Normal).unwrap();
        assert_eq!(json, "\"NORMAL\"");
    }

    // =====================================================================
    // Notification — one shape test per variant
    // =====================================================================

    #[test]
    fn test_player_left_json_shape() {
        let msg = Notification::PlayerLeft { name: "alice".into() };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["key"], "PLAYER_LEFT");
        assert_eq!(json["payload"]["name"], "alice");
    }

    #[test]
    fn test_winner_json_shape_has_capitalized_reason() {
        let msg = Notification::Winner {
            player_id: PlayerId(7),
            reason: WinReason::Forfeit,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["key"], "WINNER");
        assert_eq!(json["payload"]["player_id"], 7);
        // Capital R — the client parses exactly this.
        assert_eq!(json["payload"]["Reason"], "FORFEIT");
        assert!(json["payload"]["reason"].is_null());
    }

    #[test]
    fn test_end_player_turn_json_shape() {
        let msg = Notification::EndPlayerTurn {
            current_player_name: "alice".into(),
            next_player_name: "bob".into(),
            next_player_turn: 2,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["key"], "END_PLAYER_TURN");
        assert_eq!(json["payload"]["current_player_name"], "alice");
        assert_eq!(json["payload"]["next_player_name"], "bob");
        assert_eq!(json["payload"]["next_player_turn"], 2);
    }

    #[test]
    fn test_matches_list_json_shape() {
        let msg = Notification::MatchesList {
            matches: vec![MatchSummary {
                id: MatchId(1),
                name: "friday night".into(),
                current_players: 2,
                max_players: 4,
                is_public: true,
            }],
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["key"], "MATCHES_LIST");
        assert_eq!(json["payload"]["matches"][0]["id"], 1);
        assert_eq!(json["payload"]["matches"][0]["name"], "friday night");
        assert_eq!(json["payload"]["matches"][0]["max_players"], 4);
    }

    #[test]
    fn test_matches_list_empty() {
        let msg = Notification::MatchesList { matches: vec![] };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"key":"MATCHES_LIST","payload":{"matches":[]}}"#);
    }

    #[test]
    fn test_notification_round_trip() {
        let msg = Notification::Winner {
            player_id: PlayerId(3),
            reason: WinReason::Forfeit,
        };
        let text = serde_json::to_string(&msg).unwrap();
        let decoded: Notification = serde_json::from_str(&text).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_decode_unknown_key_returns_error() {
        let unknown = r#"{"key": "TELEPORT", "payload": {}}"#;
        let result: Result<Notification, _> = serde_json::from_str(unknown);
        assert!(result.is_err());
    }

    // =====================================================================
    // ErrorEnvelope
    // =====================================================================

    #[test]
    fn test_error_envelope_json_shape() {
        let env = ErrorEnvelope::new("no session open for match M-1");
        let json = serde_json::to_string(&env).unwrap();
        assert_eq!(json, r#"{"Error":"no session open for match M-1"}"#);
    }

    #[test]
    fn test_error_envelope_round_trip() {
        let env = ErrorEnvelope::new("player P-1 already bound");
        let text = serde_json::to_string(&env).unwrap();
        let decoded: ErrorEnvelope = serde_json::from_str(&text).unwrap();
        assert_eq!(env, decoded);
    }
}
