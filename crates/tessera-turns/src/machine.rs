//! The decision functions: end-turn rotation and leave/forfeit handling.
//!
//! Both functions take the match and player records as loaded from storage
//! and return the new state plus the notifications to broadcast. They
//! assume the caller holds the per-match guard; nothing here suspends or
//! mutates shared state, so concurrency is the caller's concern and these
//! stay trivially testable.

use tessera_protocol::{Notification, PlayerId, WinReason};

use crate::{MatchRecord, MatchState, PlayerRecord, TurnError};

/// The result of a valid end-turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnAdvance {
    /// The seat now holding the turn.
    pub next_turn: u8,
    /// The player seated there.
    pub next_player: PlayerId,
    /// `END_PLAYER_TURN`, to broadcast to the whole session.
    pub notification: Notification,
}

/// A terminal condition produced by a leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// Exactly one player survived an active match: they win by forfeit.
    Win { winner: PlayerId, reason: WinReason },
    /// Nobody is left in the match.
    Empty,
}

/// The result of a valid leave.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveOutcome {
    /// The match state after the removal.
    pub state: MatchState,
    /// Player count after the removal (0 on a terminal outcome).
    pub current_players: u8,
    /// Turn pointer after the removal, repointed at the same holder under
    /// the new seat numbering. Meaningful only while `state` is STARTED.
    pub current_turn: u8,
    /// Seat reassignments that keep numbering densely packed: one
    /// `(player, new_order)` entry per survivor whose seat changed.
    pub renumbering: Vec<(PlayerId, u8)>,
    /// Single-survivor or empty-match decision, if the leave was terminal.
    pub terminal: Option<Terminal>,
    /// `PLAYER_LEFT`, plus `WINNER` exactly when the forfeit condition
    /// holds, in that order.
    pub notifications: Vec<Notification>,
}

/// The seat after `current`, wrapping to 1 past the last occupied seat.
fn next_seat(current: u8, occupied: u8) -> u8 {
    if current >= occupied {
        1
    } else {
        current + 1
    }
}

/// Validates and computes an end-turn by `acting`.
///
/// `seats` is the current roster of the match (any order). The next holder
/// is the seat after the acting player's, wrapping after the last occupied
/// seat, not after `max_players`.
///
/// # Errors
/// - [`TurnError::MatchNotActive`] unless the match is STARTED
/// - [`TurnError::NotPlayersTurn`] unless `acting` holds the turn
/// - [`TurnError::SeatVacant`] if the roster is not densely seated
pub fn end_turn(
    m: &MatchRecord,
    acting: &PlayerRecord,
    seats: &[PlayerRecord],
) -> Result<TurnAdvance, TurnError> {
    if !m.state.is_active() {
        return Err(TurnError::MatchNotActive { state: m.state });
    }
    if acting.turn_order != m.current_turn {
        return Err(TurnError::NotPlayersTurn(acting.id));
    }

    let next_turn = next_seat(m.current_turn, m.current_players);
    let next_player = seats
        .iter()
        .find(|p| p.turn_order == next_turn)
        .ok_or(TurnError::SeatVacant(next_turn))?;

    Ok(TurnAdvance {
        next_turn,
        next_player: next_player.id,
        notification: Notification::EndPlayerTurn {
            current_player_name: acting.name.clone(),
            next_player_name: next_player.name.clone(),
            next_player_turn: next_turn,
        },
    })
}

/// Validates and computes a leave (voluntary or forced) by `leaving`.
///
/// `seats` is the roster including the leaving player. If the leaver held
/// the turn, the turn advances by the end-turn rule before the removal, so
/// play never points at an absent seat. Survivor seats are renumbered to
/// stay densely packed and the turn pointer follows its holder into the
/// new numbering.
///
/// # Errors
/// - [`TurnError::OwnerCannotLeave`] if the owner leaves while WAITING
/// - [`TurnError::MatchNotActive`] if the match already FINISHED
pub fn leave(
    m: &MatchRecord,
    leaving: &PlayerRecord,
    seats: &[PlayerRecord],
) -> Result<LeaveOutcome, TurnError> {
    if m.state == MatchState::Finished {
        return Err(TurnError::MatchNotActive { state: m.state });
    }
    if m.state == MatchState::Waiting && leaving.is_owner {
        return Err(TurnError::OwnerCannotLeave(leaving.id));
    }

    let mut remaining: Vec<&PlayerRecord> =
        seats.iter().filter(|p| p.id != leaving.id).collect();
    remaining.sort_by_key(|p| p.turn_order);

    let mut notifications = vec![Notification::PlayerLeft {
        name: leaving.name.clone(),
    }];

    // If the leaver held the turn, hand it to the next seat first (old
    // numbering). With dense seats this always lands on a survivor.
    let holder_seat = if m.state.is_active() && leaving.turn_order == m.current_turn
    {
        next_seat(m.current_turn, m.current_players)
    } else {
        m.current_turn
    };

    // Renumber survivors densely, preserving relative order, and repoint
    // the turn at its holder. Seats are only dealt once a match starts, so
    // a WAITING roster keeps its (undealt) orders.
    let mut renumbering = Vec::new();
    let mut current_turn = holder_seat;
    if m.state.is_active() {
        for (idx, p) in remaining.iter().enumerate() {
            let order = idx as u8 + 1;
            if p.turn_order == holder_seat {
                current_turn = order;
            }
            if p.turn_order != order {
                renumbering.push((p.id, order));
            }
        }
    }

    let survivors = remaining.len() as u8;

    let (state, current_players, terminal) = if survivors == 0 {
        (MatchState::Finished, 0, Some(Terminal::Empty))
    } else if survivors == 1 && m.state.is_active() {
        let winner = remaining[0].id;
        notifications.push(Notification::Winner {
            player_id: winner,
            reason: WinReason::Forfeit,
        });
        (
            MatchState::Finished,
            0,
            Some(Terminal::Win {
                winner,
                reason: WinReason::Forfeit,
            }),
        )
    } else {
        (m.state, survivors, None)
    };

    Ok(LeaveOutcome {
        state,
        current_players,
        current_turn,
        renumbering,
        terminal,
        notifications,
    })
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_protocol::MatchId;

    // -- Helpers ----------------------------------------------------------

    fn started_match(current_players: u8, current_turn: u8) -> MatchRecord {
        MatchRecord {
            id: MatchId(1),
            name: "test".into(),
            state: MatchState::Started,
            current_players,
            max_players: 4,
            current_turn,
            is_public: true,
        }
    }

    fn waiting_match(current_players: u8) -> MatchRecord {
        MatchRecord {
            state: MatchState::Waiting,
            current_turn: 0,
            ..started_match(current_players, 0)
        }
    }

    fn seat(id: u64, name: &str, order: u8) -> PlayerRecord {
        PlayerRecord {
            id: PlayerId(id),
            name: name.into(),
            match_id: Some(MatchId(1)),
            turn_order: order,
            is_owner: id == 1,
        }
    }

    fn roster(n: u64) -> Vec<PlayerRecord> {
        (1..=n)
            .map(|i| seat(i, &format!("player{i}"), i as u8))
            .collect()
    }

    // =====================================================================
    // end_turn
    // =====================================================================

    #[test]
    fn test_end_turn_last_seat_wraps_to_one() {
        let m = started_match(4, 4);
        let seats = roster(4);

        let adv = end_turn(&m, &seats[3], &seats).unwrap();

        assert_eq!(adv.next_turn, 1);
        assert_eq!(adv.next_player, PlayerId(1));
    }

    #[test]
    fn test_end_turn_middle_seat_advances_by_one() {
        let m = started_match(4, 2);
        let seats = roster(4);

        let adv = end_turn(&m, &seats[1], &seats).unwrap();

        assert_eq!(adv.next_turn, 3);
        assert_eq!(adv.next_player, PlayerId(3));
    }

    #[test]
    fn test_end_turn_wraps_at_occupied_seats_not_max() {
        // 3 seated players in a 4-seat match: seat 3 wraps to 1.
        let m = started_match(3, 3);
        let seats = roster(3);

        let adv = end_turn(&m, &seats[2], &seats).unwrap();

        assert_eq!(adv.next_turn, 1);
    }

    #[test]
    fn test_end_turn_emits_notification_with_names() {
        let m = started_match(2, 1);
        let seats = roster(2);

        let adv = end_turn(&m, &seats[0], &seats).unwrap();

        assert_eq!(
            adv.notification,
            Notification::EndPlayerTurn {
                current_player_name: "player1".into(),
                next_player_name: "player2".into(),
                next_player_turn: 2,
            }
        );
    }

    #[test]
    fn test_end_turn_out_of_turn_rejected() {
        let m = started_match(4, 2);
        let seats = roster(4);

        let result = end_turn(&m, &seats[0], &seats);

        assert!(
            matches!(result, Err(TurnError::NotPlayersTurn(p)) if p == PlayerId(1))
        );
    }

    #[test]
    fn test_end_turn_on_waiting_match_rejected() {
        let m = waiting_match(4);
        let seats = roster(4);

        let result = end_turn(&m, &seats[0], &seats);

        assert!(matches!(result, Err(TurnError::MatchNotActive { .. })));
    }

    #[test]
    fn test_end_turn_vacant_next_seat_is_inconsistency() {
        let m = started_match(3, 3);
        // Seat 1 missing — storage handed us a non-dense roster.
        let seats = vec![seat(2, "b", 2), seat(3, "c", 3)];

        let result = end_turn(&m, &seats[1], &seats);

        assert!(matches!(result, Err(TurnError::SeatVacant(1))));
    }

    // =====================================================================
    // leave — rule violations
    // =====================================================================

    #[test]
    fn test_leave_owner_while_waiting_rejected() {
        let m = waiting_match(3);
        let seats = roster(3);

        let result = leave(&m, &seats[0], &seats);

        assert!(
            matches!(result, Err(TurnError::OwnerCannotLeave(p)) if p == PlayerId(1))
        );
    }

    #[test]
    fn test_leave_finished_match_rejected() {
        let mut m = started_match(2, 1);
        m.state = MatchState::Finished;
        let seats = roster(2);

        let result = leave(&m, &seats[1], &seats);

        assert!(matches!(result, Err(TurnError::MatchNotActive { .. })));
    }

    // =====================================================================
    // leave — lobby phase
    // =====================================================================

    #[test]
    fn test_leave_non_owner_while_waiting() {
        let m = waiting_match(3);
        let seats = roster(3);

        let out = leave(&m, &seats[2], &seats).unwrap();

        assert_eq!(out.state, MatchState::Waiting);
        assert_eq!(out.current_players, 2);
        assert!(out.terminal.is_none());
        assert!(out.renumbering.is_empty(), "no seats dealt yet");
        assert_eq!(
            out.notifications,
            vec![Notification::PlayerLeft { name: "player3".into() }]
        );
    }

    // =====================================================================
    // leave — active match
    // =====================================================================

    #[test]
    fn test_leave_non_holder_keeps_holder_under_new_numbering() {
        // Holder is seat 3; seat 1 leaves. Survivors renumber 2→1, 3→2
        // and the turn pointer follows the holder to seat 2.
        let m = started_match(3, 3);
        let seats = roster(3);

        let out = leave(&m, &seats[0], &seats).unwrap();

        assert_eq!(out.state, MatchState::Started);
        assert_eq!(out.current_players, 2);
        assert_eq!(out.current_turn, 2);
        assert_eq!(
            out.renumbering,
            vec![(PlayerId(2), 1), (PlayerId(3), 2)]
        );
        assert!(out.terminal.is_none());
    }

    #[test]
    fn test_leave_holder_passes_turn_before_removal() {
        // Holder seat 2 leaves: turn advances to old seat 3, which
        // renumbers to seat 2.
        let m = started_match(3, 2);
        let seats = roster(3);

        let out = leave(&m, &seats[1], &seats).unwrap();

        assert_eq!(out.current_players, 2);
        assert_eq!(out.current_turn, 2);
        assert_eq!(out.renumbering, vec![(PlayerId(3), 2)]);
    }

    #[test]
    fn test_leave_holder_at_last_seat_wraps_turn_to_one() {
        let m = started_match(3, 3);
        let seats = roster(3);

        let out = leave(&m, &seats[2], &seats).unwrap();

        assert_eq!(out.current_turn, 1);
        assert!(out.renumbering.is_empty(), "seats 1 and 2 keep their order");
    }

    #[test]
    fn test_leave_second_to_last_triggers_forfeit_win() {
        let m = started_match(2, 1);
        let seats = roster(2);

        // Player 2 (not the owner) leaves an active 2-player match.
        let out = leave(&m, &seats[1], &seats).unwrap();

        assert_eq!(out.state, MatchState::Finished);
        assert_eq!(out.current_players, 0);
        assert_eq!(
            out.terminal,
            Some(Terminal::Win {
                winner: PlayerId(1),
                reason: WinReason::Forfeit,
            })
        );
        assert_eq!(
            out.notifications,
            vec![
                Notification::PlayerLeft { name: "player2".into() },
                Notification::Winner {
                    player_id: PlayerId(1),
                    reason: WinReason::Forfeit,
                },
            ],
            "PLAYER_LEFT precedes WINNER"
        );
    }

    #[test]
    fn test_leave_three_players_no_forfeit_yet() {
        let m = started_match(3, 1);
        let seats = roster(3);

        let out = leave(&m, &seats[2], &seats).unwrap();

        assert_eq!(out.state, MatchState::Started);
        assert!(out.terminal.is_none());
        assert_eq!(out.notifications.len(), 1, "PLAYER_LEFT only");
    }

    #[test]
    fn test_leave_last_player_empties_match() {
        let m = started_match(1, 1);
        let seats = vec![seat(2, "straggler", 1)];

        let out = leave(&m, &seats[0], &seats).unwrap();

        assert_eq!(out.state, MatchState::Finished);
        assert_eq!(out.current_players, 0);
        assert_eq!(out.terminal, Some(Terminal::Empty));
        assert_eq!(out.notifications.len(), 1, "nobody left to win");
    }
}
