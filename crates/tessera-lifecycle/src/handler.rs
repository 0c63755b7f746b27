//! The lifecycle workflows themselves.
//!
//! Each workflow follows the same shape: take the per-match guard, load
//! the records, run the pure decision function, persist its result, and
//! only then notify the session. Notifications always go out before any
//! follow-on card issuance, and a channel that fails to receive one is
//! logged rather than failing the workflow, because the authoritative
//! state has already been persisted by that point.

use std::sync::Arc;

use tessera_protocol::{MatchId, Notification, PlayerId};
use tessera_registry::{GameChannel, MatchSessionCoordinator, RegistryError};
use tessera_turns::{self as turns, LeaveOutcome, MatchRecord, MatchState, PlayerRecord, Terminal, TurnAdvance};

use crate::{CardIssuer, LifecycleError, MatchStore};

/// Orchestrates end-turn and leave requests for one process.
pub struct PlayerLifecycleHandler<S, D, C> {
    store: S,
    cards: D,
    coordinator: Arc<MatchSessionCoordinator<C>>,
}

impl<S, D, C> PlayerLifecycleHandler<S, D, C>
where
    S: MatchStore,
    D: CardIssuer,
    C: GameChannel,
{
    pub fn new(store: S, cards: D, coordinator: Arc<MatchSessionCoordinator<C>>) -> Self {
        Self {
            store,
            cards,
            coordinator,
        }
    }

    /// The coordinator this handler notifies through.
    pub fn coordinator(&self) -> &Arc<MatchSessionCoordinator<C>> {
        &self.coordinator
    }

    /// Ends `player`'s turn in `match_id`.
    ///
    /// On success the turn pointer has been persisted, the session has
    /// been told via `END_PLAYER_TURN`, the finishing player has drawn a
    /// movement card and the incoming player a shape card. Card deals are
    /// fire-and-forget; a deck failure never fails the turn. Validation
    /// failures leave both the store and the session untouched.
    pub async fn end_turn(
        &self,
        match_id: MatchId,
        player: PlayerId,
    ) -> Result<TurnAdvance, LifecycleError> {
        let _guard = self.coordinator.lock_match(match_id).await;

        let (m, acting, seats) = self.load(match_id, player).await?;
        let advance = turns::end_turn(&m, &acting, &seats)?;

        self.store.update_turn(match_id, advance.next_turn).await?;
        tracing::info!(
            %match_id, %player, next_turn = advance.next_turn,
            "turn advanced"
        );

        self.notify(match_id, &advance.notification).await?;

        // Cards go out only after the turn announcement. The turn is
        // already persisted and announced at this point, so a deck
        // failure is logged, not surfaced as a failed turn.
        if let Err(err) = self.cards.issue_movement_card(player).await {
            tracing::warn!(%match_id, %player, error = %err, "movement card issuance failed");
        }
        if let Err(err) = self.cards.issue_shape_card(advance.next_player, false).await {
            tracing::warn!(
                %match_id, player = %advance.next_player, error = %err,
                "shape card issuance failed"
            );
        }

        Ok(advance)
    }

    /// Removes `player` from `match_id`, voluntarily or by disconnect.
    ///
    /// Persists the removal and any seat renumbering, unbinds the
    /// leaver's channel, announces `PLAYER_LEFT`, and when the leave
    /// decides the match (forfeit win or emptied out) finishes the match
    /// record and tears the session down after the final notification.
    pub async fn leave(
        &self,
        match_id: MatchId,
        player: PlayerId,
    ) -> Result<LeaveOutcome, LifecycleError> {
        let _guard = self.coordinator.lock_match(match_id).await;

        let (m, leaving, seats) = self.load(match_id, player).await?;
        let outcome = turns::leave(&m, &leaving, &seats)?;

        // Persist before anyone hears about it.
        self.store.delete_player(player).await?;
        for (survivor, order) in &outcome.renumbering {
            self.store.set_turn_order(*survivor, *order).await?;
        }
        self.store
            .update_match(match_id, outcome.state, outcome.current_players)
            .await?;
        if outcome.state == MatchState::Started {
            self.store.update_turn(match_id, outcome.current_turn).await?;
        }
        tracing::info!(
            %match_id, %player, state = %outcome.state,
            remaining = outcome.current_players,
            "player left"
        );

        // The leaver stops receiving before the announcement goes out. A
        // player who disconnected uncleanly may already be unbound, which
        // is not a failure of the workflow.
        match self.coordinator.unbind(match_id, player).await {
            Ok(_) | Err(RegistryError::PlayerNotBound { .. }) => {}
            Err(err) => return Err(err.into()),
        }

        for notification in &outcome.notifications {
            self.notify(match_id, notification).await?;
        }

        match outcome.terminal {
            Some(Terminal::Win { winner, .. }) => {
                // The match is over; the winner's record goes too, and
                // the session closes once the result has been heard.
                self.store.delete_player(winner).await?;
                self.coordinator.close_session(match_id).await?;
                tracing::info!(%match_id, %winner, "match decided by forfeit");
            }
            Some(Terminal::Empty) => {
                self.coordinator.close_session(match_id).await?;
                tracing::info!(%match_id, "match emptied out");
            }
            None => {}
        }

        Ok(outcome)
    }

    /// Loads the match, the acting player, and the roster, verifying the
    /// player is actually seated in this match.
    async fn load(
        &self,
        match_id: MatchId,
        player: PlayerId,
    ) -> Result<(MatchRecord, PlayerRecord, Vec<PlayerRecord>), LifecycleError> {
        let m = self
            .store
            .find_match(match_id)
            .await?
            .ok_or(LifecycleError::MatchNotFound(match_id))?;
        let p = self
            .store
            .find_player(player)
            .await?
            .ok_or(LifecycleError::PlayerNotFound(player))?;
        if p.match_id != Some(match_id) {
            return Err(LifecycleError::PlayerNotInMatch { player, match_id });
        }
        let seats = self.store.players_in_match(match_id).await?;
        Ok((m, p, seats))
    }

    /// Broadcasts one notification, logging per-channel failures.
    ///
    /// A missing session is a real inconsistency and propagates; a closed
    /// channel inside an open session is the receiver's problem.
    async fn notify(
        &self,
        match_id: MatchId,
        notification: &Notification,
    ) -> Result<(), LifecycleError> {
        let report = self.coordinator.broadcast(match_id, notification).await?;
        if !report.is_complete() {
            tracing::warn!(
                %match_id,
                delivered = report.delivered,
                failed = report.failures.len(),
                "notification missed some channels"
            );
        }
        Ok(())
    }
}
