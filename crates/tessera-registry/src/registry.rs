//! The connection registry: (match, player) → live channel, plus the
//! anonymous set.
//!
//! # Concurrency note
//!
//! `ConnectionRegistry` is NOT thread-safe by itself — plain `HashMap`s,
//! no interior locking. This is intentional: one
//! [`MatchSessionCoordinator`](crate::MatchSessionCoordinator) owns the
//! registry behind a mutex and keeps that lock off the delivery path.
//! Keeping the maps plain here makes every operation obviously O(1) and
//! trivially testable.

use std::collections::HashMap;

use futures_util::future::join_all;
use tessera_protocol::{MatchId, Notification, PlayerId};
use tessera_transport::ConnectionId;

use crate::{ChannelClosed, GameChannel, RegistryError};

/// The aggregated result of a broadcast.
///
/// A broadcast always attempts every bound channel; per-channel failures
/// are collected here instead of aborting the rest of the fan-out.
#[derive(Debug, Default)]
pub struct BroadcastReport {
    /// Number of channels the message reached.
    pub delivered: usize,
    /// Players whose delivery failed, with the failure.
    pub failures: Vec<(PlayerId, ChannelClosed)>,
}

impl BroadcastReport {
    /// Returns `true` if every bound channel received the message.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// In-memory table of live channels.
///
/// One entry per open session (match), each mapping player ids to their
/// channel handle, plus a set of anonymous channels (connected, not yet
/// bound to any match — lobby viewers). A session exists independently of
/// the persisted match record and may legitimately hold no players.
pub struct ConnectionRegistry<C> {
    /// Open sessions, keyed by match id.
    sessions: HashMap<MatchId, HashMap<PlayerId, C>>,

    /// Reverse index: which session each bound player is in.
    /// Enforces the "one match-slot per player" invariant.
    bound_players: HashMap<PlayerId, MatchId>,

    /// Channels not yet bound to any (match, player) pair.
    anonymous: HashMap<ConnectionId, C>,
}

impl<C: GameChannel> ConnectionRegistry<C> {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            bound_players: HashMap::new(),
            anonymous: HashMap::new(),
        }
    }

    // -- Session lifecycle ------------------------------------------------

    /// Opens an empty session for `match_id`.
    ///
    /// # Errors
    /// [`RegistryError::SessionAlreadyOpen`] if one exists.
    pub fn open_session(&mut self, match_id: MatchId) -> Result<(), RegistryError> {
        if self.sessions.contains_key(&match_id) {
            return Err(RegistryError::SessionAlreadyOpen(match_id));
        }
        self.sessions.insert(match_id, HashMap::new());
        tracing::info!(%match_id, "session opened");
        Ok(())
    }

    /// Closes the session, dropping every binding in it.
    ///
    /// Returns the bindings that were dropped so the caller can close the
    /// underlying connections if it wants to.
    pub fn close_session(
        &mut self,
        match_id: MatchId,
    ) -> Result<Vec<(PlayerId, C)>, RegistryError> {
        let table = self
            .sessions
            .remove(&match_id)
            .ok_or(RegistryError::SessionNotFound(match_id))?;

        for player in table.keys() {
            self.bound_players.remove(player);
        }
        tracing::info!(%match_id, players = table.len(), "session closed");
        Ok(table.into_iter().collect())
    }

    /// Returns `true` if a session is open for `match_id`.
    pub fn has_session(&self, match_id: MatchId) -> bool {
        self.sessions.contains_key(&match_id)
    }

    /// Number of open sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    // -- Bindings ---------------------------------------------------------

    /// Registers `channel` under `(match_id, player)`.
    ///
    /// The binding is visible to `send_to`/`broadcast` immediately.
    ///
    /// # Errors
    /// - [`RegistryError::SessionNotFound`] if no session is open
    /// - [`RegistryError::PlayerAlreadyBound`] if the player already has a
    ///   channel anywhere in the registry
    pub fn bind(
        &mut self,
        match_id: MatchId,
        player: PlayerId,
        channel: C,
    ) -> Result<(), RegistryError> {
        if let Some(existing) = self.bound_players.get(&player) {
            return Err(RegistryError::PlayerAlreadyBound {
                player,
                existing: *existing,
            });
        }
        let table = self
            .sessions
            .get_mut(&match_id)
            .ok_or(RegistryError::SessionNotFound(match_id))?;

        let conn = channel.id();
        table.insert(player, channel);
        self.bound_players.insert(player, match_id);

        tracing::info!(%match_id, %player, %conn, "player bound");
        Ok(())
    }

    /// Removes the binding and returns the channel handle.
    ///
    /// Never closes the session, even if it becomes empty — session
    /// lifetime belongs to the coordinator, not to membership count.
    ///
    /// # Errors
    /// [`RegistryError::SessionNotFound`] / [`RegistryError::PlayerNotBound`].
    pub fn unbind(
        &mut self,
        match_id: MatchId,
        player: PlayerId,
    ) -> Result<C, RegistryError> {
        let table = self
            .sessions
            .get_mut(&match_id)
            .ok_or(RegistryError::SessionNotFound(match_id))?;

        let channel = table
            .remove(&player)
            .ok_or(RegistryError::PlayerNotBound { player, match_id })?;
        self.bound_players.remove(&player);

        tracing::info!(%match_id, %player, "player unbound");
        Ok(channel)
    }

    /// Returns `true` if the player has a channel in this session.
    pub fn is_bound(&self, match_id: MatchId, player: PlayerId) -> bool {
        self.sessions
            .get(&match_id)
            .is_some_and(|table| table.contains_key(&player))
    }

    /// The player ids currently bound in this session.
    pub fn bound_in(
        &self,
        match_id: MatchId,
    ) -> Result<Vec<PlayerId>, RegistryError> {
        let table = self
            .sessions
            .get(&match_id)
            .ok_or(RegistryError::SessionNotFound(match_id))?;
        Ok(table.keys().copied().collect())
    }

    // -- Channel snapshots ------------------------------------------------

    /// Clones out one player's channel handle.
    ///
    /// Snapshot-then-deliver: callers take the clone, release whatever
    /// lock guards this registry, and only then await the transport write.
    pub fn channel(
        &self,
        match_id: MatchId,
        player: PlayerId,
    ) -> Result<C, RegistryError> {
        let table = self
            .sessions
            .get(&match_id)
            .ok_or(RegistryError::SessionNotFound(match_id))?;
        table
            .get(&player)
            .cloned()
            .ok_or(RegistryError::PlayerNotBound { player, match_id })
    }

    /// Clones out every channel handle in the session, unspecified order.
    pub fn session_channels(
        &self,
        match_id: MatchId,
    ) -> Result<Vec<(PlayerId, C)>, RegistryError> {
        let table = self
            .sessions
            .get(&match_id)
            .ok_or(RegistryError::SessionNotFound(match_id))?;
        Ok(table.iter().map(|(p, c)| (*p, c.clone())).collect())
    }

    // -- Delivery ---------------------------------------------------------

    /// Delivers `msg` to exactly one bound channel.
    ///
    /// Transport failure comes back as [`RegistryError::Delivery`] — the
    /// caller decides whether to also unbind the stale entry.
    pub async fn send_to(
        &self,
        match_id: MatchId,
        player: PlayerId,
        msg: &Notification,
    ) -> Result<(), RegistryError> {
        let channel = self.channel(match_id, player)?;
        channel.deliver(msg).await?;
        Ok(())
    }

    /// Delivers `msg` to every bound channel in the session.
    ///
    /// One closed channel never stops the rest: every delivery is
    /// attempted and failures are aggregated into the report.
    pub async fn broadcast(
        &self,
        match_id: MatchId,
        msg: &Notification,
    ) -> Result<BroadcastReport, RegistryError> {
        let targets = self.session_channels(match_id)?;
        Ok(deliver_all(targets, msg).await)
    }

    // -- Anonymous channels -----------------------------------------------

    /// Tracks a channel that is not yet bound to any match.
    pub fn add_anonymous(&mut self, channel: C) {
        let conn = channel.id();
        self.anonymous.insert(conn, channel);
        tracing::debug!(%conn, "anonymous connection added");
    }

    /// Stops tracking an anonymous channel.
    ///
    /// Idempotent by design: a disconnect may race an explicit removal, so
    /// this returns whether anything changed instead of erroring.
    pub fn remove_anonymous(&mut self, conn: ConnectionId) -> bool {
        let removed = self.anonymous.remove(&conn).is_some();
        if removed {
            tracing::debug!(%conn, "anonymous connection removed");
        }
        removed
    }

    /// Number of anonymous channels currently tracked.
    pub fn anonymous_count(&self) -> usize {
        self.anonymous.len()
    }
}

impl<C: GameChannel> Default for ConnectionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Attempts every delivery independently and aggregates the failures.
///
/// The attempts run concurrently: one slow or stuck peer delays only its
/// own delivery, never the others.
pub(crate) async fn deliver_all<C: GameChannel>(
    targets: Vec<(PlayerId, C)>,
    msg: &Notification,
) -> BroadcastReport {
    let attempts = targets.into_iter().map(|(player, channel)| async move {
        (player, channel.deliver(msg).await)
    });

    let mut report = BroadcastReport::default();
    for (player, result) in join_all(attempts).await {
        match result {
            Ok(()) => report.delivered += 1,
            Err(closed) => {
                tracing::warn!(%player, error = %closed, "broadcast delivery failed");
                report.failures.push((player, closed));
            }
        }
    }
    report
}

// =========================================================================
// Tests
// =========================================================================
