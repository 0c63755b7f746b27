//! The shared, task-safe front door to the registry.
//!
//! `MatchSessionCoordinator` wraps a [`ConnectionRegistry`] in a mutex and
//! adds a per-match guard table so callers can linearize multi-step
//! workflows (load, validate, persist, notify) for one match without
//! blocking unrelated matches.
//!
//! Delivery never happens while the registry lock is held: send and
//! broadcast clone the channel handles out under the lock, release it,
//! then await the transport writes.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use tessera_protocol::{MatchId, Notification, PlayerId};
use tessera_transport::ConnectionId;

use crate::registry::deliver_all;
use crate::{BroadcastReport, ConnectionRegistry, GameChannel, RegistryError};

/// Shared coordinator owning the registry and the per-match guards.
///
/// Cheap to share: wrap it in an `Arc` and clone the handle per task.
pub struct MatchSessionCoordinator<C> {
    registry: Mutex<ConnectionRegistry<C>>,

    /// One guard per open session. Holding a match's guard serializes
    /// whole workflows against each other; registry-level operations
    /// stay independently usable without it.
    guards: Mutex<HashMap<MatchId, Arc<Mutex<()>>>>,

    /// Single guard shared by every match id with no open session. Keeps
    /// the guard table bounded by the number of open sessions: a stream
    /// of requests naming bogus match ids must not grow any map.
    fallback_guard: Arc<Mutex<()>>,
}

impl<C: GameChannel> MatchSessionCoordinator<C> {
    /// Creates a coordinator with an empty registry.
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(ConnectionRegistry::new()),
            guards: Mutex::new(HashMap::new()),
            fallback_guard: Arc::new(Mutex::new(())),
        }
    }

    // -- Linearization ----------------------------------------------------

    /// Acquires the workflow guard for one match.
    ///
    /// Hold the returned guard for the duration of a multi-step workflow
    /// (turn ending, player leaving) to serialize it against concurrent
    /// workflows on the same match. A match without an open session gets
    /// the shared fallback guard: such workflows fail validation before
    /// mutating anything, so serializing them against each other costs
    /// nothing and never allocates per unknown id.
    pub async fn lock_match(&self, match_id: MatchId) -> OwnedMutexGuard<()> {
        let guard = {
            let guards = self.guards.lock().await;
            match guards.get(&match_id) {
                Some(guard) => Arc::clone(guard),
                None => Arc::clone(&self.fallback_guard),
            }
        };
        guard.lock_owned().await
    }

    // -- Session lifecycle ------------------------------------------------

    /// Opens an empty session and installs its workflow guard.
    pub async fn open_session(&self, match_id: MatchId) -> Result<(), RegistryError> {
        self.registry.lock().await.open_session(match_id)?;
        self.guards
            .lock()
            .await
            .entry(match_id)
            .or_default();
        Ok(())
    }

    /// Closes the session and retires its workflow guard.
    ///
    /// Returns the bindings that were dropped.
    pub async fn close_session(
        &self,
        match_id: MatchId,
    ) -> Result<Vec<(PlayerId, C)>, RegistryError> {
        let dropped = self.registry.lock().await.close_session(match_id)?;
        self.guards.lock().await.remove(&match_id);
        Ok(dropped)
    }

    /// Returns `true` if a session is open for `match_id`.
    pub async fn has_session(&self, match_id: MatchId) -> bool {
        self.registry.lock().await.has_session(match_id)
    }

    // -- Bindings ---------------------------------------------------------

    /// Registers `channel` under `(match_id, player)`.
    pub async fn bind(
        &self,
        match_id: MatchId,
        player: PlayerId,
        channel: C,
    ) -> Result<(), RegistryError> {
        self.registry.lock().await.bind(match_id, player, channel)
    }

    /// Removes the binding and returns the channel handle.
    pub async fn unbind(
        &self,
        match_id: MatchId,
        player: PlayerId,
    ) -> Result<C, RegistryError> {
        self.registry.lock().await.unbind(match_id, player)
    }

    /// Returns `true` if the player has a channel in this session.
    pub async fn is_bound(&self, match_id: MatchId, player: PlayerId) -> bool {
        self.registry.lock().await.is_bound(match_id, player)
    }

    /// Clones out one player's channel handle.
    pub async fn channel(
        &self,
        match_id: MatchId,
        player: PlayerId,
    ) -> Result<C, RegistryError> {
        self.registry.lock().await.channel(match_id, player)
    }

    // -- Delivery ---------------------------------------------------------

    /// Delivers `msg` to exactly one bound channel.
    pub async fn send_to(
        &self,
        match_id: MatchId,
        player: PlayerId,
        msg: &Notification,
    ) -> Result<(), RegistryError> {
        // Snapshot under the lock, deliver after releasing it.
        let channel = self.registry.lock().await.channel(match_id, player)?;
        channel.deliver(msg).await?;
        Ok(())
    }

    /// Delivers `msg` to every channel bound in the session.
    pub async fn broadcast(
        &self,
        match_id: MatchId,
        msg: &Notification,
    ) -> Result<BroadcastReport, RegistryError> {
        let targets = self.registry.lock().await.session_channels(match_id)?;
        Ok(deliver_all(targets, msg).await)
    }

    // -- Anonymous channels -----------------------------------------------

    /// Tracks a channel that is not yet bound to any match.
    pub async fn add_anonymous(&self, channel: C) {
        self.registry.lock().await.add_anonymous(channel);
    }

    /// Stops tracking an anonymous channel. Idempotent.
    pub async fn remove_anonymous(&self, conn: ConnectionId) -> bool {
        self.registry.lock().await.remove_anonymous(conn)
    }
}

impl<C: GameChannel> Default for MatchSessionCoordinator<C> {
    fn default() -> Self {
        Self::new()
    }
}
