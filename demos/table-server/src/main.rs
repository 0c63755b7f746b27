//! A minimal four-seat table server.
//!
//! Seeds one started match with four seated players, then hands each
//! incoming WebSocket the next free seat in arrival order. Connected
//! clients drive the table with plain text commands:
//!
//!   end    - finish your turn
//!   leave  - abandon the match
//!
//! Everyone at the table receives the resulting notifications as JSON
//! frames. Try it with e.g. `websocat ws://127.0.0.1:8080`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tessera::connect;
use tessera::lifecycle::{CardError, StoreError};
use tessera::prelude::*;

const TABLE: MatchId = MatchId(1);
const SEATS: u64 = 4;

// ---------------------------------------------------------------------------
// In-memory storage
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct MemoryStore {
    matches: Arc<Mutex<HashMap<MatchId, MatchRecord>>>,
    players: Arc<Mutex<HashMap<PlayerId, PlayerRecord>>>,
}

impl MemoryStore {
    fn seeded() -> Self {
        let store = Self::default();
        store.matches.lock().unwrap().insert(
            TABLE,
            MatchRecord {
                id: TABLE,
                name: "demo table".into(),
                state: MatchState::Started,
                current_players: SEATS as u8,
                max_players: SEATS as u8,
                current_turn: 1,
                is_public: true,
            },
        );
        for seat in 1..=SEATS {
            store.players.lock().unwrap().insert(
                PlayerId(seat),
                PlayerRecord {
                    id: PlayerId(seat),
                    name: format!("player-{seat}"),
                    match_id: Some(TABLE),
                    turn_order: seat as u8,
                    is_owner: seat == 1,
                },
            );
        }
        store
    }
}

impl MatchStore for MemoryStore {
    async fn find_match(&self, id: MatchId) -> Result<Option<MatchRecord>, StoreError> {
        Ok(self.matches.lock().unwrap().get(&id).cloned())
    }

    async fn find_player(&self, id: PlayerId) -> Result<Option<PlayerRecord>, StoreError> {
        Ok(self.players.lock().unwrap().get(&id).cloned())
    }

    async fn players_in_match(&self, id: MatchId) -> Result<Vec<PlayerRecord>, StoreError> {
        Ok(self
            .players
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.match_id == Some(id))
            .cloned()
            .collect())
    }

    async fn update_match(
        &self,
        id: MatchId,
        state: MatchState,
        current_players: u8,
    ) -> Result<(), StoreError> {
        let mut matches = self.matches.lock().unwrap();
        let m = matches
            .get_mut(&id)
            .ok_or_else(|| StoreError(format!("no match {id}")))?;
        m.state = state;
        m.current_players = current_players;
        Ok(())
    }

    async fn update_turn(&self, id: MatchId, turn: u8) -> Result<(), StoreError> {
        let mut matches = self.matches.lock().unwrap();
        let m = matches
            .get_mut(&id)
            .ok_or_else(|| StoreError(format!("no match {id}")))?;
        m.current_turn = turn;
        Ok(())
    }

    async fn set_turn_order(&self, player: PlayerId, order: u8) -> Result<(), StoreError> {
        let mut players = self.players.lock().unwrap();
        let p = players
            .get_mut(&player)
            .ok_or_else(|| StoreError(format!("no player {player}")))?;
        p.turn_order = order;
        Ok(())
    }

    async fn delete_player(&self, player: PlayerId) -> Result<(), StoreError> {
        self.players.lock().unwrap().remove(&player);
        Ok(())
    }
}

/// Logs deals instead of keeping a real deck.
struct LoggingDeck;

impl CardIssuer for LoggingDeck {
    async fn issue_movement_card(&self, player: PlayerId) -> Result<(), CardError> {
        tracing::info!(%player, "dealt a movement card");
        Ok(())
    }

    async fn issue_shape_card(&self, player: PlayerId, initial_deal: bool) -> Result<(), CardError> {
        tracing::info!(%player, initial_deal, "dealt a shape card");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Per-connection command loop
// ---------------------------------------------------------------------------

async fn drive_seat(
    handler: Arc<PlayerLifecycleHandler<MemoryStore, LoggingDeck, WsChannel>>,
    channel: WsChannel,
    player: PlayerId,
) {
    loop {
        let frame = match channel.connection().recv().await {
            Ok(Some(frame)) => frame,
            Ok(None) | Err(_) => {
                // Disconnect counts as leaving the table.
                if let Err(err) = handler.leave(TABLE, player).await {
                    tracing::debug!(%player, error = %err, "leave on disconnect failed");
                }
                return;
            }
        };

        let result = match frame.trim() {
            "end" => handler.end_turn(TABLE, player).await.map(|_| ()),
            "leave" => {
                let left = handler.leave(TABLE, player).await;
                if left.is_ok() {
                    return;
                }
                left.map(|_| ())
            }
            other => {
                tracing::debug!(%player, command = other, "unknown command");
                continue;
            }
        };

        if let Err(err) = result {
            if let Err(send_err) = channel.send_error(&err.to_string()).await {
                tracing::debug!(%player, error = %send_err, "error report failed");
                return;
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tessera::init_tracing();

    let coordinator = Arc::new(MatchSessionCoordinator::new());
    coordinator.open_session(TABLE).await?;
    let handler = Arc::new(PlayerLifecycleHandler::new(
        MemoryStore::seeded(),
        LoggingDeck,
        Arc::clone(&coordinator),
    ));

    let mut transport = WebSocketTransport::bind("127.0.0.1:8080").await?;
    tracing::info!(addr = %transport.local_addr()?, "table server listening");

    let next_seat = AtomicU64::new(1);
    loop {
        let conn = match transport.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                tracing::error!(error = %err, "accept failed");
                continue;
            }
        };

        let seat = next_seat.fetch_add(1, Ordering::SeqCst);
        if seat > SEATS {
            tracing::info!("table is full, refusing connection");
            let reject = WsChannel::new(conn);
            if let Err(err) = reject.send_error("table is full").await {
                tracing::debug!(error = %err, "rejection failed");
            }
            let _ = reject.close().await;
            next_seat.store(SEATS + 1, Ordering::SeqCst);
            continue;
        }

        let player = PlayerId(seat);
        match connect::accept_player(&coordinator, TABLE, player, conn).await {
            Ok(channel) => {
                tracing::info!(%player, "seated");
                tokio::spawn(drive_seat(Arc::clone(&handler), channel, player));
            }
            Err(err) => {
                tracing::info!(%player, error = %err, "seating failed");
            }
        }
    }
}
