//! # Tessera
//!
//! Real-time session layer for turn-based board game matches.
//!
//! Tessera keeps every connected player of a match reachable over one
//! WebSocket channel, runs the turn rotation and leave/forfeit rules, and
//! pushes the resulting notifications to the whole table the moment the
//! outcome is persisted.
//!
//! The layers, bottom up:
//!
//! - [`transport`] — WebSocket accept loop and text-frame connections
//! - [`protocol`] — wire types, the notification envelope, the JSON codec
//! - [`registry`] — who is connected where, and per-match workflow guards
//! - [`turns`] — the pure rotation and leave/forfeit decision functions
//! - [`lifecycle`] — the orchestrated workflows: load, decide, persist,
//!   notify, deal
//!
//! This crate adds the glue: [`WsChannel`] makes a live WebSocket usable
//! as a registry channel, and [`connect`] holds the acceptance flows that
//! either admit a connection into a session or reject it with an error
//! envelope on the wire.

pub use tessera_lifecycle as lifecycle;
pub use tessera_protocol as protocol;
pub use tessera_registry as registry;
pub use tessera_transport as transport;
pub use tessera_turns as turns;

mod channel;
pub mod connect;
mod error;

pub use channel::WsChannel;
pub use error::TesseraError;

/// Installs the process-wide tracing subscriber, filtered by `RUST_LOG`
/// with an `info` default. Safe to call more than once; only the first
/// call takes effect.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// The commonly needed surface in one import.
pub mod prelude {
    pub use crate::channel::WsChannel;
    pub use crate::connect;
    pub use crate::error::TesseraError;
    pub use tessera_lifecycle::{CardIssuer, MatchStore, PlayerLifecycleHandler};
    pub use tessera_protocol::{
        Codec, ErrorEnvelope, JsonCodec, MatchId, MatchSummary, Notification, PlayerId, WinReason,
    };
    pub use tessera_registry::{GameChannel, MatchSessionCoordinator};
    pub use tessera_transport::{Connection, Transport, WebSocketTransport};
    pub use tessera_turns::{MatchRecord, MatchState, PlayerRecord};
}
