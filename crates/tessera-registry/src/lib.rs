//! Live-connection tracking for Tessera.
//!
//! This crate knows which player, in which match, owns which live channel,
//! and nothing else — no game rules, no persistence. It has two layers:
//!
//! - [`ConnectionRegistry`] — the plain in-memory table: per-match channel
//!   maps plus the anonymous (not-yet-joined) set. Single-owner; callers
//!   provide the locking.
//! - [`MatchSessionCoordinator`] — the process-wide service that owns one
//!   registry behind a mutex, snapshots channel handles before any
//!   delivery so no lock is held across a transport write, and hands out
//!   the per-match guards that linearize lifecycle workflows.
//!
//! Channels are anything implementing [`GameChannel`]: a cloneable handle
//! whose delivery can fail recoverably ([`ChannelClosed`]) but never
//! panics.

#![allow(async_fn_in_trait)]

mod channel;
mod coordinator;
mod error;
mod registry;

pub use channel::{ChannelClosed, GameChannel};
pub use coordinator::MatchSessionCoordinator;
pub use error::RegistryError;
pub use registry::{BroadcastReport, ConnectionRegistry};
