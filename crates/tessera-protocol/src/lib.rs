//! Wire protocol for Tessera.
//!
//! This crate defines what travels over a live game connection:
//!
//! - **Types** ([`Notification`], [`ErrorEnvelope`], [`MatchSummary`],
//!   the id newtypes) — the message structures clients see.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from text.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding or
//!   decoding.
//!
//! The protocol layer sits between transport (raw frames) and the session
//! registry (who is bound where). It knows nothing about turn order or
//! match lifecycle; it only knows message shapes.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ErrorEnvelope, MatchId, MatchSummary, Notification, PlayerId, WinReason,
};
