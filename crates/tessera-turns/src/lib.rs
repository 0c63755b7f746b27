//! Turn rotation and match lifecycle decisions for Tessera.
//!
//! Everything in this crate is pure: functions over match/player records
//! that return new state plus the notifications to deliver, never touching
//! storage or the network. All side effects happen in the lifecycle layer,
//! which invokes these functions under per-match exclusion.
//!
//! # Key pieces
//!
//! - [`MatchState`] — the WAITING → STARTED → FINISHED lifecycle
//! - [`MatchRecord`] / [`PlayerRecord`] — the business data the decisions
//!   read (loaded from storage by the caller)
//! - [`end_turn`] / [`leave`] — the decision functions
//! - [`Terminal`] — single-survivor and empty-match outcomes

mod error;
mod machine;
mod state;

pub use error::TurnError;
pub use machine::{end_turn, leave, LeaveOutcome, Terminal, TurnAdvance};
pub use state::{MatchRecord, MatchState, PlayerRecord};
