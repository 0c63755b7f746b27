//! Player lifecycle workflows for Tessera.
//!
//! This crate glues the pure turn machine to the outside world: it loads
//! records through a [`MatchStore`], runs the decision functions from
//! `tessera-turns`, persists the results, and pushes the resulting
//! notifications through the session coordinator. Card issuance hooks in
//! through [`CardIssuer`] so the deck engine stays a separate concern.
//!
//! Every workflow runs under the per-match guard from
//! [`MatchSessionCoordinator`](tessera_registry::MatchSessionCoordinator),
//! so two requests for the same match never interleave.

#![allow(async_fn_in_trait)]

mod cards;
mod error;
mod handler;
mod store;

pub use cards::{CardError, CardIssuer};
pub use error::LifecycleError;
pub use handler::PlayerLifecycleHandler;
pub use store::{MatchStore, StoreError};
