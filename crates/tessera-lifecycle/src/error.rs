use tessera_protocol::{MatchId, PlayerId};
use tessera_registry::RegistryError;
use tessera_turns::TurnError;

use crate::StoreError;

/// Everything a lifecycle workflow can fail with.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("match {0} not found")]
    MatchNotFound(MatchId),

    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("player {player} is not in match {match_id}")]
    PlayerNotInMatch { player: PlayerId, match_id: MatchId },

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
