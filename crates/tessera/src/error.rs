use tessera_lifecycle::LifecycleError;
use tessera_protocol::ProtocolError;
use tessera_registry::RegistryError;
use tessera_transport::TransportError;
use tessera_turns::TurnError;

/// Unified error type rolling up every layer.
#[derive(Debug, thiserror::Error)]
pub enum TesseraError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}
