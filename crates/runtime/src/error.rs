//! Unified error type surfaced by the runtime API.
//!
//! Wraps the per-operation errors of the core so callers driving a whole
//! session can bubble them up with consistent context.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Create(#[from] inventory_core::CreateError),

    #[error(transparent)]
    Spawn(#[from] inventory_core::SpawnError),

    #[error(transparent)]
    Despawn(#[from] inventory_core::DespawnError),

    #[error(transparent)]
    Remove(#[from] inventory_core::RemoveError),

    #[error(transparent)]
    Mirror(#[from] inventory_core::MirrorError),
}
