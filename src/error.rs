//! Error types for the simulation and its storage boundary

use crate::sim::GamePhase;

/// Errors surfaced by simulation operations
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid factor range: min {min} > max {max}")]
    InvalidRange { min: u32, max: u32 },

    #[error("cannot {action} while {phase:?}")]
    InvalidState {
        action: &'static str,
        phase: GamePhase,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no active entity with id {0}")]
    UnknownEntity(u32),

    #[error("no active bullet with id {0}")]
    UnknownBullet(u32),
}

/// Errors from the persistence layer (never fatal to a session)
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed stored JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage unavailable")]
    Unavailable,
}
