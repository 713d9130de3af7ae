//! Error types for session construction and character sources.

use crate::types::GameMode;

/// Rejected session or source configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("character pool is empty")]
    EmptyPool,

    #[error("no passage has any typeable text")]
    EmptyPassages,

    #[error("start level must be at least 1, got {0}")]
    InvalidStartLevel(u32),

    #[error("{source_kind} source cannot drive {} mode", .mode.as_str())]
    SourceMismatch {
        mode: GameMode,
        source_kind: &'static str,
    },
}

/// A character source could not produce a character.
///
/// The queue logs these and leaves the slot unfilled; the next refill retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("source has no characters left to read")]
    Exhausted,

    #[error("source has no active characters")]
    EmptyPool,
}
