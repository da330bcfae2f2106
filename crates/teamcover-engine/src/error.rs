//! Error types for engine operations

use thiserror::Error;

/// Errors that can occur while deriving, reducing or searching
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A pool item's key has no profile
    #[error("Missing profile for key {0}")]
    MissingProfile(String),

    /// Not enough items to fill the team
    #[error("Infeasible search: team of {requested} requested but only {available} items available")]
    Infeasible {
        /// Target team size
        requested: usize,
        /// Pool plus forced members
        available: usize,
    },

    /// Forced members exceed the team size
    #[error("Too many forced members: {forced} forced for a team of {team_size}")]
    TooManyForced {
        /// Number of forced members
        forced: usize,
        /// Target team size
        team_size: usize,
    },

    /// Invalid search or reduction option
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
