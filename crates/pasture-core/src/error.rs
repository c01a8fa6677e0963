//! Error types for the simulation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Rejected parameters, reported before the first tick.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Grid and scheduler disagree, or an agent is in a state it can never
    /// legally reach. Not recoverable; the run must stop.
    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
