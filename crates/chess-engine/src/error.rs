//! Error types for the engine crate.

use thiserror::Error;

/// Errors that can occur when handing positions or moves to the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The FEN string could not be parsed or describes an impossible position.
    #[error("Invalid position '{fen}': {reason}")]
    InvalidPosition {
        /// The rejected FEN string.
        fen: String,
        /// Why the rules engine rejected it.
        reason: String,
    },
    /// The move text is not valid UCI notation.
    #[error("Invalid move notation: {0}")]
    InvalidMove(String),
    /// The move is well-formed but not legal in the given position.
    #[error("Illegal move {uci} in position {fen}")]
    IllegalMove {
        /// The move in UCI notation.
        uci: String,
        /// The position the move was tried in.
        fen: String,
    },
    /// A difficulty profile has out-of-range settings.
    #[error("Invalid difficulty profile: {0}")]
    InvalidProfile(String),
    /// A background search task panicked or was cancelled.
    #[error("Search task failed: {0}")]
    TaskFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_display() {
        let invalid = EngineError::InvalidPosition {
            fen: "not a fen".to_string(),
            reason: "invalid board part".to_string(),
        };
        let display = invalid.to_string();
        assert!(display.contains("Invalid position"));
        assert!(display.contains("not a fen"));

        let illegal = EngineError::IllegalMove {
            uci: "e2e5".to_string(),
            fen: "startpos".to_string(),
        };
        assert_eq!(illegal.to_string(), "Illegal move e2e5 in position startpos");

        let profile = EngineError::InvalidProfile("depth must be at least 1".to_string());
        assert!(profile.to_string().contains("depth must be at least 1"));
    }
}
