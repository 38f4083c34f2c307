//! Mission error types

use crate::propagator::PropagationError;
use splice_assembler::AssemblerError;
use splice_runtime::RuntimeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MissionError {
    #[error("Invalid TLE: {0}")]
    InvalidTle(String),

    #[error("Propagation failed: {0}")]
    Propagation(#[from] PropagationError),

    #[error("Mission configuration has no scenario")]
    MissingScenario,

    #[error("Snapshot hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("Unknown mission action: {0}")]
    UnknownAction(String),

    #[error("Invalid mission configuration: {0}")]
    Config(String),

    #[error("Assembly failed: {0}")]
    Assembler(#[from] AssemblerError),

    #[error("VM error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MissionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use splice_spec::TaskId;

    #[test]
    fn test_hash_mismatch_display() {
        let err = MissionError::HashMismatch {
            expected: "ab".into(),
            actual: "cd".into(),
        };
        assert_eq!(err.to_string(), "Snapshot hash mismatch: expected ab, got cd");
    }

    #[test]
    fn test_runtime_error_wraps() {
        let err: MissionError = RuntimeError::not_loaded(TaskId::new(1, 2)).into();
        assert_eq!(err.to_string(), "VM error: Task not loaded: 1:2");
    }

    #[test]
    fn test_unknown_action_display() {
        let err = MissionError::UnknownAction("dance".into());
        assert_eq!(err.to_string(), "Unknown mission action: dance");
    }
}
