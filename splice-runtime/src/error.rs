//! Runtime error types for the SPLICE VM
//!
//! Only faults that break the caller's contract are errors. Faults inside a
//! task (bad operands, unknown opcodes, failed checks) end that task's run
//! and are reported through its status.

use splice_spec::{ConfigError, SpliceError, TaskId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RuntimeError {
    #[error("Task not loaded: {group}:{task}")]
    TaskNotLoaded { group: u8, task: u8 },

    #[error("Invalid task: {0}")]
    InvalidTask(#[from] SpliceError),

    #[error("Invalid VM configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl RuntimeError {
    pub fn not_loaded(id: TaskId) -> Self {
        RuntimeError::TaskNotLoaded {
            group: id.group,
            task: id.task,
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
