//! # Error Types for the SPLICE ISA

use crate::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SpliceError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    // Task format errors
    #[error("Empty task: a task needs at least a header word")]
    EmptyTask,

    #[error("Invalid data offset: {offset} exceeds task length {len}")]
    InvalidDataOffset { offset: u8, len: usize },

    #[error("Invalid frequency code: {0:#04x} (valid range: 0x00-0x7F)")]
    InvalidFrequency(u8),

    #[error("Task too long: {len} words (maximum {max})")]
    TaskTooLong { len: usize, max: usize },

    // Instruction errors
    #[error("Invalid opcode: {0:#04x}")]
    InvalidOpcode(u8),

    #[error("Invalid register id: {0:#04x} (valid range: 0x00-0x1F)")]
    InvalidRegister(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SpliceError::InvalidRegister(0x20);
        assert_eq!(
            err.to_string(),
            "Invalid register id: 0x20 (valid range: 0x00-0x1F)"
        );

        let err = SpliceError::InvalidDataOffset { offset: 9, len: 4 };
        assert_eq!(err.to_string(), "Invalid data offset: 9 exceeds task length 4");
    }
}
