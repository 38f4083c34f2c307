//! Assembler errors

use splice_spec::SpliceError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AssemblerError {
    #[error("Syntax error at line {line}: {message}")]
    SyntaxError { line: usize, message: String },

    #[error("Invalid header at line 1: {0}")]
    InvalidHeader(String),

    #[error("Line {line}: {mnemonic} takes {expected} operand(s), found {found}")]
    OperandCount {
        line: usize,
        mnemonic: String,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: immediate {value} does not fit in a byte")]
    InvalidImmediate { line: usize, value: i64 },

    #[error("Line {line}: invalid data literal '{text}'")]
    InvalidLiteral { line: usize, text: String },

    #[error("Empty source: a task needs at least a header line")]
    EmptySource,

    #[error("Invalid task: {0}")]
    InvalidTask(#[from] SpliceError),
}

pub type Result<T> = std::result::Result<T, AssemblerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AssemblerError::OperandCount {
            line: 3,
            mnemonic: "OP_STR".to_string(),
            expected: 2,
            found: 3,
        };
        assert_eq!(err.to_string(), "Line 3: OP_STR takes 2 operand(s), found 3");

        let err = AssemblerError::from(SpliceError::InvalidFrequency(0x80));
        assert!(err.to_string().starts_with("Invalid task"));
    }
}
