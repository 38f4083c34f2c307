//! Disassembler errors

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DisassemblerError {
    #[error("Unknown opcode: 0x{0:02X}")]
    UnknownOpcode(u8),

    #[error("Bad operand in 0x{word:08X}: {reason}")]
    BadOperand { word: u32, reason: &'static str },
}

impl DisassemblerError {
    /// Short description used in VM error log lines
    pub const fn kind(&self) -> &'static str {
        match self {
            DisassemblerError::UnknownOpcode(_) => "unknown opcode",
            DisassemblerError::BadOperand { .. } => "bad operand",
        }
    }
}

pub type Result<T> = std::result::Result<T, DisassemblerError>;
