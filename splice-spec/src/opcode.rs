//! # SPLICE Opcode Definitions
//!
//! Opcodes occupy the first byte of an instruction word (0x00-0x0F).
//!
//! ## Operand Layout
//!
//! ```text
//! NOP  |      -     |    -     |    -     |
//! MOV  |   PREFIX   |  REG_A   |   DEST   |
//! LEA  |   REG_ID   | TASK_ID  | ADDRESS  |
//! CMP  |  OPERATOR  |  REG_A   |  REG_B   |  (or TASK_ID | REG_ID)
//! SET  |  INST_ID   |  PARAM   |  REG_ID  |
//! GET  |  INST_ID   |  PARAM   |  REG_ID  |
//! ACT  |  INST_ID   |  ACTION  |  REG_ID  |
//! HLT  |      -     |    -     |    -     |
//! STR  |   PREFIX   |  UNUSED  |  REG_ID  |
//! FMA  |   REG_A    |  REG_B   |  REG_C   |  REG_C = REG_C * REG_B + REG_A
//! FSD  |   REG_A    |  REG_B   |  REG_C   |  REG_C = REG_C / REG_B - REG_A
//! SIN  |   PREFIX   |  REG_A   |  REG_B   |
//! COS  |   PREFIX   |  REG_A   |  REG_B   |
//! TAN  |   PREFIX   |  REG_A   |  REG_B   |
//! POW  |   PREFIX   |  REG_A   |  REG_B   |
//! NOR  |   REG_A    |  REG_B   |  REG_C   |
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Instruction opcode (values 0x00-0x0F)
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// NOP: no action
    Nop = 0x00,
    /// MOV: register to register or register to task memory
    Mov = 0x01,
    /// LEA: load a word from task memory
    Lea = 0x02,
    /// CMP: compare registers or task status
    Cmp = 0x03,
    /// SET: write instrument or VM parameter
    Set = 0x04,
    /// GET: read instrument or VM parameter
    Get = 0x05,
    /// ACT: queue an instrument action
    Act = 0x06,
    /// HLT: stop, task completed
    Hlt = 0x07,
    /// STR: write register to the log output
    Str = 0x08,
    /// FMA: fused multiply-add
    Fma = 0x09,
    /// FSD: fused subtract-divide
    Fsd = 0x0A,
    /// SIN: sine / arcsine
    Sin = 0x0B,
    /// COS: cosine / arccosine
    Cos = 0x0C,
    /// TAN: tangent / arctangent
    Tan = 0x0D,
    /// POW: power / natural logarithm
    Pow = 0x0E,
    /// NOR: bitwise NOR
    Nor = 0x0F,
}

impl Opcode {
    /// All opcodes in encoding order
    pub const ALL: [Opcode; 16] = [
        Opcode::Nop,
        Opcode::Mov,
        Opcode::Lea,
        Opcode::Cmp,
        Opcode::Set,
        Opcode::Get,
        Opcode::Act,
        Opcode::Hlt,
        Opcode::Str,
        Opcode::Fma,
        Opcode::Fsd,
        Opcode::Sin,
        Opcode::Cos,
        Opcode::Tan,
        Opcode::Pow,
        Opcode::Nor,
    ];

    /// Try to convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Convert to u8
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Assembly mnemonic (`OP_MOV`, ...)
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Nop => "OP_NOP",
            Opcode::Mov => "OP_MOV",
            Opcode::Lea => "OP_LEA",
            Opcode::Cmp => "OP_CMP",
            Opcode::Set => "OP_SET",
            Opcode::Get => "OP_GET",
            Opcode::Act => "OP_ACT",
            Opcode::Hlt => "OP_HLT",
            Opcode::Str => "OP_STR",
            Opcode::Fma => "OP_FMA",
            Opcode::Fsd => "OP_FSD",
            Opcode::Sin => "OP_SIN",
            Opcode::Cos => "OP_COS",
            Opcode::Tan => "OP_TAN",
            Opcode::Pow => "OP_POW",
            Opcode::Nor => "OP_NOR",
        }
    }

    /// Look up an opcode by mnemonic
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.mnemonic() == name)
    }

    /// Number of operands the assembler expects for this opcode
    pub const fn operand_count(self) -> usize {
        match self {
            Opcode::Nop | Opcode::Hlt => 0,
            Opcode::Str => 2,
            _ => 3,
        }
    }

    /// Check if this opcode talks to an instrument
    #[inline]
    pub const fn is_instrument_access(self) -> bool {
        matches!(self, Opcode::Get | Opcode::Set | Opcode::Act)
    }

    /// Check if this opcode is a floating-point math function
    #[inline]
    pub const fn is_transcendental(self) -> bool {
        matches!(self, Opcode::Sin | Opcode::Cos | Opcode::Tan | Opcode::Pow)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u8_round_trip() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::from_u8(op.to_u8()), Some(op));
        }
        assert_eq!(Opcode::from_u8(0x10), None);
        assert_eq!(Opcode::from_u8(0xFF), None);
    }

    #[test]
    fn test_mnemonic_lookup() {
        assert_eq!(Opcode::from_mnemonic("OP_FMA"), Some(Opcode::Fma));
        assert_eq!(Opcode::from_mnemonic("OP_JMP"), None);
        assert_eq!(Opcode::Lea.to_string(), "OP_LEA");
    }

    #[test]
    fn test_operand_counts() {
        assert_eq!(Opcode::Hlt.operand_count(), 0);
        assert_eq!(Opcode::Str.operand_count(), 2);
        assert_eq!(Opcode::Mov.operand_count(), 3);
    }

    #[test]
    fn test_categories() {
        assert!(Opcode::Get.is_instrument_access());
        assert!(!Opcode::Mov.is_instrument_access());
        assert!(Opcode::Pow.is_transcendental());
        assert!(!Opcode::Fma.is_transcendental());
    }
}
