//! Register definitions for the SPLICE VM
//!
//! Register ids 0x00-0x0F name the integer (ALU) registers, 0x10-0x1F the
//! floating-point (FPU) registers. Float ids index the 32-slot FPU file
//! directly, so FPU slots 0-15 are never addressed by bytecode.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of integer registers
pub const NUM_ALU_REGISTERS: usize = 16;

/// Number of floating-point register slots
pub const NUM_FPU_REGISTERS: usize = 32;

/// First floating-point register id
pub const FPU_BASE: u8 = 0x10;

/// One past the last addressable register id
pub const REGISTER_LIMIT: u8 = 0x20;

/// Letters used by the assembler register names (`AREG_A`, `FREG_P`, ...)
const REGISTER_LETTERS: [&str; 16] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P",
];

/// A decoded register operand
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Register {
    /// Integer register, id 0x00-0x0F
    Alu(u8),
    /// Floating-point register, id 0x10-0x1F
    Fpu(u8),
}

/// Register class, used when operands of one instruction must agree
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RegisterClass {
    Alu,
    Fpu,
}

impl Register {
    /// Decode a raw register id
    #[inline]
    pub fn from_id(id: u8) -> Option<Self> {
        if id < FPU_BASE {
            Some(Register::Alu(id))
        } else if id < REGISTER_LIMIT {
            Some(Register::Fpu(id))
        } else {
            None
        }
    }

    /// Raw register id as encoded in the instruction word
    #[inline]
    pub const fn id(self) -> u8 {
        match self {
            Register::Alu(id) | Register::Fpu(id) => id,
        }
    }

    /// Index into the backing register file of this register's class
    #[inline]
    pub const fn index(self) -> usize {
        self.id() as usize
    }

    #[inline]
    pub const fn class(self) -> RegisterClass {
        match self {
            Register::Alu(_) => RegisterClass::Alu,
            Register::Fpu(_) => RegisterClass::Fpu,
        }
    }

    #[inline]
    pub const fn is_alu(self) -> bool {
        matches!(self, Register::Alu(_))
    }

    #[inline]
    pub const fn is_fpu(self) -> bool {
        matches!(self, Register::Fpu(_))
    }

    /// Assembly name: `AREG_A`..`AREG_P`, `FREG_A`..`FREG_P`
    pub fn name(self) -> String {
        match self {
            Register::Alu(id) => format!("AREG_{}", REGISTER_LETTERS[id as usize]),
            Register::Fpu(id) => format!("FREG_{}", REGISTER_LETTERS[(id - FPU_BASE) as usize]),
        }
    }

    /// Parse an assembly register name
    pub fn from_name(name: &str) -> Option<Self> {
        let (base, letter) = if let Some(rest) = name.strip_prefix("AREG_") {
            (0u8, rest)
        } else if let Some(rest) = name.strip_prefix("FREG_") {
            (FPU_BASE, rest)
        } else {
            return None;
        };

        let offset = REGISTER_LETTERS.iter().position(|l| *l == letter)?;
        Register::from_id(base + offset as u8)
    }
}

/// Check that all registers share one class
pub fn same_class(registers: &[Register]) -> Option<RegisterClass> {
    let first = registers.first()?.class();
    registers
        .iter()
        .all(|r| r.class() == first)
        .then_some(first)
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id_classes() {
        assert_eq!(Register::from_id(0x00), Some(Register::Alu(0)));
        assert_eq!(Register::from_id(0x0F), Some(Register::Alu(0x0F)));
        assert_eq!(Register::from_id(0x10), Some(Register::Fpu(0x10)));
        assert_eq!(Register::from_id(0x1F), Some(Register::Fpu(0x1F)));
        assert_eq!(Register::from_id(0x20), None);
        assert_eq!(Register::from_id(0xFF), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(Register::Alu(0).name(), "AREG_A");
        assert_eq!(Register::Fpu(0x12).name(), "FREG_C");
        assert_eq!(Register::from_name("FREG_C"), Some(Register::Fpu(0x12)));
        assert_eq!(Register::from_name("AREG_P"), Some(Register::Alu(0x0F)));
        assert_eq!(Register::from_name("FREG_Q"), None);
        assert_eq!(Register::from_name("R1"), None);
    }

    #[test]
    fn test_same_class() {
        let alu = [Register::Alu(1), Register::Alu(2)];
        let mixed = [Register::Alu(1), Register::Fpu(0x11)];
        assert_eq!(same_class(&alu), Some(RegisterClass::Alu));
        assert_eq!(same_class(&mixed), None);
        assert_eq!(same_class(&[]), None);
    }

    #[test]
    fn test_fpu_index_is_raw_id() {
        assert_eq!(Register::Fpu(0x10).index(), 16);
        assert!((Register::Fpu(0x1F).index()) < NUM_FPU_REGISTERS);
        assert!((Register::Alu(0x0F).index()) < NUM_ALU_REGISTERS);
    }
}
