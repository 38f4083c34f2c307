//! Decoded SPLICE instructions

use crate::encoding::pack4x8to32;
use crate::opcode::Opcode;
use crate::operand::{Action, Comparison, FnMode, MovMode, Param, StrFormat};
use crate::register::Register;
use serde::{Deserialize, Serialize};

/// Trigonometric function selector for the SIN/COS/TAN opcodes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrigFn {
    Sin,
    Cos,
    Tan,
}

/// Left-hand side of a comparison
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CmpOperand {
    Reg(Register),
    /// Task id within the executing task's group
    Task(u8),
}

impl CmpOperand {
    pub const fn to_u8(self) -> u8 {
        match self {
            CmpOperand::Reg(r) => r.id(),
            CmpOperand::Task(id) => id,
        }
    }
}

/// A fully decoded instruction
///
/// Register operands are already tagged with their class. Class agreement
/// between operands is checked at execution time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    Nop,
    Hlt,

    /// Copy a register to a register (`dest` is a register id) or to task
    /// memory (`dest` is an address, or for `Ind` an integer register id)
    Mov { mode: MovMode, src: Register, dest: u8 },

    /// Load the word at `address` of task `task` (same group) into `dest`
    Lea { dest: Register, task: u8, address: u8 },

    /// Compare two registers, or a task status with an integer register
    Cmp { op: Comparison, lhs: CmpOperand, rhs: Register },

    Set { param: Param, src: Register },
    Get { param: Param, dest: Register },
    Act { action: Action, src: Register },

    Str { format: StrFormat, src: Register },

    /// `c = c * b + a`
    Fma { a: Register, b: Register, c: Register },
    /// `c = c / b - a`
    Fsd { a: Register, b: Register, c: Register },

    Trig { func: TrigFn, mode: FnMode, src: Register, dest: Register },
    Pow { mode: FnMode, src: Register, dest: Register },

    /// `c = !(a | b)`
    Nor { a: Register, b: Register, c: Register },
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Nop => Opcode::Nop,
            Instruction::Hlt => Opcode::Hlt,
            Instruction::Mov { .. } => Opcode::Mov,
            Instruction::Lea { .. } => Opcode::Lea,
            Instruction::Cmp { .. } => Opcode::Cmp,
            Instruction::Set { .. } => Opcode::Set,
            Instruction::Get { .. } => Opcode::Get,
            Instruction::Act { .. } => Opcode::Act,
            Instruction::Str { .. } => Opcode::Str,
            Instruction::Fma { .. } => Opcode::Fma,
            Instruction::Fsd { .. } => Opcode::Fsd,
            Instruction::Trig { func: TrigFn::Sin, .. } => Opcode::Sin,
            Instruction::Trig { func: TrigFn::Cos, .. } => Opcode::Cos,
            Instruction::Trig { func: TrigFn::Tan, .. } => Opcode::Tan,
            Instruction::Pow { .. } => Opcode::Pow,
            Instruction::Nor { .. } => Opcode::Nor,
        }
    }

    /// Pack back into an instruction word
    pub fn encode(&self) -> u32 {
        let op = self.opcode().to_u8();
        match *self {
            Instruction::Nop | Instruction::Hlt => pack4x8to32(op, 0, 0, 0),
            Instruction::Mov { mode, src, dest } => pack4x8to32(op, mode.to_u8(), src.id(), dest),
            Instruction::Lea { dest, task, address } => pack4x8to32(op, dest.id(), task, address),
            Instruction::Cmp { op: cmp, lhs, rhs } => {
                pack4x8to32(op, cmp.to_u8(), lhs.to_u8(), rhs.id())
            }
            Instruction::Set { param, src } => {
                pack4x8to32(op, param.instrument().to_u8(), param.to_u8(), src.id())
            }
            Instruction::Get { param, dest } => {
                pack4x8to32(op, param.instrument().to_u8(), param.to_u8(), dest.id())
            }
            Instruction::Act { action, src } => {
                pack4x8to32(op, action.instrument().to_u8(), action.to_u8(), src.id())
            }
            Instruction::Str { format, src } => pack4x8to32(op, format.to_u8(), 0, src.id()),
            Instruction::Fma { a, b, c }
            | Instruction::Fsd { a, b, c }
            | Instruction::Nor { a, b, c } => pack4x8to32(op, a.id(), b.id(), c.id()),
            Instruction::Trig { mode, src, dest, .. } | Instruction::Pow { mode, src, dest } => {
                pack4x8to32(op, mode.to_u8(), src.id(), dest.id())
            }
        }
    }
}
