//! Instruction decoder

use crate::error::{DisassemblerError, Result};
use splice_spec::encoding::unpack32to4x8;
use splice_spec::operand::{Action, Comparison, FnMode, Instrument, MovMode, Param, StrFormat};
use splice_spec::{CmpOperand, Instruction, Opcode, Register, TrigFn};

/// Decode 32-bit instruction word
///
/// Only the shape of the word is checked here: every operand must name a
/// known code and every register id must be below 0x20. Register class
/// agreement is left to the executor.
pub fn decode(word: u32) -> Result<Instruction> {
    let [op, a, b, c] = unpack32to4x8(word);
    let opcode = Opcode::from_u8(op).ok_or(DisassemblerError::UnknownOpcode(op))?;

    let bad = |reason: &'static str| DisassemblerError::BadOperand { word, reason };
    let reg = |id: u8| Register::from_id(id).ok_or(bad("register id out of range"));

    let instr = match opcode {
        Opcode::Nop => Instruction::Nop,
        Opcode::Hlt => Instruction::Hlt,

        Opcode::Mov => Instruction::Mov {
            mode: MovMode::from_u8(a).ok_or(bad("unknown MOV prefix"))?,
            src: reg(b)?,
            dest: c,
        },

        Opcode::Lea => Instruction::Lea {
            dest: reg(a)?,
            task: b,
            address: c,
        },

        Opcode::Cmp => {
            let cmp = Comparison::from_u8(a).ok_or(bad("unknown comparison operator"))?;
            let lhs = if cmp.is_task_status() {
                CmpOperand::Task(b)
            } else {
                CmpOperand::Reg(reg(b)?)
            };
            Instruction::Cmp {
                op: cmp,
                lhs,
                rhs: reg(c)?,
            }
        }

        Opcode::Set | Opcode::Get => {
            let instrument = Instrument::from_u8(a).ok_or(bad("unknown instrument"))?;
            let param = Param::decode(instrument, b).ok_or(bad("unknown parameter"))?;
            let r = reg(c)?;
            if opcode == Opcode::Set {
                Instruction::Set { param, src: r }
            } else {
                Instruction::Get { param, dest: r }
            }
        }

        Opcode::Act => {
            let instrument = Instrument::from_u8(a).ok_or(bad("unknown instrument"))?;
            Instruction::Act {
                action: Action::decode(instrument, b).ok_or(bad("unknown action"))?,
                src: reg(c)?,
            }
        }

        Opcode::Str => Instruction::Str {
            format: StrFormat::from_u8(a).ok_or(bad("unknown STR prefix"))?,
            src: reg(c)?,
        },

        Opcode::Fma => Instruction::Fma {
            a: reg(a)?,
            b: reg(b)?,
            c: reg(c)?,
        },
        Opcode::Fsd => Instruction::Fsd {
            a: reg(a)?,
            b: reg(b)?,
            c: reg(c)?,
        },
        Opcode::Nor => Instruction::Nor {
            a: reg(a)?,
            b: reg(b)?,
            c: reg(c)?,
        },

        Opcode::Sin | Opcode::Cos | Opcode::Tan => {
            let func = match opcode {
                Opcode::Sin => TrigFn::Sin,
                Opcode::Cos => TrigFn::Cos,
                _ => TrigFn::Tan,
            };
            Instruction::Trig {
                func,
                mode: FnMode::from_u8(a).ok_or(bad("unknown function prefix"))?,
                src: reg(b)?,
                dest: reg(c)?,
            }
        }
        Opcode::Pow => Instruction::Pow {
            mode: FnMode::from_u8(a).ok_or(bad("unknown function prefix"))?,
            src: reg(b)?,
            dest: reg(c)?,
        },
    };

    Ok(instr)
}
