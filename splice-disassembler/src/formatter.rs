//! Instruction formatting to assembler-compatible text

use splice_spec::operand::MovMode;
use splice_spec::{CmpOperand, Instruction, Opcode, Register};

/// Format instruction as assembly text
pub fn format(instr: &Instruction) -> String {
    let op = instr.opcode().mnemonic();
    match *instr {
        Instruction::Nop | Instruction::Hlt => op.to_string(),

        // ========== Memory ==========
        Instruction::Mov { mode, src, dest } => {
            let dest = match mode {
                MovMode::Ram => dest.to_string(),
                MovMode::Reg | MovMode::Ind => format_reg_or_raw(dest),
            };
            format!("{}, {}, {}, {}", op, mode.mnemonic(), src, dest)
        }
        Instruction::Lea { dest, task, address } => {
            format!("{}, {}, {}, {}", op, dest, task, address)
        }

        // ========== Control ==========
        Instruction::Cmp { op: cmp, lhs, rhs } => {
            let lhs = match lhs {
                CmpOperand::Reg(r) => r.name(),
                CmpOperand::Task(id) => id.to_string(),
            };
            format!("{}, {}, {}, {}", op, cmp.mnemonic(), lhs, rhs)
        }

        // ========== Instruments ==========
        Instruction::Set { param, src } => {
            format!("{}, {}, {}, {}", op, param.instrument(), param.mnemonic(), src)
        }
        Instruction::Get { param, dest } => {
            format!("{}, {}, {}, {}", op, param.instrument(), param.mnemonic(), dest)
        }
        Instruction::Act { action, src } => {
            format!("{}, {}, {}, {}", op, action.instrument(), action.mnemonic(), src)
        }

        // ========== Output ==========
        Instruction::Str { format, src } => format!("{}, {}, {}", op, format, src),

        // ========== Arithmetic ==========
        Instruction::Fma { a, b, c } | Instruction::Fsd { a, b, c } | Instruction::Nor { a, b, c } => {
            format!("{}, {}, {}, {}", op, a, b, c)
        }
        Instruction::Trig { mode, src, dest, .. } | Instruction::Pow { mode, src, dest } => {
            format!("{}, {}, {}, {}", op, mode, src, dest)
        }
    }
}

/// Format a data word as an integer literal
pub fn format_data(word: u32) -> String {
    format!("{}i", word as i32)
}

/// Mnemonic for an opcode byte, if it names one
pub fn opcode_name(byte: u8) -> Option<&'static str> {
    Opcode::from_u8(byte).map(Opcode::mnemonic)
}

fn format_reg_or_raw(id: u8) -> String {
    Register::from_id(id).map_or_else(|| id.to_string(), Register::name)
}
