//! Instruction encoding to packed 32-bit words

use crate::parser::Operand;
use crate::symbols::{SymbolTable, UNRESOLVED};
use splice_spec::pack4x8to32;

/// Narrow a resolved code to its byte field; the sentinel packs as 0xFF
#[inline]
pub fn field(code: i32) -> u8 {
    if code == UNRESOLVED {
        0xFF
    } else {
        (code & 0xFF) as u8
    }
}

/// Resolve an operand to its code
pub fn resolve(operand: &Operand, symbols: &SymbolTable) -> i32 {
    match operand {
        Operand::Symbol(name) => symbols.operand(name),
        Operand::Immediate(v) => *v as i32,
    }
}

/// Encode an instruction from its opcode code and operand codes
///
/// STR takes two operands that land in the first and last operand fields;
/// every other opcode fills the fields left to right.
pub fn encode(opcode: i32, operands: &[i32], two_operand_form: bool) -> u32 {
    let mut fields = [0u8; 3];
    if two_operand_form {
        if let Some(prefix) = operands.first() {
            fields[0] = field(*prefix);
        }
        if let Some(reg) = operands.get(1) {
            fields[2] = field(*reg);
        }
    } else {
        for (slot, code) in fields.iter_mut().zip(operands) {
            *slot = field(*code);
        }
    }
    pack4x8to32(field(opcode), fields[0], fields[1], fields[2])
}
