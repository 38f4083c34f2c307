//! Main assembler logic

use crate::encoder::{encode, resolve};
use crate::error::{AssemblerError, Result};
use crate::parser::{parse_header, parse_line, Line};
use crate::symbols::SymbolTable;
use splice_spec::{Opcode, Task};

/// Most operands any instruction line may carry
const MAX_OPERANDS: usize = 3;

/// Task assembler
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    symbols: SymbolTable,
}

impl Assembler {
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Assemble task lines, one word per line
    pub fn assemble<S: AsRef<str>>(&self, lines: &[S]) -> Result<Task> {
        let (header_line, body) = lines.split_first().ok_or(AssemblerError::EmptySource)?;
        let header = parse_header(header_line.as_ref())?;

        let mut words = Vec::with_capacity(lines.len());
        words.push(header.to_word());

        for (i, text) in body.iter().enumerate() {
            let line = i + 2;
            let word = match parse_line(text.as_ref(), line)? {
                Line::Literal(word) => word,
                Line::Instruction { mnemonic, operands } => {
                    let opcode = Opcode::from_mnemonic(&mnemonic);
                    let expected = opcode.map(Opcode::operand_count);
                    let valid = match expected {
                        Some(n) => operands.len() == n,
                        None => operands.len() <= MAX_OPERANDS,
                    };
                    if !valid {
                        return Err(AssemblerError::OperandCount {
                            line,
                            mnemonic,
                            expected: expected.unwrap_or(MAX_OPERANDS),
                            found: operands.len(),
                        });
                    }

                    let codes: Vec<i32> =
                        operands.iter().map(|op| resolve(op, &self.symbols)).collect();
                    encode(
                        self.symbols.opcode(&mnemonic),
                        &codes,
                        opcode == Some(Opcode::Str),
                    )
                }
            };
            words.push(word);
        }

        Ok(Task::from_words(words)?)
    }

    /// Assemble newline-separated source, skipping blank and `;` comment lines
    pub fn assemble_source(&self, source: &str) -> Result<Task> {
        let lines: Vec<&str> = source
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with(';'))
            .collect();
        self.assemble(&lines)
    }
}

/// Assemble task lines with the default symbol table
pub fn assemble<S: AsRef<str>>(lines: &[S]) -> Result<Task> {
    Assembler::new().assemble(lines)
}

/// Assemble newline-separated task source
pub fn assemble_source(source: &str) -> Result<Task> {
    Assembler::new().assemble_source(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use splice_spec::{pack_float, TaskId};

    #[test]
    fn test_assemble_simple() {
        let err = assemble(&["1,1,10,7", "OP_LEA, FREG_A, 1, 1", "OP_HLT"]).unwrap_err();
        // offset 7 points past the three-line task
        assert!(matches!(err, AssemblerError::InvalidTask(_)));

        let task = assemble(&["1,1,10,3", "OP_NOP", "OP_HLT", "2.0f"]).unwrap();
        assert_eq!(task.id(), TaskId::new(1, 1));
        assert_eq!(task.words, vec![0x0101_0A03, 0x0000_0000, 0x0700_0000, pack_float(2.0)]);
    }

    #[test]
    fn test_assemble_source_skips_comments() {
        let source = r#"
            ; log a constant
            2,1,127,3
            OP_GET, INST_FPU, P_FPU_PIE, FREG_A
            OP_STR, PRE_STR_FPU, FREG_A
        "#;
        let task = assemble_source(source).unwrap();
        assert_eq!(task.len(), 3);
        assert_eq!(task.words[1], 0x0504_0310);
        assert_eq!(task.words[2], 0x0802_0010);
    }

    #[test]
    fn test_unknown_symbols_do_not_abort() {
        let task = assemble(&["1,1,127,3", "OP_JMP, AREG_A", "OP_MOV, PRE_MOV_XXX, AREG_A, AREG_B"])
            .unwrap();
        assert_eq!(task.words[1], 0xFF00_0000);
        assert_eq!(task.words[2], 0x01FF_0001);
    }

    #[test]
    fn test_operand_count() {
        let err = assemble(&["1,1,127,2", "OP_HLT, AREG_A"]).unwrap_err();
        assert_eq!(
            err,
            AssemblerError::OperandCount {
                line: 2,
                mnemonic: "OP_HLT".to_string(),
                expected: 0,
                found: 1,
            }
        );

        let err = assemble(&["1,1,127,2", "OP_XYZ, 1, 2, 3, 4"]).unwrap_err();
        assert!(matches!(err, AssemblerError::OperandCount { expected: 3, found: 4, .. }));
    }

    #[test]
    fn test_empty_source() {
        let lines: [&str; 0] = [];
        assert_eq!(assemble(&lines), Err(AssemblerError::EmptySource));
    }
}
