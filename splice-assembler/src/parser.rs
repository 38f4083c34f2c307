//! Line parser
//!
//! Each source line is one of:
//! - the header (`group,task,frequency,offset`, line 1 only)
//! - an instruction (`OP_XXX, operand, operand, operand`)
//! - a data literal (`1.5f`, `-3i`)

use crate::error::{AssemblerError, Result};
use crate::lexer::Token;
use logos::Logos;
use splice_spec::{pack_float, pack_int, TaskHeader};

/// An instruction operand before symbol resolution
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Symbol(String),
    Immediate(u8),
}

/// A parsed source line
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Instruction { mnemonic: String, operands: Vec<Operand> },
    /// Data word, already packed
    Literal(u32),
}

/// Tokenize one line; `line` is 1-based and only used for error reports
pub fn tokenize(text: &str, line: usize) -> Result<Vec<Token>> {
    let mut lex = Token::lexer(text);
    let mut tokens = Vec::new();
    while let Some(token) = lex.next() {
        match token {
            Ok(token) => tokens.push(token),
            Err(()) => {
                return Err(AssemblerError::SyntaxError {
                    line,
                    message: format!("unexpected input '{}'", lex.slice()),
                })
            }
        }
    }
    Ok(tokens)
}

/// Parse the header line
pub fn parse_header(text: &str) -> Result<TaskHeader> {
    let tokens = tokenize(text, 1).map_err(|e| AssemblerError::InvalidHeader(e.to_string()))?;

    let mut fields = Vec::with_capacity(4);
    for (i, token) in tokens.iter().enumerate() {
        let expect_comma = i % 2 == 1;
        match (expect_comma, token) {
            (true, Token::Comma) => {}
            (false, Token::Number(v)) | (false, Token::Hex(v)) => {
                let byte = u8::try_from(*v).map_err(|_| {
                    AssemblerError::InvalidHeader(format!("field {} out of range: {}", fields.len() + 1, v))
                })?;
                fields.push(byte);
            }
            _ => {
                return Err(AssemblerError::InvalidHeader(format!(
                    "expected 'group,task,frequency,offset', got '{}'",
                    text.trim()
                )))
            }
        }
    }

    match fields.as_slice() {
        [group, task, freq, offset] if tokens.len() == 7 => {
            Ok(TaskHeader::new(*group, *task, *freq, *offset))
        }
        _ => Err(AssemblerError::InvalidHeader(format!(
            "expected four comma-separated fields, got '{}'",
            text.trim()
        ))),
    }
}

/// Parse a body line (anything after the header)
pub fn parse_line(text: &str, line: usize) -> Result<Line> {
    let tokens = tokenize(text, line)?;

    match tokens.as_slice() {
        [] => Err(AssemblerError::SyntaxError {
            line,
            message: "empty line".to_string(),
        }),
        [Token::FloatLiteral(v)] => Ok(Line::Literal(pack_float(*v))),
        [Token::IntLiteral(v)] => {
            let value = i32::try_from(*v).map_err(|_| AssemblerError::InvalidLiteral {
                line,
                text: text.trim().to_string(),
            })?;
            Ok(Line::Literal(pack_int(value)))
        }
        [Token::FloatLiteral(_), ..] | [Token::IntLiteral(_), ..] => {
            Err(AssemblerError::InvalidLiteral {
                line,
                text: text.trim().to_string(),
            })
        }
        [Token::Identifier(mnemonic), rest @ ..] => {
            let operands = parse_operands(rest, line)?;
            Ok(Line::Instruction {
                mnemonic: mnemonic.clone(),
                operands,
            })
        }
        _ => Err(AssemblerError::SyntaxError {
            line,
            message: format!("expected a mnemonic or a literal, got '{}'", text.trim()),
        }),
    }
}

/// Comma-separated operand list; a comma right after the mnemonic is optional
fn parse_operands(tokens: &[Token], line: usize) -> Result<Vec<Operand>> {
    let tokens = match tokens.first() {
        Some(Token::Comma) => &tokens[1..],
        _ => tokens,
    };

    let mut operands = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        if i % 2 == 1 {
            if *token != Token::Comma {
                return Err(AssemblerError::SyntaxError {
                    line,
                    message: "operands must be separated by commas".to_string(),
                });
            }
            continue;
        }
        let operand = match token {
            Token::Identifier(name) => Operand::Symbol(name.clone()),
            Token::Number(v) | Token::Hex(v) => Operand::Immediate(
                u8::try_from(*v)
                    .map_err(|_| AssemblerError::InvalidImmediate { line, value: *v })?,
            ),
            other => {
                return Err(AssemblerError::SyntaxError {
                    line,
                    message: format!("unexpected operand {:?}", other),
                })
            }
        };
        operands.push(operand);
    }

    if tokens.len() % 2 == 0 && !tokens.is_empty() {
        return Err(AssemblerError::SyntaxError {
            line,
            message: "trailing comma".to_string(),
        });
    }

    Ok(operands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        assert_eq!(parse_header("1,1,10,7").unwrap(), TaskHeader::new(1, 1, 10, 7));
        assert_eq!(parse_header(" 2, 3, 0x7F, 4 ").unwrap(), TaskHeader::new(2, 3, 0x7F, 4));
    }

    #[test]
    fn test_parse_header_errors() {
        assert!(matches!(parse_header("1,1,10"), Err(AssemblerError::InvalidHeader(_))));
        assert!(matches!(parse_header("1,1,10,7,8"), Err(AssemblerError::InvalidHeader(_))));
        assert!(matches!(parse_header("1,1,300,7"), Err(AssemblerError::InvalidHeader(_))));
        assert!(matches!(parse_header("OP_NOP"), Err(AssemblerError::InvalidHeader(_))));
        assert!(matches!(parse_header("1 1 10 7"), Err(AssemblerError::InvalidHeader(_))));
    }

    #[test]
    fn test_parse_instruction_line() {
        let line = parse_line("OP_LEA, FREG_A, 1, 2", 2).unwrap();
        assert_eq!(
            line,
            Line::Instruction {
                mnemonic: "OP_LEA".to_string(),
                operands: vec![
                    Operand::Symbol("FREG_A".to_string()),
                    Operand::Immediate(1),
                    Operand::Immediate(2),
                ],
            }
        );

        let line = parse_line("OP_HLT", 3).unwrap();
        assert_eq!(
            line,
            Line::Instruction {
                mnemonic: "OP_HLT".to_string(),
                operands: vec![],
            }
        );
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(parse_line("1.0f", 5).unwrap(), Line::Literal(0x3F80_0000));
        assert_eq!(parse_line("-1i", 5).unwrap(), Line::Literal(0xFFFF_FFFF));
        assert!(matches!(
            parse_line("4294967296i", 5),
            Err(AssemblerError::InvalidLiteral { line: 5, .. })
        ));
        assert!(matches!(
            parse_line("1.0f 2.0f", 5),
            Err(AssemblerError::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn test_immediate_range() {
        assert_eq!(
            parse_line("OP_LEA, AREG_A, 1, 256", 4),
            Err(AssemblerError::InvalidImmediate { line: 4, value: 256 })
        );
        assert_eq!(
            parse_line("OP_LEA, AREG_A, 1, -1", 4),
            Err(AssemblerError::InvalidImmediate { line: 4, value: -1 })
        );
    }

    #[test]
    fn test_comma_errors() {
        assert!(matches!(
            parse_line("OP_FMA, FREG_A FREG_B, FREG_C", 2),
            Err(AssemblerError::SyntaxError { line: 2, .. })
        ));
        assert!(matches!(
            parse_line("OP_FMA, FREG_A, FREG_B,", 2),
            Err(AssemblerError::SyntaxError { .. })
        ));
    }
}
