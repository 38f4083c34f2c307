//! # Lexer for SPLICE Task Source

use logos::Logos;

/// Tokens of a single source line
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
pub enum Token {
    /// Mnemonic or symbol (`OP_MOV`, `FREG_A`, `PRE_MOV_RAM`, ...)
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// Decimal number
    #[regex(r"-?[0-9]+", |lex| lex.slice().parse().ok())]
    Number(i64),

    /// Hexadecimal number
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| i64::from_str_radix(&lex.slice()[2..], 16).ok())]
    Hex(i64),

    /// Float data literal (`1.0f`, `-2.5e3f`)
    #[regex(r"-?[0-9]+(\.[0-9]+)?([eE][-+]?[0-9]+)?f", |lex| {
        let s = lex.slice();
        s[..s.len() - 1].parse::<f32>().ok()
    })]
    FloatLiteral(f32),

    /// Integer data literal (`42i`, `-7i`)
    #[regex(r"-?[0-9]+i", |lex| {
        let s = lex.slice();
        s[..s.len() - 1].parse::<i64>().ok()
    })]
    IntLiteral(i64),

    #[token(",")]
    Comma,
}
