//! SPLICE Assembler
//!
//! Assemble SPLICE task source lines into packed task words.
//!
//! ## Example
//!
//! ```rust
//! use splice_assembler::assemble;
//!
//! let task = assemble(&[
//!     "1,1,10,3",
//!     "OP_NOP",
//!     "OP_HLT",
//! ]).unwrap();
//! assert_eq!(task.words.len(), 3);
//! ```

pub mod error;
pub mod lexer;
pub mod parser;
pub mod symbols;
pub mod encoder;
pub mod assembler;

pub use error::{AssemblerError, Result};
pub use assembler::{assemble, assemble_source, Assembler};
pub use parser::{parse_header, parse_line, Line, Operand};
pub use symbols::{SymbolTable, UNRESOLVED};
