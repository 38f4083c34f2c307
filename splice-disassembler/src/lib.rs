//! # SPLICE Disassembler
//!
//! Decode SPLICE words into [`Instruction`](splice_spec::Instruction)s and
//! render tasks back into assembler source.
//!
//! The decoder is shared with the runtime: the VM's decode stage calls
//! [`decode`] and maps [`DisassemblerError::UnknownOpcode`] and
//! [`DisassemblerError::BadOperand`] onto task faults.
//!
//! ## Example
//!
//! ```rust
//! use splice_spec::{Task, TaskHeader};
//! use splice_disassembler::disassemble;
//!
//! let task = Task::from_words(vec![TaskHeader::new(1, 1, 0x7F, 2).to_word(), 0x0700_0000]).unwrap();
//! assert_eq!(disassemble(&task), vec!["1,1,127,2", "OP_HLT"]);
//! ```

pub mod error;
pub mod decoder;
pub mod formatter;
pub mod disassembler;

pub use error::{DisassemblerError, Result};
pub use disassembler::{disassemble, listing};
pub use decoder::decode;
pub use formatter::format;
