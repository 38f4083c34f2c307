//! # SPLICE Instruction Set
//!
//! Bytecode format of the SPLICE flight-software VM.
//!
//! ## Key Features
//! - 32-bit instruction words packed from four byte fields
//! - 16 integer and 32 floating-point registers, tagged by class
//! - Tasks addressed by `(group, task)` with a private data segment
//! - Frequency-coded scheduling (once, periodic, always)
//! - Instrument access (ADCS, GPS, imager, clocks) through a mirrored bus

pub mod encoding;
pub mod opcode;
pub mod register;
pub mod operand;
pub mod instruction;
pub mod task;
pub mod frequency;
pub mod bus;
pub mod config;
pub mod error;

pub use bus::{
    AdcsCommand, AdcsMode, AdcsReadout, GainChannel, GpsReadout, ImageFormat, ImagerCommand,
    ImagerReadout, Telemetry,
};
pub use config::{ConfigError, LogLevel, Quirks, VmConfig};
pub use encoding::{pack4x8to32, pack_float, pack_int, unpack32to4x8, unpack_float, unpack_int};
pub use error::SpliceError;
pub use frequency::Frequency;
pub use instruction::{CmpOperand, Instruction, TrigFn};
pub use opcode::Opcode;
pub use operand::{
    Action, AdcsAction, AdcsParam, Comparison, FnMode, FpuConst, GpsParam, ImagerAction,
    ImagerParam, Instrument, MovMode, NmfParam, Param, StrFormat, VxmParam,
};
pub use register::{Register, RegisterClass, NUM_ALU_REGISTERS, NUM_FPU_REGISTERS};
pub use task::{Task, TaskHeader, TaskId, TaskStatus, MAX_TASK_WORDS};

/// Word type
pub type Word = u32;

pub type Result<T> = std::result::Result<T, SpliceError>;
