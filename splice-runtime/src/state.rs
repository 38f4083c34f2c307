//! VM state for the SPLICE runtime

use serde::{Deserialize, Serialize};
use splice_spec::{Register, VmConfig, NUM_ALU_REGISTERS, NUM_FPU_REGISTERS};
use std::fmt;

/// A register value tagged with its class
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f32),
}

impl Value {
    /// Integer view; floats are truncated toward zero (saturating, NaN is 0)
    #[inline]
    pub fn as_int(self) -> i32 {
        match self {
            Value::Int(v) => v,
            Value::Float(v) => v as i32,
        }
    }

    #[inline]
    pub fn as_float(self) -> f32 {
        match self {
            Value::Int(v) => v as f32,
            Value::Float(v) => v,
        }
    }

    /// Raw memory word: integers as two's complement, floats as their bit pattern
    #[inline]
    pub fn to_word(self) -> u32 {
        match self {
            Value::Int(v) => v as u32,
            Value::Float(v) => v.to_bits(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:?}", v),
        }
    }
}

/// Integer and floating-point register files
///
/// Float register ids index `fpu` directly, so slots 0-15 stay at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterFile {
    pub alu: [i32; NUM_ALU_REGISTERS],
    pub fpu: [f32; NUM_FPU_REGISTERS],
}

impl RegisterFile {
    pub fn new() -> Self {
        Self {
            alu: [0; NUM_ALU_REGISTERS],
            fpu: [0.0; NUM_FPU_REGISTERS],
        }
    }

    #[inline]
    pub fn read(&self, reg: Register) -> Value {
        match reg {
            Register::Alu(_) => Value::Int(self.alu[reg.index()]),
            Register::Fpu(_) => Value::Float(self.fpu[reg.index()]),
        }
    }

    /// Write a value, converting it to the register's class
    #[inline]
    pub fn write(&mut self, reg: Register, value: Value) {
        match reg {
            Register::Alu(_) => self.alu[reg.index()] = value.as_int(),
            Register::Fpu(_) => self.fpu[reg.index()] = value.as_float(),
        }
    }

    /// Load a raw memory word: integer registers take it as-is, float
    /// registers reinterpret the bits
    #[inline]
    pub fn load_word(&mut self, reg: Register, word: u32) {
        match reg {
            Register::Alu(_) => self.alu[reg.index()] = word as i32,
            Register::Fpu(_) => self.fpu[reg.index()] = f32::from_bits(word),
        }
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

/// VM state: registers, clocks and the settings bytecode can change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VmState {
    pub registers: RegisterFile,

    /// VM clock in milliseconds
    pub vxm_clock: u64,

    /// External clock, unix seconds (read only to bytecode)
    pub nmf_clock: i64,

    /// Live settings; SET on the VXM instrument writes here
    pub config: VmConfig,
}

impl VmState {
    pub fn new(config: VmConfig) -> Self {
        Self {
            registers: RegisterFile::new(),
            vxm_clock: 0,
            nmf_clock: 0,
            config,
        }
    }

    /// VM time in seconds
    #[inline]
    pub fn vm_time(&self) -> u64 {
        self.vxm_clock / 1000
    }

    /// Advance the clock by one timeslice
    pub fn advance_clock(&mut self) {
        self.vxm_clock = self.vxm_clock.saturating_add(self.config.timeslice_ms());
    }
}
