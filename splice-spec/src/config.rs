//! # VM Configuration
//!
//! Settings that bytecode can read (and partly write) through the VXM
//! instrument, plus compatibility switches for two known upstream defects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Log verbosity of the VM output queue
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Silent = 0,
    Error = 1,
    #[default]
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(LogLevel::Silent),
            1 => Some(LogLevel::Error),
            2 => Some(LogLevel::Info),
            3 => Some(LogLevel::Debug),
            _ => None,
        }
    }

    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Whether a message of level `msg` passes this threshold
    #[inline]
    pub fn allows(self, msg: LogLevel) -> bool {
        msg != LogLevel::Silent && self >= msg
    }
}

/// Compatibility switches for upstream behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quirks {
    /// `ALU_NE` evaluates as `ALU_EQ`
    pub alu_ne_matches_eq: bool,
    /// Integer FSD tests the addend register for zero instead of the divisor
    pub fsd_checks_addend: bool,
}

impl Quirks {
    /// Bit-for-bit upstream behaviour
    pub const UPSTREAM: Self = Self {
        alu_ne_matches_eq: true,
        fsd_checks_addend: true,
    };

    pub const CORRECTED: Self = Self {
        alu_ne_matches_eq: false,
        fsd_checks_addend: false,
    };
}

impl Default for Quirks {
    fn default() -> Self {
        Self::UPSTREAM
    }
}

/// VM configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmConfig {
    /// Epsilon for float comparisons and the FSD near-zero guard
    pub fp_precision: f32,
    /// Seconds added to the VM clock per tick
    pub timeslice: u32,
    pub log_level: LogLevel,
    pub quirks: Quirks,
    /// Capacity of the VM log queue; the oldest lines are evicted first
    pub max_log_lines: usize,
}

impl VmConfig {
    /// Default configuration:
    /// - fp_precision: 0.001
    /// - timeslice: 1 second
    /// - log_level: Info
    /// - quirks: upstream
    /// - max_log_lines: 256
    pub const DEFAULT: Self = Self {
        fp_precision: 0.001,
        timeslice: 1,
        log_level: LogLevel::Info,
        quirks: Quirks::UPSTREAM,
        max_log_lines: 256,
    };

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    /// Timeslice in milliseconds
    #[inline]
    pub const fn timeslice_ms(&self) -> u64 {
        self.timeslice as u64 * 1000
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fp_precision.is_finite() || self.fp_precision <= 0.0 {
            return Err(ConfigError::InvalidPrecision);
        }
        if self.timeslice == 0 {
            return Err(ConfigError::ZeroTimeslice);
        }
        if self.max_log_lines == 0 {
            return Err(ConfigError::ZeroLogCapacity);
        }
        Ok(())
    }
}

impl Default for VmConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for VmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VmConfig {{ fp_precision: {}, timeslice: {}s, log_level: {:?}, quirks: {}, log capacity: {} }}",
            self.fp_precision,
            self.timeslice,
            self.log_level,
            if self.quirks == Quirks::UPSTREAM { "upstream" } else { "custom" },
            self.max_log_lines,
        )
    }
}

/// Configuration error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// fp_precision must be finite and positive
    InvalidPrecision,
    /// timeslice must be at least one second
    ZeroTimeslice,
    /// max_log_lines must be at least one
    ZeroLogCapacity,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPrecision => {
                write!(f, "fp_precision must be finite and greater than zero")
            }
            ConfigError::ZeroTimeslice => {
                write!(f, "timeslice must be at least 1 second")
            }
            ConfigError::ZeroLogCapacity => {
                write!(f, "max_log_lines must be at least 1")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
