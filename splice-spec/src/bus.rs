//! # Bus Payloads
//!
//! Values exchanged between the VM and the simulated subsystems. Readouts
//! flow subsystem → VM and are mirrored once per tick; commands flow
//! VM → subsystem through FIFO queues.

use crate::operand::{AdcsAction, ImagerAction, ImagerParam};
use serde::{Deserialize, Serialize};
use std::fmt;

// ========== ADCS ==========

/// Attitude control mode as reported on the bus
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdcsMode {
    Unset = 1,
    Track = 2,
    Bdot = 3,
    ToSun = 4,
    Nadir = 5,
}

impl AdcsMode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(AdcsMode::Unset),
            2 => Some(AdcsMode::Track),
            3 => Some(AdcsMode::Bdot),
            4 => Some(AdcsMode::ToSun),
            5 => Some(AdcsMode::Nadir),
            _ => None,
        }
    }

    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            AdcsMode::Unset => "UNSET",
            AdcsMode::Track => "TRACK",
            AdcsMode::Bdot => "BDOTT",
            AdcsMode::ToSun => "TOSUN",
            AdcsMode::Nadir => "NADIR",
        }
    }
}

impl Default for AdcsMode {
    fn default() -> Self {
        AdcsMode::Unset
    }
}

impl From<AdcsAction> for AdcsMode {
    fn from(action: AdcsAction) -> Self {
        match action {
            AdcsAction::Nadir => AdcsMode::Nadir,
            AdcsAction::ToSun => AdcsMode::ToSun,
            AdcsAction::Bdot => AdcsMode::Bdot,
            AdcsAction::Track => AdcsMode::Track,
            AdcsAction::Unset => AdcsMode::Unset,
        }
    }
}

impl fmt::Display for AdcsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// ADCS sensor and actuator readout
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AdcsReadout {
    pub mode: AdcsMode,
    /// Magnetometer, nT
    pub mag: [f32; 3],
    /// Unit sun vector
    pub sun: [f32; 3],
    /// Angular rate, rad/s
    pub ang: [f32; 3],
    /// Attitude quaternion (w, x, y, z)
    pub qtn: [f32; 4],
    /// Magnetorquer dipole command
    pub mtq: [f32; 3],
}

/// Commands accepted by the ADCS
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdcsCommand {
    /// Push a mode that stays active for `duration` seconds
    SetMode { mode: AdcsMode, duration: u32 },
}

// ========== GPS ==========

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GpsReadout {
    pub lat: f32,
    pub lng: f32,
    /// Altitude, km
    pub alt: f32,
    /// Mission time, unix seconds
    pub time: i64,
}

// ========== Imager ==========

/// Snapshot file format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpg,
    Raw,
    Bmp,
    Png,
}

impl ImageFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Raw => "raw",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Png => "png",
        }
    }
}

impl From<ImagerAction> for ImageFormat {
    fn from(action: ImagerAction) -> Self {
        match action {
            ImagerAction::Jpg => ImageFormat::Jpg,
            ImagerAction::Raw => ImageFormat::Raw,
            ImagerAction::Bmp => ImageFormat::Bmp,
            ImagerAction::Png => ImageFormat::Png,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Colour channel of the imager gain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GainChannel {
    Red,
    Green,
    Blue,
}

impl GainChannel {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            GainChannel::Red => 0,
            GainChannel::Green => 1,
            GainChannel::Blue => 2,
        }
    }

    /// Channel addressed by a gain parameter, if it is one
    pub fn from_param(param: ImagerParam) -> Option<Self> {
        match param {
            ImagerParam::GainR => Some(GainChannel::Red),
            ImagerParam::GainG => Some(GainChannel::Green),
            ImagerParam::GainB => Some(GainChannel::Blue),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImagerReadout {
    /// R, G, B gain
    pub gain: [f32; 3],
    /// Exposure, ms
    pub exposure: f32,
    /// Snapshots taken so far
    pub number: u32,
}

impl Default for ImagerReadout {
    fn default() -> Self {
        Self {
            gain: [1.0; 3],
            exposure: 1.0,
            number: 0,
        }
    }
}

/// Commands accepted by the imager
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ImagerCommand {
    SetGain { channel: GainChannel, value: f32 },
    SetExposure(f32),
    Snapshot { format: ImageFormat },
}

// ========== Telemetry ==========

/// Everything the VM can observe from the subsystems in one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub adcs: AdcsReadout,
    pub gps: GpsReadout,
    pub imager: ImagerReadout,
}
