//! Attitude determination and control
//!
//! Modes live on a stack. A mode command pushes an entry that stays active
//! for its duration; only the top entry ages, so a short manoeuvre pauses
//! the mode beneath it, which resumes once the manoeuvre expires. An empty
//! stack reports `UNSET`.

use crate::astro::sun_direction;
use crate::bus::DataBus;
use crate::environment::Environment;
use serde::{Deserialize, Serialize};
use splice_spec::{AdcsCommand, AdcsMode, AdcsReadout, GpsReadout};
use tracing::debug;

/// A mode with the seconds it has left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeEntry {
    pub mode: AdcsMode,
    pub remaining: u32,
}

/// Inertial measurement unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Imu {
    pub sun: [f32; 3],
    pub mag: [f32; 3],
    pub ang: [f32; 3],
    pub qtn: [f32; 4],
}

impl Default for Imu {
    fn default() -> Self {
        Self {
            sun: [0.0; 3],
            mag: [0.0; 3],
            ang: [0.0; 3],
            qtn: [1.0, 0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Adcs {
    mode_stack: Vec<ModeEntry>,
    pub imu: Imu,
    /// Magnetorquer dipole
    pub mtq: [f32; 3],
    pub gps: GpsReadout,
}

impl Adcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active mode
    pub fn mode(&self) -> AdcsMode {
        self.mode_stack.last().map_or(AdcsMode::Unset, |entry| entry.mode)
    }

    pub fn mode_stack(&self) -> &[ModeEntry] {
        &self.mode_stack
    }

    /// Apply one command; zero-length modes are ignored
    pub fn command(&mut self, command: AdcsCommand) {
        match command {
            AdcsCommand::SetMode { mode, duration: 0 } => {
                debug!(%mode, "ignoring zero-length ADCS mode");
            }
            AdcsCommand::SetMode { mode, duration } => {
                debug!(%mode, duration, "ADCS mode pushed");
                self.mode_stack.push(ModeEntry {
                    mode,
                    remaining: duration,
                });
            }
        }
    }

    /// One update: drain commands, refresh sensors, publish, then age the
    /// active mode by `seconds`
    pub fn step(&mut self, seconds: u32, env: &Environment, bus: &mut DataBus) {
        for command in bus.adc.take_queue() {
            self.command(command);
        }

        let now = env.unix_time();
        if let Some(track) = env.ground_track {
            self.gps.lat = track.lat as f32;
            self.gps.lng = track.lng as f32;
            self.gps.alt = track.alt as f32;
        }
        self.gps.time = now;
        self.imu.sun = if env.sunlit {
            sun_direction(now as f64).map(|c| c as f32)
        } else {
            [0.0; 3]
        };

        self.publish(bus);
        self.age(seconds);
    }

    fn publish(&self, bus: &mut DataBus) {
        bus.adc.out = AdcsReadout {
            mode: self.mode(),
            mag: self.imu.mag,
            sun: self.imu.sun,
            ang: self.imu.ang,
            qtn: self.imu.qtn,
            mtq: self.mtq,
        };
        bus.gps = self.gps;
    }

    fn age(&mut self, seconds: u32) {
        if let Some(top) = self.mode_stack.last_mut() {
            top.remaining = top.remaining.saturating_sub(seconds);
            if top.remaining == 0 {
                debug!(mode = %top.mode, "ADCS mode expired");
                self.mode_stack.pop();
            }
        }
    }
}
