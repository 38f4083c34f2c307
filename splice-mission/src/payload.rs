//! Payload: the Earth-observation imager
//!
//! The imager footprint is a square swath centred on the sub-satellite
//! point, converted to a lat/lon box with the local degree lengths.

use crate::astro::degree_length;
use crate::bus::DataBus;
use crate::environment::GroundTrack;
use serde::{Deserialize, Serialize};
use splice_spec::{ImageFormat, ImagerCommand, ImagerReadout};
use tracing::{debug, warn};

// ========== Geometry ==========

/// Field of view, degrees, of a sensor of width `d` behind a lens of focal
/// length `f` (same units)
pub fn calculate_camera_fov(d: f64, f: f64) -> f64 {
    (2.0 * (d / (2.0 * f)).atan()).to_degrees()
}

/// Ground sampling distance, metres per pixel
pub fn calculate_camera_gsd(alt_km: f64, pixel_m: f64, f_m: f64) -> f64 {
    alt_km * 1000.0 * pixel_m / f_m
}

/// Swath width, km, for a field of view in degrees
pub fn calculate_swath(fov_deg: f64, alt_km: f64) -> f64 {
    2.0 * alt_km * (fov_deg.to_radians() / 2.0).tan()
}

/// Lat/lon box, degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageBox {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl ImageBox {
    /// Whether all four edges match within `precision`
    pub fn matches(&self, other: &ImageBox, precision: f64) -> bool {
        use crate::astro::fp_equals;
        fp_equals(self.top, other.top, precision)
            && fp_equals(self.left, other.left, precision)
            && fp_equals(self.bottom, other.bottom, precision)
            && fp_equals(self.right, other.right, precision)
    }
}

/// Footprint of the imager at a given position
pub fn get_imager_frame(fov_deg: f64, alt_km: f64, lat: f64, lon: f64) -> ImageBox {
    let swath = calculate_swath(fov_deg, alt_km);
    let len = degree_length(lat);
    let half_lat = swath / len.lat_km / 2.0;
    let half_lon = swath / len.lon_km / 2.0;
    ImageBox {
        top: (lat + half_lat).max(lat - half_lat),
        left: (lon + half_lon).min(lon - half_lon),
        bottom: (lat + half_lat).min(lat - half_lat),
        right: (lon + half_lon).max(lon - half_lon),
    }
}

// ========== Imager ==========

/// Optical configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagerConfig {
    /// Field of view, degrees
    pub fov: f64,
    /// Sensor width, m
    pub d: f64,
    /// Focal length, m
    pub f: f64,
    /// Sensor size in pixels
    pub sensor: [u32; 2],
    /// Pixel pitch, m
    pub pixel: f64,
}

impl Default for ImagerConfig {
    fn default() -> Self {
        Self {
            fov: 0.038_746_309_394_274_12,
            d: 0.0225,
            f: 0.58,
            sensor: [4096, 3072],
            pixel: 5.5e-6,
        }
    }
}

impl ImagerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.fov.is_finite() && self.fov > 0.0 && self.fov < 180.0) {
            return Err(format!("imager fov {} out of range", self.fov));
        }
        if !(self.f.is_finite() && self.f > 0.0) {
            return Err(format!("imager focal length {} must be positive", self.f));
        }
        if !(self.pixel.is_finite() && self.pixel > 0.0) {
            return Err(format!("imager pixel pitch {} must be positive", self.pixel));
        }
        Ok(())
    }
}

/// A stored image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: String,
    pub image_box: ImageBox,
    pub format: ImageFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Imager {
    pub config: ImagerConfig,
    /// Footprint at the current position
    pub frame: Option<ImageBox>,
    pub buffer: Vec<Snapshot>,
    pub gain: [f32; 3],
    /// Exposure, ms
    pub exposure: f32,
}

impl Imager {
    pub fn new(config: ImagerConfig) -> Self {
        let readout = ImagerReadout::default();
        Self {
            config,
            frame: None,
            buffer: Vec::new(),
            gain: readout.gain,
            exposure: readout.exposure,
        }
    }

    /// Snapshots taken so far
    pub fn number(&self) -> u32 {
        self.buffer.len() as u32
    }

    pub fn update_frame(&mut self, track: &GroundTrack) {
        self.frame = Some(get_imager_frame(self.config.fov, track.alt, track.lat, track.lng));
    }

    /// Store the current frame; `None` until the first frame exists
    pub fn take_snapshot(&mut self, timestamp: &str, format: ImageFormat) -> Option<&Snapshot> {
        let Some(image_box) = self.frame else {
            warn!("snapshot requested before the first frame");
            return None;
        };
        self.buffer.push(Snapshot {
            timestamp: timestamp.to_string(),
            image_box,
            format,
        });
        debug!(number = self.buffer.len(), %format, "snapshot taken");
        self.buffer.last()
    }

    fn command(&mut self, command: ImagerCommand, timestamp: &str) {
        match command {
            ImagerCommand::SetGain { channel, value } => self.gain[channel.index()] = value,
            ImagerCommand::SetExposure(value) => self.exposure = value,
            ImagerCommand::Snapshot { format } => {
                self.take_snapshot(timestamp, format);
            }
        }
    }

    /// One update: refresh the frame, drain commands, publish the readout
    pub fn step(&mut self, track: Option<&GroundTrack>, timestamp: &str, bus: &mut DataBus) {
        if let Some(track) = track {
            self.update_frame(track);
        }
        for command in bus.img.take_queue() {
            self.command(command, timestamp);
        }
        bus.img.out = ImagerReadout {
            gain: self.gain,
            exposure: self.exposure,
            number: self.number(),
        };
    }
}

/// Instruments carried by the satellite
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    #[serde(default)]
    pub imager: ImagerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruments {
    pub imager: Imager,
}

impl Instruments {
    pub fn new(config: &InstrumentConfig) -> Self {
        Self {
            imager: Imager::new(config.imager),
        }
    }
}
