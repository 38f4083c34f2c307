//! Orbit propagation
//!
//! The mission stepper asks an [`OrbitPropagator`] for the satellite state at
//! each simulated second. Real deployments plug in an SGP4 or ephemeris
//! backed implementation; [`CircularOrbit`] is a deterministic two-body
//! stand-in that reads the mean elements straight from the TLE.

use crate::astro::{gmst_deg, is_sunlit, sun_direction, MU_EARTH, R_EARTH_KM, UTC_DAY};
use crate::timer::MissionTimer;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PropagationError {
    #[error("Malformed TLE line {line}: bad {field}")]
    MalformedTle { line: u8, field: &'static str },

    #[error("Unphysical orbit: {0}")]
    Unphysical(String),

    #[error("Propagator failure: {0}")]
    Backend(String),
}

/// Two-line element set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TleData {
    pub line_1: String,
    pub line_2: String,
}

impl TleData {
    pub fn new(line_1: impl Into<String>, line_2: impl Into<String>) -> Self {
        Self {
            line_1: line_1.into(),
            line_2: line_2.into(),
        }
    }

    /// Read the mean elements from their fixed columns
    pub fn mean_elements(&self) -> Result<MeanElements, PropagationError> {
        let l1 = self.line_1.as_str();
        let l2 = self.line_2.as_str();

        if !l1.starts_with("1 ") {
            return Err(PropagationError::MalformedTle { line: 1, field: "line number" });
        }
        if !l2.starts_with("2 ") {
            return Err(PropagationError::MalformedTle { line: 2, field: "line number" });
        }

        let catalog_number: u32 = field(l1, 1, 2..7, "catalog number")?;
        let catalog_2: u32 = field(l2, 2, 2..7, "catalog number")?;
        if catalog_number != catalog_2 {
            return Err(PropagationError::MalformedTle { line: 2, field: "catalog number" });
        }

        let epoch_year: u32 = field(l1, 1, 18..20, "epoch year")?;
        let epoch_day: f64 = field(l1, 1, 20..32, "epoch day")?;
        let year = if epoch_year < 57 { 2000 + epoch_year } else { 1900 + epoch_year };
        let epoch_unix = MissionTimer::new(year as i32, 1, 1, 0, 0, 0).to_unix() as f64
            + (epoch_day - 1.0) * UTC_DAY;

        let inclination_deg = field(l2, 2, 8..16, "inclination")?;
        let raan_deg = field(l2, 2, 17..25, "right ascension")?;
        let eccentricity_digits = l2
            .get(26..33)
            .map(str::trim)
            .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
            .ok_or(PropagationError::MalformedTle { line: 2, field: "eccentricity" })?;
        let eccentricity: f64 = format!("0.{}", eccentricity_digits)
            .parse()
            .map_err(|_| PropagationError::MalformedTle { line: 2, field: "eccentricity" })?;

        Ok(MeanElements {
            catalog_number,
            epoch_unix,
            inclination_deg,
            raan_deg,
            eccentricity,
            arg_periapsis_deg: field(l2, 2, 34..42, "argument of perigee")?,
            mean_anomaly_deg: field(l2, 2, 43..51, "mean anomaly")?,
            mean_motion: field(l2, 2, 52..63, "mean motion")?,
        })
    }
}

fn field<T: std::str::FromStr>(
    line: &str,
    number: u8,
    columns: std::ops::Range<usize>,
    name: &'static str,
) -> Result<T, PropagationError> {
    line.get(columns)
        .and_then(|s| s.trim().parse().ok())
        .ok_or(PropagationError::MalformedTle { line: number, field: name })
}

/// Mean elements of a TLE at its epoch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanElements {
    pub catalog_number: u32,
    pub epoch_unix: f64,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub eccentricity: f64,
    pub arg_periapsis_deg: f64,
    pub mean_anomaly_deg: f64,
    /// Revolutions per day
    pub mean_motion: f64,
}

/// Osculating orbital elements
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Elements {
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub arg_periapsis_deg: f64,
    pub true_anomaly_deg: f64,
    pub period_days: f64,
}

/// Satellite state at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrbitalState {
    pub lat: f64,
    pub lng: f64,
    pub alt_km: f64,
    /// Inertial position, km
    pub position_km: [f64; 3],
    pub elements: Elements,
    pub sunlit: bool,
}

pub trait OrbitPropagator {
    fn propagate(&self, tle: &TleData, at: &MissionTimer)
        -> Result<OrbitalState, PropagationError>;
}

impl<P: OrbitPropagator + ?Sized> OrbitPropagator for &P {
    fn propagate(&self, tle: &TleData, at: &MissionTimer) -> Result<OrbitalState, PropagationError> {
        (**self).propagate(tle, at)
    }
}

/// Two-body propagator on a circular orbit
///
/// The orbit radius follows from the mean motion and the satellite advances
/// uniformly from the TLE mean anomaly. Drag, J2 and the eccentricity of the
/// position are ignored, so the ground track drifts from SGP4 within hours.
#[derive(Debug, Clone, Copy, Default)]
pub struct CircularOrbit;

impl OrbitPropagator for CircularOrbit {
    fn propagate(&self, tle: &TleData, at: &MissionTimer) -> Result<OrbitalState, PropagationError> {
        let mean = tle.mean_elements()?;
        if mean.mean_motion.is_nan() || mean.mean_motion <= 0.0 {
            return Err(PropagationError::Unphysical(format!(
                "mean motion {} rev/day",
                mean.mean_motion
            )));
        }

        let n = mean.mean_motion * TAU / UTC_DAY;
        let a = (MU_EARTH / (n * n)).cbrt();
        let unix = at.to_unix() as f64;
        let dt = unix - mean.epoch_unix;

        let anomaly = (mean.mean_anomaly_deg + 360.0 * mean.mean_motion * dt / UTC_DAY)
            .rem_euclid(360.0);
        let u = (mean.arg_periapsis_deg + anomaly).to_radians();
        let raan = mean.raan_deg.to_radians();
        let inc = mean.inclination_deg.to_radians();

        let position_km = [
            a * (raan.cos() * u.cos() - raan.sin() * u.sin() * inc.cos()),
            a * (raan.sin() * u.cos() + raan.cos() * u.sin() * inc.cos()),
            a * u.sin() * inc.sin(),
        ];

        let lat = (position_km[2] / a).asin().to_degrees();
        let lng = wrap_180(position_km[1].atan2(position_km[0]).to_degrees() - gmst_deg(unix));
        let sunlit = is_sunlit(&position_km, &sun_direction(unix));

        Ok(OrbitalState {
            lat,
            lng,
            alt_km: a - R_EARTH_KM,
            position_km,
            elements: Elements {
                semi_major_axis_km: a,
                eccentricity: mean.eccentricity,
                inclination_deg: mean.inclination_deg,
                raan_deg: mean.raan_deg,
                arg_periapsis_deg: mean.arg_periapsis_deg,
                true_anomaly_deg: anomaly,
                period_days: 1.0 / mean.mean_motion,
            },
            sunlit,
        })
    }
}

/// Wrap an angle into `[-180, 180)`
fn wrap_180(deg: f64) -> f64 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}
