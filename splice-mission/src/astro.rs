//! Astronomy helpers
//!
//! Geodesy constants, degree lengths on the WGS-84 ellipsoid, and the
//! low-precision sun and sidereal-time models used by the reference
//! propagator.

use crate::propagator::Elements;

/// Seconds in a UTC day
pub const UTC_DAY: f64 = 86_400.0;

/// Seconds in a sidereal day
pub const SIDEREAL_DAY: f64 = 86_164.0905;

/// Equatorial radius, metres
pub const R_EARTH: f64 = 6_378_137.0;

/// Equatorial radius, km
pub const R_EARTH_KM: f64 = R_EARTH / 1000.0;

/// First eccentricity squared of the WGS-84 ellipsoid
pub const E_2: f64 = 6.694_379_990_14e-3;

/// Earth gravitational parameter, km^3/s^2
pub const MU_EARTH: f64 = 398_600.4418;

/// Julian date of the Unix epoch
const JD_UNIX_EPOCH: f64 = 2_440_587.5;

/// Julian date of J2000.0
const JD_J2000: f64 = 2_451_545.0;

/// Length of one degree of latitude and longitude at a given latitude, km
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegreeLength {
    pub lat_km: f64,
    pub lon_km: f64,
}

pub fn degree_length(lat_deg: f64) -> DegreeLength {
    let lat = lat_deg.to_radians();
    let length_lat = 111_132.954 - 559.822 * (2.0 * lat).cos() + 1.175 * (4.0 * lat).cos();
    let length_lon = std::f64::consts::PI * R_EARTH * lat.cos()
        / (180.0 * (1.0 - E_2 * lat.sin().powi(2)).sqrt());
    DegreeLength {
        lat_km: length_lat / 1000.0,
        lon_km: length_lon / 1000.0,
    }
}

/// Seconds elapsed since the last periapsis passage
pub fn time_since_periapsis(elements: &Elements) -> f64 {
    UTC_DAY * elements.period_days * elements.true_anomaly_deg / 360.0
}

/// `| |a| - |b| | < precision`
#[inline]
pub fn fp_equals(a: f64, b: f64, precision: f64) -> bool {
    (a.abs() - b.abs()).abs() < precision
}

/// Days since J2000.0 for a Unix timestamp
pub fn days_since_j2000(unix_secs: f64) -> f64 {
    unix_secs / UTC_DAY + JD_UNIX_EPOCH - JD_J2000
}

/// Greenwich mean sidereal time, degrees in `[0, 360)`
pub fn gmst_deg(unix_secs: f64) -> f64 {
    let d = days_since_j2000(unix_secs);
    (280.460_618_37 + 360.985_647_366_29 * d).rem_euclid(360.0)
}

/// Unit vector towards the sun in the equatorial inertial frame
pub fn sun_direction(unix_secs: f64) -> [f64; 3] {
    let d = days_since_j2000(unix_secs);
    let mean_lon = (280.460 + 0.985_647_4 * d).rem_euclid(360.0);
    let anomaly = (357.528 + 0.985_600_3 * d).rem_euclid(360.0).to_radians();
    let ecliptic_lon =
        (mean_lon + 1.915 * anomaly.sin() + 0.020 * (2.0 * anomaly).sin()).to_radians();
    let obliquity = (23.439 - 0.000_000_4 * d).to_radians();

    [
        ecliptic_lon.cos(),
        obliquity.cos() * ecliptic_lon.sin(),
        obliquity.sin() * ecliptic_lon.sin(),
    ]
}

/// Whether a position (km, inertial frame) is outside the Earth's
/// cylindrical shadow
pub fn is_sunlit(position_km: &[f64; 3], sun: &[f64; 3]) -> bool {
    let along = dot(position_km, sun);
    if along >= 0.0 {
        return true;
    }
    let perp = [
        position_km[0] - along * sun[0],
        position_km[1] - along * sun[1],
        position_km[2] - along * sun[2],
    ];
    dot(&perp, &perp).sqrt() > R_EARTH_KM
}

#[inline]
fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}
