//! Mission environment
//!
//! Time, orbital state and the rolling event log. The stepper evolves the
//! environment one second at a time; every other subsystem reads from it.

use crate::astro::time_since_periapsis;
use crate::error::Result;
use crate::propagator::{OrbitPropagator, OrbitalState, TleData};
use crate::timer::MissionTimer;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Entries kept in the rolling event log
pub const EVENT_LOG_CAPACITY: usize = 10;

/// Sub-satellite point
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundTrack {
    pub lat: f64,
    pub lng: f64,
    /// Altitude, km
    pub alt: f64,
}

/// Osculating elements in mission units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    /// Semi-major axis, km
    pub a: f64,
    pub e: f64,
    /// Inclination, degrees
    pub i: f64,
    /// Right ascension of the ascending node, degrees
    pub ra: f64,
    /// Argument of periapsis, degrees
    pub w: f64,
    /// Seconds since periapsis
    pub tp: f64,
}

/// `[timestamp, message]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord(pub String, pub String);

impl EventRecord {
    pub fn timestamp(&self) -> &str {
        &self.0
    }

    pub fn message(&self) -> &str {
        &self.1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub norad_id: u32,
    pub tle_data: TleData,
    pub start_date: MissionTimer,
    pub current_date: MissionTimer,
    /// Seconds simulated so far
    pub elapsed_timer: u64,
    pub ground_track: Option<GroundTrack>,
    /// Inertial position, km
    pub orbit_vector: Option<[f64; 3]>,
    pub elements: Option<OrbitalElements>,
    pub sunlit: bool,
    log_buffer: VecDeque<EventRecord>,
}

impl Environment {
    pub fn new(norad_id: u32, start_date: MissionTimer, tle_data: TleData) -> Self {
        Self {
            norad_id,
            tle_data,
            start_date,
            current_date: start_date,
            elapsed_timer: 0,
            ground_track: None,
            orbit_vector: None,
            elements: None,
            sunlit: false,
            log_buffer: VecDeque::with_capacity(EVENT_LOG_CAPACITY + 1),
        }
    }

    /// Advance time by `seconds` and refresh the orbital state
    ///
    /// A zero-length step leaves the environment untouched.
    pub fn evolve<P: OrbitPropagator + ?Sized>(
        &mut self,
        seconds: u64,
        propagator: &P,
    ) -> Result<()> {
        if seconds == 0 {
            return Ok(());
        }
        let next = self.current_date.add_seconds(seconds as i64);
        let state = propagator.propagate(&self.tle_data, &next)?;

        self.elapsed_timer += seconds;
        self.current_date = next;
        self.apply(&state);

        let event = format!("Mission event {}", self.elapsed_timer / seconds);
        self.log_event(event);
        Ok(())
    }

    fn apply(&mut self, state: &OrbitalState) {
        self.ground_track = Some(GroundTrack {
            lat: state.lat,
            lng: state.lng,
            alt: state.alt_km,
        });
        self.orbit_vector = Some(state.position_km);
        self.elements = Some(OrbitalElements {
            a: state.elements.semi_major_axis_km,
            e: state.elements.eccentricity,
            i: state.elements.inclination_deg,
            ra: state.elements.raan_deg,
            w: state.elements.arg_periapsis_deg,
            tp: time_since_periapsis(&state.elements),
        });
        self.sunlit = state.sunlit;
    }

    /// Append an event stamped with the current mission time, evicting the
    /// oldest entry past capacity
    pub fn log_event(&mut self, message: impl Into<String>) {
        self.log_buffer
            .push_back(EventRecord(self.current_date.to_string(), message.into()));
        while self.log_buffer.len() > EVENT_LOG_CAPACITY {
            self.log_buffer.pop_front();
        }
    }

    pub fn event_log(&self) -> &VecDeque<EventRecord> {
        &self.log_buffer
    }

    /// Mission time as Unix seconds
    pub fn unix_time(&self) -> i64 {
        self.current_date.to_unix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagator::{Elements, PropagationError};

    struct Fixed;

    impl OrbitPropagator for Fixed {
        fn propagate(&self, _: &TleData, _: &MissionTimer) -> std::result::Result<OrbitalState, PropagationError> {
            Ok(OrbitalState {
                lat: 10.0,
                lng: 20.0,
                alt_km: 500.0,
                position_km: [6878.0, 0.0, 0.0],
                elements: Elements {
                    semi_major_axis_km: 6878.0,
                    period_days: 0.0655,
                    true_anomaly_deg: 180.0,
                    ..Elements::default()
                },
                sunlit: true,
            })
        }
    }

    struct Broken;

    impl OrbitPropagator for Broken {
        fn propagate(&self, _: &TleData, _: &MissionTimer) -> std::result::Result<OrbitalState, PropagationError> {
            Err(PropagationError::Backend("no ephemeris".into()))
        }
    }

    fn env() -> Environment {
        Environment::new(
            44878,
            MissionTimer::new(2020, 11, 28, 20, 26, 16),
            TleData::new("1 x", "2 x"),
        )
    }

    #[test]
    fn test_evolve_updates_state() {
        let mut env = env();
        env.evolve(1, &Fixed).unwrap();

        assert_eq!(env.elapsed_timer, 1);
        assert_eq!(env.current_date, MissionTimer::new(2020, 11, 28, 20, 26, 17));
        assert_eq!(env.ground_track.unwrap().alt, 500.0);
        assert_eq!(env.orbit_vector, Some([6878.0, 0.0, 0.0]));
        assert!(env.sunlit);

        let tp = env.elements.unwrap().tp;
        assert!((tp - 86_400.0 * 0.0655 / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_event_log_is_bounded() {
        let mut env = env();
        for _ in 0..15 {
            env.evolve(1, &Fixed).unwrap();
        }
        let log = env.event_log();
        assert_eq!(log.len(), EVENT_LOG_CAPACITY);
        assert_eq!(log.front().unwrap().message(), "Mission event 6");
        assert_eq!(log.back().unwrap().message(), "Mission event 15");
        assert_eq!(log.back().unwrap().timestamp(), "20:26:31, 28 Nov 2020");
    }

    #[test]
    fn test_event_counter_uses_step_size() {
        let mut env = env();
        env.evolve(5, &Fixed).unwrap();
        env.evolve(5, &Fixed).unwrap();
        assert_eq!(env.event_log().back().unwrap().message(), "Mission event 2");
    }

    #[test]
    fn test_zero_step_is_a_no_op() {
        let mut env = env();
        env.evolve(0, &Fixed).unwrap();
        assert_eq!(env, self::env());
    }

    #[test]
    fn test_propagation_failure_leaves_time_alone() {
        let mut env = env();
        assert!(env.evolve(1, &Broken).is_err());
        assert_eq!(env.elapsed_timer, 0);
        assert!(env.event_log().is_empty());
    }
}
