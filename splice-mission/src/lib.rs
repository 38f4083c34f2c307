//! # SPLICE Mission Simulator
//!
//! Step a spacecraft mission one second at a time: orbit and environment,
//! satellite subsystems around the SPLICE VM, and scenario scoring.
//!
//! ## Features
//!
//! - **Environment**: mission clock, pluggable orbit propagator, rolling event log
//! - **Subsystems**: ADCS mode stack, imager footprint and snapshots, OBDH hosting the VM
//! - **Data bus**: readouts mirrored into the VM, command queues drained by subsystems
//! - **Scenario**: weighted objectives, monotonic progress
//! - **Snapshots**: JSON with SHA-256 verification, compact bincode
//!
//! ## Example
//!
//! ```rust
//! use splice_mission::{
//!     CircularOrbit, InitialSetup, InstrumentConfig, MissionSimulator, MissionTimer,
//!     SatelliteConfig, ScenarioDefinition, TleData,
//! };
//!
//! let satellite = SatelliteConfig {
//!     norad_id: 44878,
//!     tle: TleData::new(
//!         "1 44878U 19092F   20351.51834954  .00001625  00000-0  87961-4 0  9991",
//!         "2 44878  97.4685 171.7951 0015492  85.6297 274.6705 15.15948331 55114",
//!     ),
//!     instruments: InstrumentConfig::default(),
//! };
//! let scenario = ScenarioDefinition {
//!     scenario_id: 0,
//!     mission_name: "free flight".into(),
//!     description: String::new(),
//!     start_date: MissionTimer::new(2020, 11, 28, 20, 26, 16),
//!     initial_setup: InitialSetup { norad_id: 44878, fp_precision: 0.001 },
//!     objectives: vec![],
//! };
//!
//! let sim = MissionSimulator::new(CircularOrbit);
//! let mission = sim
//!     .create_mission(&satellite, &scenario, scenario.start_date)
//!     .unwrap();
//! let mission = sim.simulate_steps(mission, 10).unwrap();
//! assert_eq!(mission.environment.elapsed_timer, 10);
//! ```

pub mod error;
pub mod timer;
pub mod astro;
pub mod propagator;
pub mod environment;
pub mod bus;
pub mod adcs;
pub mod payload;
pub mod obdh;
pub mod scenario;
pub mod config;
pub mod mission;

pub use adcs::{Adcs, Imu, ModeEntry};
pub use bus::{DataBus, Port};
pub use config::{MissionConfig, SatelliteConfig};
pub use environment::{Environment, EventRecord, GroundTrack, OrbitalElements, EVENT_LOG_CAPACITY};
pub use error::{MissionError, Result};
pub use mission::{
    FormattedTelemetry, Mission, MissionAction, MissionSimulator, Satellite, SatellitePosition,
    SatelliteTelemetry, Subsystems, TelemetryEntry,
};
pub use obdh::Obdh;
pub use payload::{
    calculate_camera_fov, calculate_camera_gsd, calculate_swath, get_imager_frame, ImageBox,
    Imager, ImagerConfig, InstrumentConfig, Instruments, Snapshot,
};
pub use propagator::{
    CircularOrbit, Elements, MeanElements, OrbitPropagator, OrbitalState, PropagationError,
    TleData,
};
pub use scenario::{
    InitialSetup, Objective, ObjectiveKind, Scenario, ScenarioDefinition, TargetBox,
};
pub use timer::MissionTimer;
