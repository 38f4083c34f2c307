//! Mission state and the simulator API
//!
//! A [`Mission`] is plain data: environment, satellite and scenario. The
//! [`MissionSimulator`] owns only the propagator and moves a mission
//! through each call, one simulated second per step.

use crate::adcs::Adcs;
use crate::bus::DataBus;
use crate::config::{MissionConfig, SatelliteConfig};
use crate::environment::Environment;
use crate::error::{MissionError, Result};
use crate::obdh::Obdh;
use crate::payload::{Instruments, Snapshot};
use crate::propagator::OrbitPropagator;
use crate::scenario::{Scenario, ScenarioDefinition};
use crate::timer::MissionTimer;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use splice_spec::{ImageFormat, TaskId, VmConfig};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

// ========== Telemetry ==========

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerTelemetry {
    pub battery_level: f64,
    pub battery_input: f64,
    pub battery_output: f64,
    pub solar_panel_output: f64,
}

impl Default for PowerTelemetry {
    fn default() -> Self {
        Self {
            battery_level: 100.0,
            battery_input: 0.0,
            battery_output: 0.0,
            solar_panel_output: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdcsTelemetry {
    pub gyro_rpm: f64,
    pub attitude_mode: String,
    pub adcs_status: String,
    pub adcs_vectors: Vec<[f32; 3]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObdhTelemetry {
    pub obdh_status: String,
    pub cpu_load: f64,
    pub storage_capacity: f64,
    pub tasks_running: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThermalTelemetry {
    pub chassis_temp: f64,
    pub solar_panel_temp: f64,
    pub obdh_board_temp: f64,
    pub battery_temp: f64,
}

/// Housekeeping values of the satellite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatelliteTelemetry {
    pub power: PowerTelemetry,
    pub adcs: AdcsTelemetry,
    pub obdh: ObdhTelemetry,
    pub thermal: ThermalTelemetry,
}

impl Default for SatelliteTelemetry {
    fn default() -> Self {
        Self {
            power: PowerTelemetry::default(),
            adcs: AdcsTelemetry {
                gyro_rpm: 0.0,
                attitude_mode: "UNSET".to_string(),
                adcs_status: "OK".to_string(),
                adcs_vectors: Vec::new(),
            },
            obdh: ObdhTelemetry {
                obdh_status: "OK".to_string(),
                cpu_load: 0.0,
                storage_capacity: 100.0,
                tasks_running: Vec::new(),
            },
            thermal: ThermalTelemetry::default(),
        }
    }
}

/// One displayable telemetry value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryEntry {
    pub name: String,
    pub value: String,
}

/// Numbered entries per group, `"1"`, `"2"`, ...
pub type TelemetryGroup = BTreeMap<String, TelemetryEntry>;

/// Telemetry laid out for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedTelemetry {
    pub status: String,
    pub power: TelemetryGroup,
    pub thermal: TelemetryGroup,
    pub obdh: TelemetryGroup,
    pub adcs: TelemetryGroup,
}

fn group<const N: usize>(entries: [(&str, String); N]) -> TelemetryGroup {
    entries
        .into_iter()
        .enumerate()
        .map(|(i, (name, value))| {
            (
                (i + 1).to_string(),
                TelemetryEntry {
                    name: name.to_string(),
                    value,
                },
            )
        })
        .collect()
}

impl FormattedTelemetry {
    pub fn new(t: &SatelliteTelemetry) -> Self {
        Self {
            status: "ok".to_string(),
            power: group([
                ("battery_level", t.power.battery_level.to_string()),
                ("battery_output", t.power.battery_output.to_string()),
                ("battery_input", t.power.battery_input.to_string()),
                ("solar_panel_output", t.power.solar_panel_output.to_string()),
            ]),
            thermal: group([
                ("chassis_temp", t.thermal.chassis_temp.to_string()),
                ("solar_panel_temp", t.thermal.solar_panel_temp.to_string()),
                ("obdh_board_temp", t.thermal.obdh_board_temp.to_string()),
                ("battery_temp", t.thermal.battery_temp.to_string()),
            ]),
            obdh: group([
                ("obdh_status", t.obdh.obdh_status.clone()),
                ("cpu_load", t.obdh.cpu_load.to_string()),
                ("storage_capacity", t.obdh.storage_capacity.to_string()),
                ("tasks_running", t.obdh.tasks_running.join(", ")),
            ]),
            adcs: group([
                ("gyro_rpm", t.adcs.gyro_rpm.to_string()),
                ("attitude_mode", t.adcs.attitude_mode.clone()),
                ("adcs_status", t.adcs.adcs_status.clone()),
                ("adcs_vectors", format!("{:?}", t.adcs.adcs_vectors)),
            ]),
        }
    }
}

/// Position report of the satellite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatellitePosition {
    pub time: String,
    pub lat: f64,
    pub lng: f64,
    pub alt: f64,
    pub a: f64,
    pub e: f64,
    pub i: f64,
    pub ra: f64,
    pub w: f64,
    pub tp: f64,
    pub status: String,
}

impl SatellitePosition {
    /// `None` until the environment has been propagated once
    pub fn from_environment(env: &Environment) -> Option<Self> {
        let track = env.ground_track?;
        let elements = env.elements?;
        Some(Self {
            time: env.current_date.to_string(),
            lat: track.lat,
            lng: track.lng,
            alt: track.alt,
            a: elements.a,
            e: elements.e,
            i: elements.i,
            ra: elements.ra,
            w: elements.w,
            tp: elements.tp,
            status: "ok".to_string(),
        })
    }
}

// ========== Satellite ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsystems {
    pub adcs: Adcs,
    pub obdh: Obdh,
    pub dbus: DataBus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Satellite {
    pub instruments: Instruments,
    pub subsystems: Subsystems,
    pub telemetry: SatelliteTelemetry,
    pub location: Option<SatellitePosition>,
    pub formatted_telemetry: Option<FormattedTelemetry>,
}

impl Satellite {
    pub fn new(config: &SatelliteConfig, vm: VmConfig) -> Result<Self> {
        Ok(Self {
            instruments: Instruments::new(&config.instruments),
            subsystems: Subsystems {
                adcs: Adcs::new(),
                obdh: Obdh::new(vm)?,
                dbus: DataBus::new(),
            },
            telemetry: SatelliteTelemetry::default(),
            location: None,
            formatted_telemetry: None,
        })
    }

    /// One second of satellite time after the environment has moved
    fn evolve(&mut self, env: &Environment) -> Result<()> {
        self.location = SatellitePosition::from_environment(env);
        self.formatted_telemetry = Some(FormattedTelemetry::new(&self.telemetry));

        let timestamp = env.current_date.to_string();
        let Subsystems { adcs, obdh, dbus } = &mut self.subsystems;

        adcs.step(1, env, dbus);
        self.instruments
            .imager
            .step(env.ground_track.as_ref(), &timestamp, dbus);
        obdh.step(dbus, env.unix_time())?;

        self.telemetry.adcs.attitude_mode = adcs.mode().name().to_string();
        self.telemetry.adcs.adcs_vectors = vec![adcs.imu.sun];
        self.telemetry.obdh.tasks_running = obdh.tasks_running().to_vec();
        Ok(())
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.instruments.imager.buffer
    }
}

// ========== Mission ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub environment: Environment,
    pub satellite: Satellite,
    pub scenario: Scenario,
}

impl Mission {
    pub fn progress(&self) -> u32 {
        self.scenario.progress
    }

    pub fn is_won(&self) -> bool {
        self.scenario.is_won()
    }

    /// VM log lines posted to the satellite bus
    pub fn vm_log(&self) -> impl Iterator<Item = &str> {
        self.satellite.subsystems.dbus.log.iter().map(String::as_str)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// SHA-256 of the JSON snapshot, lowercase hex
    pub fn hash_id(&self) -> Result<String> {
        Ok(sha256_hex(self.to_json()?.as_bytes()))
    }

    /// Restore a snapshot whose hash must equal `expected`
    pub fn from_json_verified(json: &str, expected: &str) -> Result<Self> {
        let actual = sha256_hex(json.as_bytes());
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(MissionError::HashMismatch {
                expected: expected.to_string(),
                actual,
            });
        }
        Self::from_json(json)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Operator actions on a running mission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissionAction {
    TakePhoto,
}

impl MissionAction {
    pub const fn name(self) -> &'static str {
        match self {
            MissionAction::TakePhoto => "take_photo",
        }
    }
}

impl FromStr for MissionAction {
    type Err = MissionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "take_photo" => Ok(MissionAction::TakePhoto),
            other => Err(MissionError::UnknownAction(other.to_string())),
        }
    }
}

impl fmt::Display for MissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ========== Simulator ==========

pub struct MissionSimulator<P> {
    propagator: P,
}

impl<P: OrbitPropagator> MissionSimulator<P> {
    pub fn new(propagator: P) -> Self {
        Self { propagator }
    }

    pub fn propagator(&self) -> &P {
        &self.propagator
    }

    /// Build a mission starting at `start`, with VM defaults and the
    /// scenario's float precision
    pub fn create_mission(
        &self,
        satellite: &SatelliteConfig,
        scenario: &ScenarioDefinition,
        start: MissionTimer,
    ) -> Result<Mission> {
        let vm = VmConfig {
            fp_precision: scenario.initial_setup.fp_precision as f32,
            ..VmConfig::DEFAULT
        };
        self.create_mission_with(satellite, scenario, start, vm)
    }

    pub fn create_mission_with(
        &self,
        satellite: &SatelliteConfig,
        scenario: &ScenarioDefinition,
        start: MissionTimer,
        vm: VmConfig,
    ) -> Result<Mission> {
        satellite.validate()?;
        scenario.validate().map_err(MissionError::Config)?;
        if !start.is_valid() {
            return Err(MissionError::Config(format!("invalid start date {:?}", start)));
        }

        let mission = Mission {
            environment: Environment::new(satellite.norad_id, start, satellite.tle.clone()),
            satellite: Satellite::new(satellite, vm)?,
            scenario: Scenario::new(scenario),
        };
        info!(
            norad_id = satellite.norad_id,
            scenario = scenario.scenario_id,
            start = %start,
            points_to_win = mission.scenario.points_to_win,
            "mission created"
        );
        Ok(mission)
    }

    /// Build a mission from a config document, starting at the scenario's
    /// start date
    pub fn create_from_config(&self, config: &MissionConfig) -> Result<Mission> {
        let scenario = config.scenario()?;
        self.create_mission_with(
            &config.satellite,
            scenario,
            scenario.start_date,
            config.vm_config(),
        )
    }

    /// Advance the mission by `seconds`, one second at a time
    pub fn simulate_steps(&self, mut mission: Mission, seconds: u64) -> Result<Mission> {
        for _ in 0..seconds {
            self.step(&mut mission)?;
        }
        Ok(mission)
    }

    fn step(&self, mission: &mut Mission) -> Result<()> {
        mission.environment.evolve(1, &self.propagator)?;
        mission.satellite.evolve(&mission.environment)?;
        mission
            .scenario
            .evaluate(&mission.satellite.instruments.imager.buffer);
        debug!(
            elapsed = mission.environment.elapsed_timer,
            progress = mission.scenario.progress,
            "mission step"
        );
        Ok(())
    }

    /// Assemble a task and install it on the OBDH
    pub fn load_task<S: AsRef<str>>(&self, mut mission: Mission, lines: &[S]) -> Result<Mission> {
        let id: TaskId = mission.satellite.subsystems.obdh.load_task(lines)?;
        mission
            .environment
            .log_event(format!("Task {} uploaded", id));
        Ok(mission)
    }

    /// Run a named operator action
    ///
    /// Progress from the action is scored on the next step.
    pub fn execute_action(&self, mut mission: Mission, action_name: &str) -> Result<Mission> {
        match action_name.parse::<MissionAction>()? {
            MissionAction::TakePhoto => {
                let timestamp = mission.environment.current_date.to_string();
                let imager = &mut mission.satellite.instruments.imager;
                if imager.take_snapshot(&timestamp, ImageFormat::Png).is_some() {
                    mission.environment.log_event("Snapshot taken");
                }
            }
        }
        Ok(mission)
    }
}
