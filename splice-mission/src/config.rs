//! Mission configuration
//!
//! A mission is described by one JSON document:
//!
//! ```json
//! {
//!   "satellite": {
//!     "norad_id": 44878,
//!     "tle": { "line_1": "...", "line_2": "..." },
//!     "instruments": { "imager": { "fov": 1.6, "d": 0.01, "f": 0.5, "sensor": [4096, 3072], "pixel": 3.2e-6 } }
//!   },
//!   "scenario": { "scenario_id": 1, "start_date": { ... }, "initial_setup": { ... }, "objectives": [ ... ] },
//!   "vm": { "timeslice": 1 }
//! }
//! ```
//!
//! `scenario` and `vm` are optional; missing VM fields take their defaults.

use crate::error::{MissionError, Result};
use crate::payload::InstrumentConfig;
use crate::propagator::TleData;
use crate::scenario::ScenarioDefinition;
use serde::{Deserialize, Serialize};
use splice_spec::VmConfig;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatelliteConfig {
    pub norad_id: u32,
    pub tle: TleData,
    #[serde(default)]
    pub instruments: InstrumentConfig,
}

impl SatelliteConfig {
    /// Check the TLE against the catalog number and the instruments against
    /// their physical ranges
    pub fn validate(&self) -> Result<()> {
        let mean = self
            .tle
            .mean_elements()
            .map_err(|e| MissionError::InvalidTle(e.to_string()))?;
        if mean.catalog_number != self.norad_id {
            return Err(MissionError::InvalidTle(format!(
                "catalog number {} does not match NORAD id {}",
                mean.catalog_number, self.norad_id
            )));
        }
        self.instruments.imager.validate().map_err(MissionError::Config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionConfig {
    pub satellite: SatelliteConfig,
    #[serde(default)]
    pub scenario: Option<ScenarioDefinition>,
    #[serde(default)]
    pub vm: Option<VmConfig>,
}

impl MissionConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading mission config");
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.satellite.validate()?;
        if let Some(scenario) = &self.scenario {
            scenario.validate().map_err(MissionError::Config)?;
            if scenario.initial_setup.norad_id != self.satellite.norad_id {
                return Err(MissionError::Config(format!(
                    "scenario expects NORAD id {}, satellite is {}",
                    scenario.initial_setup.norad_id, self.satellite.norad_id
                )));
            }
        }
        if let Some(vm) = &self.vm {
            vm.validate()
                .map_err(|e| MissionError::Config(e.to_string()))?;
        }
        Ok(())
    }

    /// The scenario, which a mission cannot start without
    pub fn scenario(&self) -> Result<&ScenarioDefinition> {
        self.scenario.as_ref().ok_or(MissionError::MissingScenario)
    }

    /// VM settings: the explicit `vm` section, or defaults with the
    /// scenario's float precision
    pub fn vm_config(&self) -> VmConfig {
        match (&self.vm, &self.scenario) {
            (Some(vm), _) => *vm,
            (None, Some(scenario)) => VmConfig {
                fp_precision: scenario.initial_setup.fp_precision as f32,
                ..VmConfig::DEFAULT
            },
            (None, None) => VmConfig::DEFAULT,
        }
    }
}
