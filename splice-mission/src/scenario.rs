//! Scenario engine
//!
//! A scenario is a list of weighted objectives. Progress only grows: each
//! objective adds its points once, the first time it is confirmed.

use crate::payload::{ImageBox, Snapshot};
use crate::timer::MissionTimer;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    /// Image a target box
    TakePhoto,
}

/// Target of a photo objective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetBox {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    #[serde(default)]
    pub target: String,
}

impl TargetBox {
    pub fn image_box(&self) -> ImageBox {
        ImageBox {
            top: self.top,
            left: self.left,
            bottom: self.bottom,
            right: self.right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    #[serde(rename = "type")]
    pub kind: ObjectiveKind,
    pub score_points: u32,
    pub definition: TargetBox,
    #[serde(default)]
    pub completed: bool,
}

impl Objective {
    /// Whether any stored snapshot satisfies the objective
    pub fn is_met(&self, snapshots: &[Snapshot], fp_precision: f64) -> bool {
        match self.kind {
            ObjectiveKind::TakePhoto => {
                let target = self.definition.image_box();
                snapshots
                    .iter()
                    .any(|shot| shot.image_box.matches(&target, fp_precision))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialSetup {
    pub norad_id: u32,
    pub fp_precision: f64,
}

/// Scenario as authored, before any progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    pub scenario_id: u32,
    #[serde(default)]
    pub mission_name: String,
    #[serde(default)]
    pub description: String,
    pub start_date: MissionTimer,
    pub initial_setup: InitialSetup,
    pub objectives: Vec<Objective>,
}

impl ScenarioDefinition {
    pub fn validate(&self) -> Result<(), String> {
        if !self.start_date.is_valid() {
            return Err(format!("invalid start date {:?}", self.start_date));
        }
        let precision = self.initial_setup.fp_precision;
        if !(precision.is_finite() && precision > 0.0) {
            return Err(format!("fp_precision {} must be positive", precision));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub scenario_id: u32,
    pub mission_name: String,
    pub description: String,
    pub initial_setup: InitialSetup,
    pub objectives: Vec<Objective>,
    pub progress: u32,
    pub points_to_win: u32,
}

impl Scenario {
    pub fn new(definition: &ScenarioDefinition) -> Self {
        let objectives: Vec<Objective> = definition
            .objectives
            .iter()
            .cloned()
            .map(|objective| Objective {
                completed: false,
                ..objective
            })
            .collect();
        let points_to_win = objectives.iter().map(|o| o.score_points).sum();
        Self {
            scenario_id: definition.scenario_id,
            mission_name: definition.mission_name.clone(),
            description: definition.description.clone(),
            initial_setup: definition.initial_setup,
            objectives,
            progress: 0,
            points_to_win,
        }
    }

    /// Score newly met objectives; returns the points gained
    pub fn evaluate(&mut self, snapshots: &[Snapshot]) -> u32 {
        let precision = self.initial_setup.fp_precision;
        let mut gained = 0;
        for (index, objective) in self.objectives.iter_mut().enumerate() {
            if objective.completed || !objective.is_met(snapshots, precision) {
                continue;
            }
            objective.completed = true;
            gained += objective.score_points;
            info!(
                scenario = self.scenario_id,
                objective = index,
                points = objective.score_points,
                "objective completed"
            );
        }
        self.progress = self.progress.saturating_add(gained);
        gained
    }

    pub fn is_won(&self) -> bool {
        self.progress >= self.points_to_win
    }
}
