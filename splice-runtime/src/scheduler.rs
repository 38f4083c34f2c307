//! Task scheduling by frequency code

use crate::memory::TaskSlot;
use splice_spec::{Frequency, TaskId, TaskStatus};

/// Scheduling decision for one task in one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    NotReady,
    /// Run-once task that already completed
    Finished,
    /// Nothing to schedule
    Skip,
}

/// Decide whether a loaded task runs at `vm_time` (seconds)
pub fn readiness(slot: &TaskSlot, vm_time: u64) -> Readiness {
    if slot.status == TaskStatus::NotLoaded {
        return Readiness::Skip;
    }
    let Some(frequency) = Frequency::decode(slot.task.header.frequency) else {
        return Readiness::NotReady;
    };

    match frequency {
        Frequency::Once if slot.status == TaskStatus::Completed => Readiness::Finished,
        f if f.is_due(vm_time, slot.was_run) => Readiness::Ready,
        _ => Readiness::NotReady,
    }
}

/// A task run within a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRun {
    pub id: TaskId,
    pub status: TaskStatus,
}

/// What happened during one scheduler tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// VM time after the clock advanced
    pub vm_time: u64,
    /// Tasks that ran, in scheduling order
    pub runs: Vec<TaskRun>,
    /// Tasks that were not due
    pub unready: Vec<TaskId>,
    /// Run-once tasks left untouched
    pub finished: Vec<TaskId>,
}

impl TickReport {
    pub fn new(vm_time: u64) -> Self {
        Self {
            vm_time,
            ..Self::default()
        }
    }

    pub fn ran(&self, id: TaskId) -> bool {
        self.runs.iter().any(|run| run.id == id)
    }

    /// Status a task ended with, if it ran this tick
    pub fn status_of(&self, id: TaskId) -> Option<TaskStatus> {
        self.runs.iter().find(|run| run.id == id).map(|run| run.status)
    }
}
