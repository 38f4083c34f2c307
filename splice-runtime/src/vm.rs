//! Virtual Machine for SPLICE tasks

use crate::bus::{Outbox, VBus};
use crate::error::{Result, RuntimeError};
use crate::execute::{execute, ExecContext, ExecStatus};
use crate::memory::TaskMemory;
use crate::scheduler::{readiness, Readiness, TaskRun, TickReport};
use crate::state::VmState;
use serde::{Deserialize, Serialize};
use splice_disassembler::{decode, DisassemblerError};
use splice_spec::{LogLevel, Task, TaskId, TaskStatus, Telemetry, VmConfig};
use tracing::{debug, info, trace, warn};

/// SPLICE virtual machine
///
/// The whole VM is plain data so it can travel inside a mission snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vm {
    /// Registers, clocks, live settings
    state: VmState,

    /// Loaded tasks
    memory: TaskMemory,

    /// Telemetry mirror and outbox
    bus: VBus,
}

impl Vm {
    pub fn new(config: VmConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: VmState::new(config),
            memory: TaskMemory::new(),
            bus: VBus::new(),
        })
    }

    pub fn state(&self) -> &VmState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut VmState {
        &mut self.state
    }

    pub fn memory(&self) -> &TaskMemory {
        &self.memory
    }

    pub fn bus(&self) -> &VBus {
        &self.bus
    }

    /// Live configuration (bytecode may have changed it)
    pub fn config(&self) -> &VmConfig {
        &self.state.config
    }

    /// VM time in seconds
    pub fn vm_time(&self) -> u64 {
        self.state.vm_time()
    }

    pub fn set_nmf_clock(&mut self, unix_secs: i64) {
        self.state.nmf_clock = unix_secs;
    }

    /// Install a task, replacing any task with the same id
    pub fn load_task(&mut self, task: Task) -> Result<TaskId> {
        let id = task.id();
        let words = task.len();
        self.memory.load(task)?;
        info!(task = %id, words, "task loaded");
        Ok(id)
    }

    /// Validate and install raw words
    pub fn load_words(&mut self, words: Vec<u32>) -> Result<TaskId> {
        let task = Task::from_words(words)?;
        self.load_task(task)
    }

    pub fn task_status(&self, id: TaskId) -> TaskStatus {
        self.memory.status(id)
    }

    /// Refresh the telemetry mirror read by GET
    pub fn sync_telemetry(&mut self, telemetry: Telemetry) {
        self.bus.sync(telemetry);
    }

    /// Hand the commands and log lines of the last tick to the host
    pub fn drain_outbox(&mut self) -> Outbox {
        self.bus.drain()
    }

    /// Advance the clock one timeslice and run every due task
    pub fn tick(&mut self) -> Result<TickReport> {
        self.state.advance_clock();
        let now = self.state.vm_time();
        debug!(vm_time = now, tasks = self.memory.len(), "scheduler tick");

        let mut report = TickReport::new(now);
        for id in self.memory.ids() {
            let decision = match self.memory.get(id) {
                Some(slot) => readiness(slot, now),
                None => continue,
            };

            match decision {
                Readiness::Skip => {}
                Readiness::Finished => report.finished.push(id),
                Readiness::NotReady => {
                    if let Some(slot) = self.memory.get_mut(id) {
                        slot.status = TaskStatus::ConditionUnmet;
                    }
                    report.unready.push(id);
                }
                Readiness::Ready => {
                    let status = self.run_task(id)?;
                    report.runs.push(TaskRun { id, status });
                }
            }
        }

        Ok(report)
    }

    /// Run a task from its first instruction, ignoring its frequency
    ///
    /// The task's status and last-run time are updated.
    pub fn run_task(&mut self, id: TaskId) -> Result<TaskStatus> {
        let status = self.execute_task(id)?;
        let now = self.state.vm_time();
        let slot = self
            .memory
            .get_mut(id)
            .ok_or_else(|| RuntimeError::not_loaded(id))?;
        slot.status = status;
        slot.was_run = now;
        debug!(task = %id, vm_time = now, ?status, "task run");
        Ok(status)
    }

    fn execute_task(&mut self, id: TaskId) -> Result<TaskStatus> {
        let offset = self
            .memory
            .get(id)
            .ok_or_else(|| RuntimeError::not_loaded(id))?
            .task
            .header
            .data_offset as usize;

        let mut index = 1;
        loop {
            // reaching the data segment ends the run
            if index >= offset {
                return Ok(TaskStatus::Completed);
            }
            let Some(word) = self.memory.word(id, index)? else {
                return Ok(TaskStatus::Completed);
            };

            let outcome = match decode(word) {
                Ok(instr) => {
                    trace!(task = %id, index, ?instr, "execute");
                    let mut ctx = ExecContext {
                        state: &mut self.state,
                        memory: &mut self.memory,
                        bus: &mut self.bus,
                        current: id,
                    };
                    execute(&instr, &mut ctx)?
                }
                Err(DisassemblerError::UnknownOpcode(op)) => ExecStatus::UnknownOpcode(op),
                Err(DisassemblerError::BadOperand { reason, .. }) => ExecStatus::BadOperand(reason),
            };

            match outcome {
                ExecStatus::Fine => index += 1,
                ExecStatus::Halt => return Ok(TaskStatus::Completed),
                ExecStatus::CheckFalse => {
                    self.log(
                        LogLevel::Info,
                        format!("{}:INFO condition unmet at {}", id, index),
                    );
                    return Ok(TaskStatus::ConditionUnmet);
                }
                ExecStatus::BadOperand(_) | ExecStatus::UnknownOpcode(_) => {
                    warn!(task = %id, index, word, ?outcome, "task fault");
                    self.log(
                        LogLevel::Error,
                        format!("{}:ERROR {} at {}", id, outcome.kind(), index),
                    );
                    return Ok(TaskStatus::ErrorOpcode);
                }
            }
        }
    }

    fn log(&mut self, level: LogLevel, line: String) {
        let config = &self.state.config;
        if config.log_level.allows(level) {
            self.bus.push_log(line, config.max_log_lines);
        }
    }
}
