//! On-board data handling
//!
//! Hosts the SPLICE VM. Each step mirrors the data bus into the VM, runs
//! one scheduler tick and routes the VM outbox back onto the bus.

use crate::bus::DataBus;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use splice_assembler::assemble;
use splice_runtime::{TickReport, Vm};
use splice_spec::{TaskId, VmConfig};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obdh {
    vm: Vm,
    /// Tasks that ran in the last step, as `group:task`
    tasks_running: Vec<String>,
}

impl Obdh {
    pub fn new(config: VmConfig) -> Result<Self> {
        Ok(Self {
            vm: Vm::new(config)?,
            tasks_running: Vec::new(),
        })
    }

    pub fn vm(&self) -> &Vm {
        &self.vm
    }

    pub fn vm_mut(&mut self) -> &mut Vm {
        &mut self.vm
    }

    pub fn tasks_running(&self) -> &[String] {
        &self.tasks_running
    }

    /// Assemble source lines and install the task
    pub fn load_task<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<TaskId> {
        let task = assemble(lines)?;
        Ok(self.vm.load_task(task)?)
    }

    pub fn step(&mut self, bus: &mut DataBus, unix_time: i64) -> Result<TickReport> {
        self.vm.set_nmf_clock(unix_time);
        self.vm.sync_telemetry(bus.telemetry());

        let report = self.vm.tick()?;
        let outbox = self.vm.drain_outbox();
        debug!(
            vm_time = report.vm_time,
            ran = report.runs.len(),
            commands = outbox.adcs.len() + outbox.imager.len(),
            lines = outbox.log.len(),
            "OBDH step"
        );
        bus.post(outbox, self.vm.config().max_log_lines);

        self.tasks_running = report.runs.iter().map(|run| run.id.to_string()).collect();
        Ok(report)
    }
}
