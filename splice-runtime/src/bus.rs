//! VM side of the satellite bus
//!
//! GET reads from a telemetry mirror that is refreshed once per tick, so a
//! task sees one consistent snapshot for its whole run. SET, ACT and STR
//! write into an outbox that the host drains after the tick.

use serde::{Deserialize, Serialize};
use splice_spec::{AdcsCommand, ImagerCommand, Telemetry};
use std::collections::VecDeque;

/// Everything the VM produced during a tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outbox {
    pub adcs: Vec<AdcsCommand>,
    pub imager: Vec<ImagerCommand>,
    pub log: VecDeque<String>,
}

impl Outbox {
    pub fn is_empty(&self) -> bool {
        self.adcs.is_empty() && self.imager.is_empty() && self.log.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VBus {
    telemetry: Telemetry,
    outbox: Outbox,
    /// Log lines evicted because the queue was full
    dropped_lines: u64,
}

impl VBus {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub fn sync(&mut self, telemetry: Telemetry) {
        self.telemetry = telemetry;
    }

    pub fn push_adcs(&mut self, command: AdcsCommand) {
        self.outbox.adcs.push(command);
    }

    pub fn push_imager(&mut self, command: ImagerCommand) {
        self.outbox.imager.push(command);
    }

    /// Append a log line, evicting the oldest once `capacity` is reached
    pub fn push_log(&mut self, line: String, capacity: usize) {
        while self.outbox.log.len() >= capacity.max(1) {
            self.outbox.log.pop_front();
            self.dropped_lines += 1;
        }
        self.outbox.log.push_back(line);
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    pub fn dropped_lines(&self) -> u64 {
        self.dropped_lines
    }

    /// Take the outbox, leaving an empty one behind
    pub fn drain(&mut self) -> Outbox {
        std::mem::take(&mut self.outbox)
    }
}
