//! Satellite data bus
//!
//! Each instrument port carries an `out` readout written by its subsystem
//! and, where the instrument takes commands, a FIFO queue filled from the
//! VM outbox. Consumers take the whole queue into a local buffer before
//! processing it.

use serde::{Deserialize, Serialize};
use splice_runtime::Outbox;
use splice_spec::{AdcsCommand, AdcsReadout, GpsReadout, ImagerCommand, ImagerReadout, Telemetry};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port<O, C> {
    pub out: O,
    pub queue: VecDeque<C>,
}

impl<O: Default, C> Default for Port<O, C> {
    fn default() -> Self {
        Self {
            out: O::default(),
            queue: VecDeque::new(),
        }
    }
}

impl<O, C> Port<O, C> {
    /// Take every queued command, oldest first
    pub fn take_queue(&mut self) -> Vec<C> {
        self.queue.drain(..).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataBus {
    pub adc: Port<AdcsReadout, AdcsCommand>,
    pub gps: GpsReadout,
    pub img: Port<ImagerReadout, ImagerCommand>,
    /// VM log lines, oldest first
    pub log: VecDeque<String>,
}

impl DataBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every readout for the VM mirror
    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            adcs: self.adc.out,
            gps: self.gps,
            imager: self.img.out,
        }
    }

    /// Route the VM outbox onto the command queues and the log port
    ///
    /// The log port keeps at most `log_capacity` lines.
    pub fn post(&mut self, outbox: Outbox, log_capacity: usize) {
        self.adc.queue.extend(outbox.adcs);
        self.img.queue.extend(outbox.imager);
        self.log.extend(outbox.log);
        let excess = self.log.len().saturating_sub(log_capacity.max(1));
        self.log.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splice_spec::{AdcsMode, ImageFormat};

    #[test]
    fn test_post_routes_outbox() {
        let mut bus = DataBus::new();
        let mut outbox = Outbox::default();
        outbox.adcs.push(AdcsCommand::SetMode {
            mode: AdcsMode::Nadir,
            duration: 10,
        });
        outbox.imager.push(ImagerCommand::Snapshot {
            format: ImageFormat::Jpg,
        });
        outbox.log.push_back("1:1:42".into());

        bus.post(outbox, 8);
        assert_eq!(bus.adc.queue.len(), 1);
        assert_eq!(bus.img.queue.len(), 1);
        assert_eq!(bus.log, ["1:1:42"]);
    }

    #[test]
    fn test_log_port_is_bounded() {
        let mut bus = DataBus::new();
        for i in 0..4 {
            let mut outbox = Outbox::default();
            outbox.log.push_back(format!("line {}", i));
            bus.post(outbox, 3);
        }
        assert_eq!(bus.log, ["line 1", "line 2", "line 3"]);
    }

    #[test]
    fn test_take_queue_preserves_order() {
        let mut bus = DataBus::new();
        bus.img.queue.push_back(ImagerCommand::SetExposure(2.0));
        bus.img.queue.push_back(ImagerCommand::Snapshot {
            format: ImageFormat::Raw,
        });

        let buffer = bus.img.take_queue();
        assert_eq!(buffer[0], ImagerCommand::SetExposure(2.0));
        assert!(bus.img.queue.is_empty());
    }

    #[test]
    fn test_telemetry_mirrors_readouts() {
        let mut bus = DataBus::new();
        bus.gps.lat = 26.2;
        bus.adc.out.mode = AdcsMode::ToSun;
        let telemetry = bus.telemetry();
        assert_eq!(telemetry.gps.lat, 26.2);
        assert_eq!(telemetry.adcs.mode, AdcsMode::ToSun);
    }
}
