//! Task frequency codes
//!
//! ```text
//! 0x00        run once
//! 0x01-0x3B   every `code` seconds
//! 0x3C-0x76   every `code - 59` minutes
//! 0x77-0x7E   every `code - 118` hours
//! 0x7F        every tick
//! ```

use serde::{Deserialize, Serialize};

pub const FREQ_ONCE: u8 = 0x00;
pub const FREQ_1MIN: u8 = 0x3C;
pub const FREQ_HOUR: u8 = 0x77;
pub const FREQ_TMAX: u8 = 0x7F;

/// Decoded scheduling frequency
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    /// Ready on every tick
    Always,
    /// Ready until the task completes
    Once,
    /// Ready when at least this many seconds passed since the last run
    Every(u64),
}

impl Frequency {
    /// Decode a header frequency code; codes above 0x7F are invalid
    pub fn decode(code: u8) -> Option<Self> {
        match code {
            FREQ_ONCE => Some(Frequency::Once),
            0x01..=0x3B => Some(Frequency::Every(code as u64)),
            FREQ_1MIN..=0x76 => Some(Frequency::Every((code as u64 - 59) * 60)),
            FREQ_HOUR..=0x7E => Some(Frequency::Every((code as u64 - 118) * 3600)),
            FREQ_TMAX => Some(Frequency::Always),
            _ => None,
        }
    }

    /// Interval in seconds; run-once tasks have no interval
    pub fn interval(self) -> Option<u64> {
        match self {
            Frequency::Always => Some(0),
            Frequency::Once => None,
            Frequency::Every(secs) => Some(secs),
        }
    }

    /// Periodic readiness check against the VM time in seconds
    #[inline]
    pub fn is_due(self, vm_time: u64, was_run: u64) -> bool {
        match self {
            Frequency::Always | Frequency::Once => true,
            Frequency::Every(interval) => vm_time.saturating_sub(was_run) >= interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_boundaries() {
        assert_eq!(Frequency::decode(0x00), Some(Frequency::Once));
        assert_eq!(Frequency::decode(0x01), Some(Frequency::Every(1)));
        assert_eq!(Frequency::decode(0x3B), Some(Frequency::Every(59)));
        assert_eq!(Frequency::decode(0x3C), Some(Frequency::Every(60)));
        assert_eq!(Frequency::decode(0x76), Some(Frequency::Every(59 * 60)));
        assert_eq!(Frequency::decode(0x77), Some(Frequency::Every(3600)));
        assert_eq!(Frequency::decode(0x7E), Some(Frequency::Every(8 * 3600)));
        assert_eq!(Frequency::decode(0x7F), Some(Frequency::Always));
        assert_eq!(Frequency::decode(0x80), None);
    }

    #[test]
    fn test_is_due() {
        let minute = Frequency::decode(FREQ_1MIN).unwrap();
        assert!(!minute.is_due(59, 0));
        assert!(minute.is_due(60, 0));
        assert!(Frequency::Always.is_due(5, 5));
    }

    #[test]
    fn test_interval() {
        assert_eq!(Frequency::Always.interval(), Some(0));
        assert_eq!(Frequency::Once.interval(), None);
        assert_eq!(Frequency::decode(0x78).unwrap().interval(), Some(7200));
    }
}
