//! # Task Format
//!
//! A task is a sequence of 32-bit words:
//!
//! ```text
//! Index              Content
//! ─────────────────────────────────────────────
//! 0                  header [group][task][freq][offset]
//! 1 .. offset        instructions
//! offset ..          data segment (ints / float bit patterns)
//! ```
//!
//! Data addresses used by LEA and MOV are relative to `offset`, so address
//! `n` names word `offset + n`.

use crate::encoding::{pack4x8to32, unpack32to4x8};
use crate::error::SpliceError;
use crate::frequency::FREQ_TMAX;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest reachable word index is `0xFF + 0xFF`
pub const MAX_TASK_WORDS: usize = 0x1FF;

/// Task identity: `(group_id, task_id)`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId {
    pub group: u8,
    pub task: u8,
}

impl TaskId {
    pub const fn new(group: u8, task: u8) -> Self {
        Self { group, task }
    }

    /// Packed directory key; orders by group, then task
    #[inline]
    pub const fn key(self) -> u16 {
        ((self.group as u16) << 8) | self.task as u16
    }

    #[inline]
    pub const fn from_key(key: u16) -> Self {
        Self {
            group: (key >> 8) as u8,
            task: (key & 0xFF) as u8,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.task)
    }
}

/// Task header (word 0)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHeader {
    pub id: TaskId,
    /// Scheduling frequency code (0x00-0x7F)
    pub frequency: u8,
    /// Index of the first data word
    pub data_offset: u8,
}

impl TaskHeader {
    pub const fn new(group: u8, task: u8, frequency: u8, data_offset: u8) -> Self {
        Self {
            id: TaskId::new(group, task),
            frequency,
            data_offset,
        }
    }

    pub fn from_word(word: u32) -> Self {
        let [group, task, frequency, data_offset] = unpack32to4x8(word);
        Self::new(group, task, frequency, data_offset)
    }

    pub const fn to_word(&self) -> u32 {
        pack4x8to32(self.id.group, self.id.task, self.frequency, self.data_offset)
    }
}

/// Execution status of a loaded task
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// No task in memory
    NotLoaded = 0x0000_0000,
    /// Loaded, not executed yet
    LoadedOk = 0x0000_001F,
    /// Bad opcode or operand
    ErrorOpcode = 0x0000_003F,
    /// Condition not met, either a CMP or the frequency check
    ConditionUnmet = 0x0000_007F,
    /// Completed ok
    Completed = 0x0000_00FF,
}

impl TaskStatus {
    #[inline]
    pub const fn code(self) -> u32 {
        self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0x00 => Some(TaskStatus::NotLoaded),
            0x1F => Some(TaskStatus::LoadedOk),
            0x3F => Some(TaskStatus::ErrorOpcode),
            0x7F => Some(TaskStatus::ConditionUnmet),
            0xFF => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// An assembled task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub header: TaskHeader,
    /// All words, header included
    pub words: Vec<u32>,
}

impl Task {
    /// Build a task from raw words, validating the header
    pub fn from_words(words: Vec<u32>) -> Result<Self, SpliceError> {
        let first = *words.first().ok_or(SpliceError::EmptyTask)?;
        let header = TaskHeader::from_word(first);
        let task = Self { header, words };
        task.validate()?;
        Ok(task)
    }

    /// Check the header invariants against the task body
    pub fn validate(&self) -> Result<(), SpliceError> {
        if self.words.is_empty() {
            return Err(SpliceError::EmptyTask);
        }
        if self.words.len() > MAX_TASK_WORDS {
            return Err(SpliceError::TaskTooLong {
                len: self.words.len(),
                max: MAX_TASK_WORDS,
            });
        }
        if self.header.frequency > FREQ_TMAX {
            return Err(SpliceError::InvalidFrequency(self.header.frequency));
        }
        let offset = self.header.data_offset as usize;
        if offset == 0 || offset > self.words.len() {
            return Err(SpliceError::InvalidDataOffset {
                offset: self.header.data_offset,
                len: self.words.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn id(&self) -> TaskId {
        self.header.id
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Executable words (between the header and the data segment)
    pub fn code(&self) -> &[u32] {
        let end = (self.header.data_offset as usize).max(1);
        &self.words[1.min(self.words.len())..end.min(self.words.len())]
    }

    /// Data segment words
    pub fn data(&self) -> &[u32] {
        let start = (self.header.data_offset as usize).min(self.words.len());
        &self.words[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::pack_float;

    fn sample_words() -> Vec<u32> {
        vec![
            TaskHeader::new(1, 1, 10, 3).to_word(),
            0x0000_0000,
            0x0700_0000,
            pack_float(1.0),
            pack_float(2.0),
        ]
    }

    #[test]
    fn test_header_round_trip() {
        let header = TaskHeader::new(1, 2, 0x3C, 7);
        assert_eq!(header.to_word(), 0x0102_3C07);
        assert_eq!(TaskHeader::from_word(0x0102_3C07), header);
    }

    #[test]
    fn test_task_segments() {
        let task = Task::from_words(sample_words()).unwrap();
        assert_eq!(task.id(), TaskId::new(1, 1));
        assert_eq!(task.code().len(), 2);
        assert_eq!(task.data(), &[pack_float(1.0), pack_float(2.0)]);
    }

    #[test]
    fn test_offset_beyond_length_rejected() {
        let words = vec![TaskHeader::new(1, 1, 10, 9).to_word(), 0];
        assert_eq!(
            Task::from_words(words),
            Err(SpliceError::InvalidDataOffset { offset: 9, len: 2 })
        );
    }

    #[test]
    fn test_offset_into_header_rejected() {
        let words = vec![TaskHeader::new(1, 1, 10, 0).to_word(), 0x0700_0000];
        assert_eq!(
            Task::from_words(words),
            Err(SpliceError::InvalidDataOffset { offset: 0, len: 2 })
        );
    }

    #[test]
    fn test_frequency_out_of_range_rejected() {
        let words = vec![TaskHeader::new(1, 1, 0x80, 1).to_word()];
        assert_eq!(Task::from_words(words), Err(SpliceError::InvalidFrequency(0x80)));
    }

    #[test]
    fn test_empty_task_rejected() {
        assert_eq!(Task::from_words(vec![]), Err(SpliceError::EmptyTask));
    }

    #[test]
    fn test_task_id_ordering() {
        let mut ids = vec![TaskId::new(2, 1), TaskId::new(1, 2), TaskId::new(1, 1)];
        ids.sort();
        assert_eq!(ids, vec![TaskId::new(1, 1), TaskId::new(1, 2), TaskId::new(2, 1)]);
        assert_eq!(TaskId::from_key(TaskId::new(3, 4).key()), TaskId::new(3, 4));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(TaskStatus::Completed.code(), 0xFF);
        assert_eq!(TaskStatus::from_code(0x7F), Some(TaskStatus::ConditionUnmet));
        assert_eq!(TaskStatus::from_code(0x01), None);
    }
}
