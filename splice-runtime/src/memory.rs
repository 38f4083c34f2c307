//! Task memory
//!
//! Loaded tasks live in a flat arena. A directory keyed by
//! `(group << 8) | task` maps task ids to arena slots and fixes the
//! scheduling order.

use crate::error::{Result, RuntimeError};
use serde::{Deserialize, Serialize};
use splice_spec::{Task, TaskId, TaskStatus};
use std::collections::BTreeMap;

/// A loaded task with its execution context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSlot {
    pub task: Task,
    pub status: TaskStatus,
    /// VM time (seconds) of the last run
    pub was_run: u64,
}

impl TaskSlot {
    fn new(task: Task) -> Self {
        Self {
            task,
            status: TaskStatus::LoadedOk,
            was_run: 0,
        }
    }

    /// Word index of a data address, if it falls inside the task
    #[inline]
    pub fn data_index(&self, address: usize) -> Option<usize> {
        let index = address.checked_add(self.task.header.data_offset as usize)?;
        (index < self.task.words.len()).then_some(index)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMemory {
    slots: Vec<TaskSlot>,
    directory: BTreeMap<u16, usize>,
}

impl TaskMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a task; reloading an id replaces its words and resets its
    /// context
    pub fn load(&mut self, task: Task) -> Result<()> {
        task.validate()?;
        let key = task.id().key();
        match self.directory.get(&key) {
            Some(&index) => self.slots[index] = TaskSlot::new(task),
            None => {
                self.directory.insert(key, self.slots.len());
                self.slots.push(TaskSlot::new(task));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: TaskId) -> bool {
        self.directory.contains_key(&id.key())
    }

    pub fn get(&self, id: TaskId) -> Option<&TaskSlot> {
        self.directory.get(&id.key()).map(|&i| &self.slots[i])
    }

    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut TaskSlot> {
        self.directory.get(&id.key()).map(|&i| &mut self.slots[i])
    }

    /// Status of a task; unknown ids report `NotLoaded`
    pub fn status(&self, id: TaskId) -> TaskStatus {
        self.get(id).map_or(TaskStatus::NotLoaded, |slot| slot.status)
    }

    /// Loaded task ids in scheduling order
    pub fn ids(&self) -> Vec<TaskId> {
        self.directory.keys().map(|&key| TaskId::from_key(key)).collect()
    }

    /// Word at a raw index of a task (header included)
    pub fn word(&self, id: TaskId, index: usize) -> Result<Option<u32>> {
        let slot = self.get(id).ok_or_else(|| RuntimeError::not_loaded(id))?;
        Ok(slot.task.words.get(index).copied())
    }

    /// Read a data word at `address + data_offset` of task `id`
    ///
    /// `Ok(None)` means the address falls outside the task.
    pub fn read(&self, id: TaskId, address: usize) -> Result<Option<u32>> {
        let slot = self.get(id).ok_or_else(|| RuntimeError::not_loaded(id))?;
        Ok(slot.data_index(address).map(|i| slot.task.words[i]))
    }

    /// Write a data word at `address + data_offset` of task `id`
    ///
    /// Returns `Ok(false)` when the address falls outside the task.
    pub fn write(&mut self, id: TaskId, address: usize, word: u32) -> Result<bool> {
        let slot = self.get_mut(id).ok_or_else(|| RuntimeError::not_loaded(id))?;
        match slot.data_index(address) {
            Some(i) => {
                slot.task.words[i] = word;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
