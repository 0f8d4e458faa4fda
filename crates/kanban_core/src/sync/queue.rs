//! FIFO queue of deferred persistence work.
//!
//! # Invariants
//! - Writes are handed out in the order they were enqueued.
//! - Each entry holds the collection as it was when the action happened.

use crate::model::task::Task;
use std::collections::VecDeque;

/// One deferred save of the full collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    /// Monotonic enqueue sequence number.
    pub seq: u64,
    /// Action that caused the write (`create`, `edit`, `move`).
    pub reason: &'static str,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Default)]
pub struct PersistQueue {
    entries: VecDeque<PendingWrite>,
    next_seq: u64,
}

impl PersistQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues a snapshot and returns its sequence number.
    pub fn enqueue(&mut self, reason: &'static str, tasks: Vec<Task>) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push_back(PendingWrite { seq, reason, tasks });
        seq
    }

    pub fn pop(&mut self) -> Option<PendingWrite> {
        self.entries.pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
