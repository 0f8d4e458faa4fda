//! Store adapter: versioned task payload over a durable slot.
//!
//! # Responsibility
//! - Read the slot, validate through the normalizer, return tasks.
//! - Normalize, envelope and write the current collection.
//!
//! # Invariants
//! - Every loaded or saved collection passes through the normalizer.
//! - `load`/`save` never fail; failures become one notice each.
//! - An absent or empty slot is an empty board, not a failure.
//!
//! # See also
//! - `crate::normalize`

pub mod slot;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::model::task::Task;
use crate::normalize::{extract_tasks_source, normalize_records, normalize_tasks};
use crate::notify::{Notice, Notifier};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use slot::SlotStore;

/// Durable envelope written to the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPayload {
    pub v: u32,
    #[serde(rename = "savedAt")]
    pub saved_at: i64,
    pub tasks: Vec<Task>,
}

/// Store adapter bound to one versioned slot key.
pub struct TaskStore<S: SlotStore> {
    slot: S,
    key: String,
    version: u32,
}

impl<S: SlotStore> TaskStore<S> {
    pub fn new(slot: S, config: &SyncConfig) -> Self {
        Self {
            slot,
            key: config.storage_key(),
            version: config.storage_version,
        }
    }

    /// Slot key this adapter reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Payload version written into envelopes.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Loads and normalizes the stored collection.
    ///
    /// # Errors
    /// - [`SyncError::ReadFailure`] when the slot cannot be read, holds invalid
    ///   JSON, or holds JSON without a tasks array.
    pub fn try_load(&self, now_ms: i64) -> Result<Vec<Task>, SyncError> {
        let raw = self
            .slot
            .read(&self.key)
            .map_err(|err| SyncError::ReadFailure(err.to_string()))?;
        let Some(raw) = raw.filter(|value| !value.is_empty()) else {
            return Ok(Vec::new());
        };

        let document: Value = serde_json::from_str(&raw)
            .map_err(|err| SyncError::ReadFailure(format!("stored value is not JSON: {err}")))?;
        let records = extract_tasks_source(&document).ok_or_else(|| {
            SyncError::ReadFailure("stored value has no tasks array".to_string())
        })?;

        Ok(normalize_records(records, now_ms))
    }

    /// Loads the stored collection, reporting failures through `notifier`.
    ///
    /// Returns an empty collection on any failure.
    pub fn load(&self, now_ms: i64, notifier: &dyn Notifier) -> Vec<Task> {
        match self.try_load(now_ms) {
            Ok(tasks) => {
                info!(
                    "event=store_load module=store status=ok key={} count={}",
                    self.key,
                    tasks.len()
                );
                tasks
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=error key={} error_code={} error={}",
                    self.key,
                    err.code(),
                    err
                );
                notifier.notify(Notice::Failure(err));
                Vec::new()
            }
        }
    }

    /// Normalizes `tasks`, wraps them in the envelope and writes the slot.
    ///
    /// # Errors
    /// - [`SyncError::WriteFailure`] when serialization or the slot write fails.
    pub fn try_save(&self, tasks: &[Task], now_ms: i64) -> Result<usize, SyncError> {
        let payload = StoredPayload {
            v: self.version,
            saved_at: now_ms,
            tasks: normalize_tasks(tasks, now_ms),
        };
        let text = serde_json::to_string(&payload)
            .map_err(|err| SyncError::WriteFailure(err.to_string()))?;
        self.slot
            .write(&self.key, &text)
            .map_err(|err| SyncError::WriteFailure(err.to_string()))?;
        Ok(payload.tasks.len())
    }

    /// Saves `tasks`, reporting failures through `notifier`.
    ///
    /// Returns whether the write succeeded.
    pub fn save(&self, tasks: &[Task], now_ms: i64, notifier: &dyn Notifier) -> bool {
        match self.try_save(tasks, now_ms) {
            Ok(count) => {
                info!(
                    "event=store_save module=store status=ok key={} count={}",
                    self.key, count
                );
                true
            }
            Err(err) => {
                warn!(
                    "event=store_save module=store status=error key={} error_code={} error={}",
                    self.key,
                    err.code(),
                    err
                );
                notifier.notify(Notice::Failure(err));
                false
            }
        }
    }
}
