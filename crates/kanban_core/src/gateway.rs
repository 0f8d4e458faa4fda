//! Import/export gateway for portable JSON documents.
//!
//! # Responsibility
//! - Serialize the board as `{v, exportedAt, tasks}`.
//! - Ingest external documents through the normalizer and replace the board
//!   only after confirmation.
//!
//! # Invariants
//! - Export never mutates the board.
//! - A failed or declined import leaves the board untouched.
//! - Import replaces, never merges.

use crate::clock::Clock;
use crate::config::EXPORT_FILE_NAME;
use crate::error::SyncError;
use crate::model::task::Task;
use crate::normalize::{extract_tasks_source, normalize_records, normalize_tasks};
use crate::notify::{Confirm, Notice, Notifier};
use crate::store::slot::SlotStore;
use crate::sync::coordinator::SyncCoordinator;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

const IMPORT_PROMPT: &str = "Import tasks and replace the current board?";

/// Portable export envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub v: u32,
    #[serde(rename = "exportedAt")]
    pub exported_at: i64,
    pub tasks: Vec<Task>,
}

/// Result of an import attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The board was replaced with this many tasks.
    Imported(usize),
    /// The user declined; nothing changed.
    Declined,
}

impl<S: SlotStore, C: Clock, N: Notifier> SyncCoordinator<S, C, N> {
    /// Builds the export envelope from a normalized board snapshot.
    pub fn export_document(&self) -> ExportDocument {
        let now_ms = self.now_ms();
        ExportDocument {
            v: self.store().version(),
            exported_at: now_ms,
            tasks: normalize_tasks(self.board().tasks(), now_ms),
        }
    }

    /// Serializes the board as pretty-printed JSON.
    ///
    /// # Errors
    /// - [`SyncError::ExportFailure`] when serialization fails.
    pub fn export_json(&self) -> Result<String, SyncError> {
        let document = self.export_document();
        let count = document.tasks.len();
        let result = serde_json::to_string_pretty(&document)
            .map_err(|err| SyncError::ExportFailure(err.to_string()));
        self.report_export(result, count)
    }

    /// Writes the export document as `kanban-tasks.json` inside `dir`.
    ///
    /// # Errors
    /// - [`SyncError::ExportFailure`] when serialization or the file write fails.
    pub fn export_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf, SyncError> {
        let document = self.export_document();
        let count = document.tasks.len();
        let path = dir.as_ref().join(EXPORT_FILE_NAME);
        let result = serde_json::to_string_pretty(&document)
            .map_err(|err| SyncError::ExportFailure(err.to_string()))
            .and_then(|text| {
                std::fs::write(&path, text).map_err(|err| {
                    SyncError::ExportFailure(format!("{}: {err}", path.display()))
                })
            })
            .map(|()| path);
        self.report_export(result, count)
    }

    fn report_export<T>(&self, result: Result<T, SyncError>, count: usize) -> Result<T, SyncError> {
        match &result {
            Ok(_) => {
                info!("event=export module=gateway status=ok count={count}");
                self.notifier().notify(Notice::Exported { count });
            }
            Err(err) => {
                warn!(
                    "event=export module=gateway status=error error_code={} error={}",
                    err.code(),
                    err
                );
                self.notifier().notify(Notice::Failure(err.clone()));
            }
        }
        result
    }

    /// Imports a JSON document, replacing the board after confirmation.
    ///
    /// # Errors
    /// - [`SyncError::ImportParseFailure`] when `text` is not JSON.
    /// - [`SyncError::ImportEmptyFailure`] when no valid task remains.
    pub fn import_json(&mut self, text: &str, confirm: &dyn Confirm) -> Result<ImportOutcome, SyncError> {
        let tasks = match self.parse_import(text) {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(
                    "event=import module=gateway status=error error_code={} error={}",
                    err.code(),
                    err
                );
                self.notifier().notify(Notice::Failure(err.clone()));
                return Err(err);
            }
        };

        if !confirm.confirm(IMPORT_PROMPT) {
            info!("event=import module=gateway status=declined count={}", tasks.len());
            return Ok(ImportOutcome::Declined);
        }

        let count = self.replace_all(&tasks);
        info!("event=import module=gateway status=ok count={count}");
        self.notifier().notify(Notice::Imported { count });
        Ok(ImportOutcome::Imported(count))
    }

    /// Reads `path` and imports its contents.
    ///
    /// # Errors
    /// - [`SyncError::ImportParseFailure`] when the file cannot be read.
    /// - Same as [`Self::import_json`] otherwise.
    pub fn import_from_path(
        &mut self,
        path: impl AsRef<Path>,
        confirm: &dyn Confirm,
    ) -> Result<ImportOutcome, SyncError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => self.import_json(&text, confirm),
            Err(err) => {
                let err = SyncError::ImportParseFailure(format!("{}: {err}", path.display()));
                warn!(
                    "event=import module=gateway status=error error_code={} error={}",
                    err.code(),
                    err
                );
                self.notifier().notify(Notice::Failure(err.clone()));
                Err(err)
            }
        }
    }

    fn parse_import(&self, text: &str) -> Result<Vec<Task>, SyncError> {
        let document: Value = serde_json::from_str(text)
            .map_err(|err| SyncError::ImportParseFailure(err.to_string()))?;
        let tasks = extract_tasks_source(&document)
            .map(|records| normalize_records(records, self.now_ms()))
            .unwrap_or_default();
        if tasks.is_empty() {
            return Err(SyncError::ImportEmptyFailure);
        }
        Ok(tasks)
    }
}
