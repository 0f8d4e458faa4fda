//! Core state model for a single three-stage task board.
//! This crate is the single source of truth for board invariants and the
//! synchronization contract with durable storage.

pub mod board;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod notify;
pub mod store;
pub mod sync;

pub use board::{Board, NoopRenderer, RecordingRenderer, Renderer, StatusCounts};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{SyncConfig, EXPORT_FILE_NAME, STORAGE_VERSION};
pub use error::SyncError;
pub use gateway::{ExportDocument, ImportOutcome};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{MoveDirection, Task, TaskDraft, TaskId, TaskStatus, TaskValidationError};
pub use normalize::{extract_tasks_source, normalize_many, normalize_one, validate_task};
pub use notify::{Confirm, Notice, NoticeLevel, Notifier, RecordingNotifier};
pub use store::slot::{MemorySlotStore, SlotError, SlotMode, SlotStore, SqliteSlotStore};
pub use store::{StoredPayload, TaskStore};
pub use sync::coordinator::{PendingDeletion, SyncCoordinator};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
