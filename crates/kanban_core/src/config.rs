//! Sync configuration.
//!
//! # Invariants
//! - The storage key is derived from the payload version and never set directly.

use std::time::Duration;

/// Payload version written into every stored and exported envelope.
pub const STORAGE_VERSION: u32 = 1;
/// Default bounded window for undoing a deletion.
pub const DEFAULT_UNDO_WINDOW: Duration = Duration::from_secs(5);
/// File name offered for exported documents.
pub const EXPORT_FILE_NAME: &str = "kanban-tasks.json";

const STORAGE_KEY_PREFIX: &str = "kanban_mvp";

/// Settings shared by the store adapter and sync coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub storage_version: u32,
    pub undo_window: Duration,
}

impl SyncConfig {
    /// Returns the durable slot key, e.g. `kanban_mvp:v1`.
    pub fn storage_key(&self) -> String {
        format!("{STORAGE_KEY_PREFIX}:v{}", self.storage_version)
    }

    pub fn undo_window_ms(&self) -> i64 {
        i64::try_from(self.undo_window.as_millis()).unwrap_or(i64::MAX)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            storage_version: STORAGE_VERSION,
            undo_window: DEFAULT_UNDO_WINDOW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SyncConfig;
    use std::time::Duration;

    #[test]
    fn default_key_is_versioned() {
        let config = SyncConfig::default();
        assert_eq!(config.storage_key(), "kanban_mvp:v1");
        assert_eq!(config.undo_window, Duration::from_secs(5));
        assert_eq!(config.undo_window_ms(), 5_000);
    }
}
