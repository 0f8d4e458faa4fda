//! Durable key-value slot contracts and implementations.
//!
//! # Responsibility
//! - Hide where the versioned payload physically lives.
//! - Report transport failures as [`SlotError`] for the store adapter to
//!   recover from.
//!
//! # Invariants
//! - A written value is returned verbatim by the next read of the same key.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SlotResult<T> = Result<T, SlotError>;

/// Transport error raised by a slot implementation.
#[derive(Debug)]
pub enum SlotError {
    Db(DbError),
    /// Storage is disabled or cannot be reached.
    Unavailable(String),
    /// Storage refused the write (for example a quota limit).
    Rejected(String),
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(details) => write!(f, "storage unavailable: {details}"),
            Self::Rejected(details) => write!(f, "storage rejected write: {details}"),
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) | Self::Rejected(_) => None,
        }
    }
}

impl From<DbError> for SlotError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable single-value-per-key storage.
pub trait SlotStore {
    fn read(&self, key: &str) -> SlotResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> SlotResult<()>;
}

impl<S: SlotStore + ?Sized> SlotStore for &S {
    fn read(&self, key: &str) -> SlotResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> SlotResult<()> {
        (**self).write(key, value)
    }
}

/// SQLite-backed slot stored in the `kv_slots` table.
pub struct SqliteSlotStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotStore<'conn> {
    /// Wraps a connection returned by [`crate::db::open_db`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SlotStore for SqliteSlotStore<'_> {
    fn read(&self, key: &str) -> SlotResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> SlotResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Availability of a [`MemorySlotStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotMode {
    #[default]
    Available,
    /// Reads succeed, writes are rejected.
    WritesRejected,
    /// Reads and writes fail.
    Unavailable,
}

/// In-process slot with switchable failure modes.
///
/// Keeps a history of every accepted write in order.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    values: RefCell<HashMap<String, String>>,
    history: RefCell<Vec<String>>,
    mode: Cell<SlotMode>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw value, bypassing mode checks and history.
    pub fn put_raw(&self, key: &str, value: impl Into<String>) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.into());
    }

    /// Returns the raw stored value, bypassing mode checks.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    /// Accepted writes in the order they were applied.
    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }

    pub fn set_mode(&self, mode: SlotMode) {
        self.mode.set(mode);
    }
}

impl SlotStore for MemorySlotStore {
    fn read(&self, key: &str) -> SlotResult<Option<String>> {
        if self.mode.get() == SlotMode::Unavailable {
            return Err(SlotError::Unavailable("memory slot disabled".to_string()));
        }
        Ok(self.raw(key))
    }

    fn write(&self, key: &str, value: &str) -> SlotResult<()> {
        match self.mode.get() {
            SlotMode::Available => {
                self.put_raw(key, value);
                self.history.borrow_mut().push(value.to_string());
                Ok(())
            }
            SlotMode::WritesRejected => Err(SlotError::Rejected("quota exceeded".to_string())),
            SlotMode::Unavailable => {
                Err(SlotError::Unavailable("memory slot disabled".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MemorySlotStore, SlotError, SlotMode, SlotStore, SqliteSlotStore};
    use crate::db::open_db_in_memory;

    #[test]
    fn sqlite_slot_overwrites_existing_value() {
        let conn = open_db_in_memory().unwrap();
        let slot = SqliteSlotStore::new(&conn);

        assert_eq!(slot.read("k").unwrap(), None);
        slot.write("k", "first").unwrap();
        slot.write("k", "second").unwrap();
        assert_eq!(slot.read("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn memory_slot_modes_fail_as_configured() {
        let slot = MemorySlotStore::new();
        slot.write("k", "v").unwrap();

        slot.set_mode(SlotMode::WritesRejected);
        assert!(matches!(slot.write("k", "w"), Err(SlotError::Rejected(_))));
        assert_eq!(slot.read("k").unwrap().as_deref(), Some("v"));

        slot.set_mode(SlotMode::Unavailable);
        assert!(matches!(slot.read("k"), Err(SlotError::Unavailable(_))));
        assert_eq!(slot.history(), vec!["v".to_string()]);
    }
}
