//! User-facing notices and the collaborators that surface them.
//!
//! # Responsibility
//! - Describe every message the core raises toward the toast surface.
//! - Provide confirmation and notification seams for UI layers.

use crate::error::SyncError;
use crate::model::task::TaskId;
use std::cell::RefCell;

/// Severity used by presentation layers to style a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Message raised by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Saved tasks were restored at startup.
    Restored { count: usize },
    /// A task was deleted and can be undone until the window closes.
    Deleted { id: TaskId },
    /// A pending deletion was undone.
    UndoApplied { id: TaskId },
    /// The board was exported.
    Exported { count: usize },
    /// The board was replaced by an import.
    Imported { count: usize },
    /// A recoverable failure.
    Failure(SyncError),
}

impl Notice {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Self::Restored { .. } | Self::Deleted { .. } => NoticeLevel::Info,
            Self::UndoApplied { .. } | Self::Exported { .. } | Self::Imported { .. } => {
                NoticeLevel::Success
            }
            Self::Failure(_) => NoticeLevel::Error,
        }
    }

    /// Human-readable message text.
    pub fn message(&self) -> String {
        match self {
            Self::Restored { count } => format!("Restored {count} saved task(s)."),
            Self::Deleted { id } => format!("Task {id} deleted. Undo is available."),
            Self::UndoApplied { id } => format!("Task {id} restored."),
            Self::Exported { count } => format!("Exported {count} task(s)."),
            Self::Imported { count } => format!("Imported {count} task(s)."),
            Self::Failure(err) => err.to_string(),
        }
    }

    /// Returns the failure carried by this notice, if any.
    pub fn failure(&self) -> Option<&SyncError> {
        match self {
            Self::Failure(err) => Some(err),
            _ => None,
        }
    }
}

/// Receives notices (toast surface).
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }
}

/// Answers yes/no prompts (delete and import confirmation).
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Notifier that keeps every notice in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all notices raised so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    /// Returns only failure notices.
    pub fn failures(&self) -> Vec<SyncError> {
        self.notices
            .borrow()
            .iter()
            .filter_map(|notice| notice.failure().cloned())
            .collect()
    }

    pub fn clear(&self) {
        self.notices.borrow_mut().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}
