//! Task domain model.
//!
//! # Responsibility
//! - Define the task record and its wire naming (`createdAt`, `updatedAt`).
//! - Provide status ordering helpers used by board moves.
//! - Generate practically collision-free task identifiers.
//!
//! # Invariants
//! - `id` is unique within one board; uniqueness is enforced by callers that
//!   own the collection (normalizer, board).
//! - `title` is trimmed and never empty.
//! - `status` can only hold one of the three board stages.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque task identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = String;

const GENERATED_ID_PREFIX: &str = "t_";
const GENERATED_ID_RANDOM_CHARS: usize = 6;

/// Board stage of a task.
///
/// Declaration order is the left-to-right column order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Todo,
    /// Work is in progress.
    InProgress,
    /// Completed.
    Done,
}

impl TaskStatus {
    /// All stages in column order.
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Returns the stable wire value for this stage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "inprogress",
            Self::Done => "done",
        }
    }

    /// Parses an exact wire value. Unknown values return `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(Self::Todo),
            "inprogress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    /// Returns the neighbouring stage in `direction`, clamped at the board edges.
    pub fn shifted(self, direction: MoveDirection) -> Self {
        let index = Self::ALL
            .iter()
            .position(|status| *status == self)
            .unwrap_or(0);
        let next = match direction {
            MoveDirection::Left => index.checked_sub(1),
            MoveDirection::Right => Some(index + 1).filter(|next| *next < Self::ALL.len()),
        };
        next.map_or(self, |next| Self::ALL[next])
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a one-step column move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Expected, not enforced, to be >= `created_at`.
    pub updated_at: i64,
}

impl Task {
    /// Creates a task stamped with `now_ms` for both timestamps.
    ///
    /// # Errors
    /// - Returns [`TaskValidationError::EmptyTitle`] when the trimmed title is empty.
    pub fn new(
        id: impl Into<TaskId>,
        title: &str,
        description: impl Into<String>,
        status: TaskStatus,
        now_ms: i64,
    ) -> Result<Self, TaskValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(Self {
            id: id.into(),
            title: title.to_string(),
            description: description.into(),
            status,
            created_at: now_ms,
            updated_at: now_ms,
        })
    }
}

/// Inbound create/edit payload from the UI form.
///
/// A draft without `id` creates a task; a draft with `id` edits it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    pub id: Option<TaskId>,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

impl TaskDraft {
    /// Builds a create draft.
    pub fn create(title: impl Into<String>, description: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            status,
        }
    }

    /// Builds an edit draft for an existing task.
    pub fn edit(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        description: impl Into<String>,
        status: TaskStatus,
    ) -> Self {
        Self {
            id: Some(id.into()),
            title: title.into(),
            description: description.into(),
            status,
        }
    }
}

/// Reason an untrusted record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Input is not a JSON object.
    NotARecord,
    /// `title` is missing, not text, or blank after trimming.
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotARecord => write!(f, "task record must be an object"),
            Self::EmptyTitle => write!(f, "task title must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Generates a fresh task id from a time component and a random component.
///
/// Format: `t_<epoch-ms base36>_<6 random hex chars>`.
pub fn generate_task_id(now_ms: i64) -> TaskId {
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "{GENERATED_ID_PREFIX}{}_{}",
        to_base36(now_ms.unsigned_abs()),
        &random[..GENERATED_ID_RANDOM_CHARS]
    )
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{generate_task_id, to_base36, MoveDirection, Task, TaskStatus, TaskValidationError};

    #[test]
    fn shifted_clamps_at_board_edges() {
        assert_eq!(TaskStatus::Todo.shifted(MoveDirection::Left), TaskStatus::Todo);
        assert_eq!(TaskStatus::Todo.shifted(MoveDirection::Right), TaskStatus::InProgress);
        assert_eq!(TaskStatus::InProgress.shifted(MoveDirection::Left), TaskStatus::Todo);
        assert_eq!(TaskStatus::InProgress.shifted(MoveDirection::Right), TaskStatus::Done);
        assert_eq!(TaskStatus::Done.shifted(MoveDirection::Right), TaskStatus::Done);
    }

    #[test]
    fn status_wire_values_are_stable() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::parse("in_progress"), None);
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            serde_json::json!("inprogress")
        );
    }

    #[test]
    fn task_serializes_camel_case_fields() {
        let task = Task::new("a", "  Write report ", "", TaskStatus::Done, 42).unwrap();
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["title"], "Write report");
        assert_eq!(json["status"], "done");
        assert_eq!(json["createdAt"], 42);
        assert_eq!(json["updatedAt"], 42);
    }

    #[test]
    fn new_rejects_blank_title() {
        let err = Task::new("a", "   ", "", TaskStatus::Todo, 0).unwrap_err();
        assert_eq!(err, TaskValidationError::EmptyTitle);
    }

    #[test]
    fn generated_ids_carry_time_and_random_parts() {
        let id = generate_task_id(1_700_000_000_000);
        let parts: Vec<&str> = id.splitn(3, '_').collect();
        assert_eq!(parts[0], "t");
        assert_eq!(parts[1], to_base36(1_700_000_000_000));
        assert_eq!(parts[2].len(), 6);
        assert_ne!(generate_task_id(1), generate_task_id(1));
    }

    #[test]
    fn base36_matches_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
