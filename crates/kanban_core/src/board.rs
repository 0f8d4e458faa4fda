//! Board state: the authoritative in-memory task collection.
//!
//! # Responsibility
//! - Own the task list exclusively and hand out deep-copied snapshots.
//! - Apply create/edit/move/remove/insert mutations all-or-nothing.
//! - Trigger a full render through the injected [`Renderer`] after changes.
//!
//! # Invariants
//! - Ids stay unique: created tasks get ids not present on the board.
//! - Order is insertion/load order; grouping by status is a render concern.

use crate::model::task::{MoveDirection, Task, TaskDraft, TaskId, TaskStatus};
use crate::normalize::fresh_id;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Rendering collaborator notified with the full collection after changes.
pub trait Renderer {
    fn render(&self, tasks: &[Task]);
}

impl<R: Renderer + ?Sized> Renderer for Rc<R> {
    fn render(&self, tasks: &[Task]) {
        (**self).render(tasks);
    }
}

/// Renderer that ignores every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn render(&self, _tasks: &[Task]) {}
}

/// Renderer that keeps every rendered frame.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    frames: RefCell<Vec<Vec<Task>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn last_frame(&self) -> Option<Vec<Task>> {
        self.frames.borrow().last().cloned()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, tasks: &[Task]) {
        self.frames.borrow_mut().push(tasks.to_vec());
    }
}

/// Per-column task counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl StatusCounts {
    pub fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Done => self.done,
        }
    }
}

/// Authoritative task collection.
pub struct Board {
    tasks: Vec<Task>,
    renderer: Box<dyn Renderer>,
}

impl Board {
    /// Creates an empty board rendering through `renderer`.
    pub fn new(renderer: impl Renderer + 'static) -> Self {
        Self {
            tasks: Vec::new(),
            renderer: Box::new(renderer),
        }
    }

    /// Creates an empty board without a rendering surface.
    pub fn headless() -> Self {
        Self::new(NoopRenderer)
    }

    /// Deep copy of the collection; later board changes do not affect it.
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    pub fn counts(&self) -> StatusCounts {
        self.tasks
            .iter()
            .fold(StatusCounts::default(), |mut counts, task| {
                match task.status {
                    TaskStatus::Todo => counts.todo += 1,
                    TaskStatus::InProgress => counts.in_progress += 1,
                    TaskStatus::Done => counts.done += 1,
                }
                counts
            })
    }

    /// Replaces the whole collection and renders.
    ///
    /// Callers must pass normalized tasks.
    pub(crate) fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.render();
    }

    /// Re-renders the current collection.
    pub fn render(&self) {
        self.renderer.render(&self.tasks);
    }

    /// Applies a create (no id) or edit (with id) draft.
    ///
    /// Returns the affected id, or `None` when the title is blank or the
    /// edited id does not exist.
    pub fn apply_draft(&mut self, draft: &TaskDraft, now_ms: i64) -> Option<TaskId> {
        let title = draft.title.trim();
        if title.is_empty() {
            return None;
        }
        let description = draft.description.trim();

        let id = match draft.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            None => {
                let taken: HashSet<TaskId> = self.tasks.iter().map(|task| task.id.clone()).collect();
                let id = fresh_id(&taken, now_ms);
                let task = Task::new(id.clone(), title, description, draft.status, now_ms).ok()?;
                self.tasks.push(task);
                id
            }
            Some(id) => {
                let task = self.tasks.iter_mut().find(|task| task.id == id)?;
                task.title = title.to_string();
                task.description = description.to_string();
                task.status = draft.status;
                task.updated_at = now_ms;
                task.id.clone()
            }
        };

        self.render();
        Some(id)
    }

    /// Moves a task one column, clamped at the edges.
    ///
    /// Returns `false` when the id is unknown or the task is already at the edge.
    pub fn move_task(&mut self, id: &str, direction: MoveDirection, now_ms: i64) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return false;
        };
        let next = task.status.shifted(direction);
        if next == task.status {
            return false;
        }
        task.status = next;
        task.updated_at = now_ms;
        self.render();
        true
    }

    /// Removes a task, returning it with its former index.
    pub fn remove(&mut self, id: &str) -> Option<(Task, usize)> {
        let index = self.position(id)?;
        let task = self.tasks.remove(index);
        self.render();
        Some((task, index))
    }

    /// Inserts a task at `min(index, len)`, returning the actual index.
    pub fn insert_at(&mut self, task: Task, index: usize) -> usize {
        let index = index.min(self.tasks.len());
        self.tasks.insert(index, task);
        self.render();
        index
    }
}

#[cfg(test)]
mod tests {
    use super::{Board, RecordingRenderer};
    use crate::model::task::{MoveDirection, TaskDraft, TaskStatus};
    use std::rc::Rc;

    #[test]
    fn create_then_edit_keeps_id_and_refreshes_updated_at() {
        let mut board = Board::headless();
        let id = board
            .apply_draft(&TaskDraft::create(" Plan ", " notes ", TaskStatus::Todo), 10)
            .unwrap();

        let edited = board
            .apply_draft(&TaskDraft::edit(id.clone(), "Plan sprint", "", TaskStatus::Done), 20)
            .unwrap();
        assert_eq!(edited, id);

        let task = board.get(&id).unwrap();
        assert_eq!(task.title, "Plan sprint");
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.created_at, 10);
        assert_eq!(task.updated_at, 20);
    }

    #[test]
    fn blank_title_and_unknown_edit_do_not_mutate() {
        let renderer = Rc::new(RecordingRenderer::new());
        let mut board = Board::new(Rc::clone(&renderer));

        assert!(board.apply_draft(&TaskDraft::create("  ", "", TaskStatus::Todo), 1).is_none());
        assert!(board
            .apply_draft(&TaskDraft::edit("missing", "x", "", TaskStatus::Todo), 1)
            .is_none());
        assert!(board.is_empty());
        assert_eq!(renderer.frame_count(), 0);
    }

    #[test]
    fn move_is_clamped_and_edge_moves_are_noops() {
        let mut board = Board::headless();
        let id = board
            .apply_draft(&TaskDraft::create("a", "", TaskStatus::Todo), 1)
            .unwrap();

        assert!(!board.move_task(&id, MoveDirection::Left, 2));
        assert_eq!(board.get(&id).unwrap().updated_at, 1);
        assert!(board.move_task(&id, MoveDirection::Right, 3));
        assert!(board.move_task(&id, MoveDirection::Right, 4));
        assert!(!board.move_task(&id, MoveDirection::Right, 5));
        assert_eq!(board.get(&id).unwrap().status, TaskStatus::Done);
        assert_eq!(board.counts().done, 1);
    }

    #[test]
    fn snapshot_does_not_alias_board() {
        let mut board = Board::headless();
        let id = board
            .apply_draft(&TaskDraft::create("a", "", TaskStatus::Todo), 1)
            .unwrap();
        let mut snapshot = board.snapshot();
        snapshot[0].title = "changed".to_string();
        assert_eq!(board.get(&id).unwrap().title, "a");
    }
}
