//! Sync coordinator: board mutations, deferred persistence, delete/undo.
//!
//! # Responsibility
//! - Own the board, the store adapter and their collaborators.
//! - Enqueue a save after create/edit/move; apply queued saves on `flush`.
//! - Keep at most one pending deletion that can be undone for a bounded time.
//!
//! # Invariants
//! - Queued saves are applied in submission order, and always before an
//!   immediate save (delete, undo, import) or a load.
//! - A store failure never rolls back or blocks a board mutation.
//! - A newer deletion replaces the pending one; an expired undo is a no-op.

use crate::board::Board;
use crate::clock::Clock;
use crate::config::SyncConfig;
use crate::model::task::{MoveDirection, Task, TaskDraft, TaskId};
use crate::normalize::normalize_tasks;
use crate::notify::{Confirm, Notice, Notifier};
use crate::store::slot::SlotStore;
use crate::store::TaskStore;
use crate::sync::queue::PersistQueue;
use log::{debug, info};

const DELETE_PROMPT: &str = "Delete this task?";

/// Pending deletion state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PendingDeletion {
    #[default]
    Idle,
    PendingUndo {
        task: Task,
        original_index: usize,
        /// Epoch milliseconds at which undo stops being available.
        expires_at_ms: i64,
    },
}

impl PendingDeletion {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Coordinates the board with its durable mirror.
pub struct SyncCoordinator<S: SlotStore, C: Clock, N: Notifier> {
    board: Board,
    store: TaskStore<S>,
    clock: C,
    notifier: N,
    queue: PersistQueue,
    pending: PendingDeletion,
    undo_window_ms: i64,
}

impl<S: SlotStore, C: Clock, N: Notifier> SyncCoordinator<S, C, N> {
    /// Wires the coordinator and reconciles the board from storage.
    ///
    /// A non-empty stored collection replaces the board wholesale and raises
    /// a `Restored` notice; otherwise the initial board is kept.
    pub fn start(board: Board, store: TaskStore<S>, clock: C, notifier: N, config: &SyncConfig) -> Self {
        let mut coordinator = Self {
            board,
            store,
            clock,
            notifier,
            queue: PersistQueue::new(),
            pending: PendingDeletion::Idle,
            undo_window_ms: config.undo_window_ms(),
        };
        coordinator.reconcile();
        coordinator
    }

    fn reconcile(&mut self) {
        let tasks = self.store.load(self.clock.now_ms(), &self.notifier);
        if tasks.is_empty() {
            self.board.render();
            return;
        }
        let count = tasks.len();
        self.board.replace_all(tasks);
        info!("event=sync_restore module=sync status=ok count={count}");
        self.notifier.notify(Notice::Restored { count });
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Deep copy of the current collection.
    pub fn snapshot(&self) -> Vec<Task> {
        self.board.snapshot()
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn pending(&self) -> &PendingDeletion {
        &self.pending
    }

    /// Number of saves waiting for `flush`.
    pub fn queued_writes(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Creates or edits a task from a form draft and enqueues a save.
    pub fn submit(&mut self, draft: &TaskDraft) -> Option<TaskId> {
        let reason = if draft.id.is_some() { "edit" } else { "create" };
        let id = self.board.apply_draft(draft, self.clock.now_ms())?;
        self.schedule_persist(reason);
        Some(id)
    }

    /// Moves a task one column and enqueues a save when it actually moved.
    pub fn move_task(&mut self, id: &str, direction: MoveDirection) -> bool {
        let moved = self.board.move_task(id, direction, self.clock.now_ms());
        if moved {
            self.schedule_persist("move");
        }
        moved
    }

    fn schedule_persist(&mut self, reason: &'static str) {
        let seq = self.queue.enqueue(reason, self.board.snapshot());
        debug!("event=persist_enqueue module=sync status=ok reason={reason} seq={seq}");
    }

    /// Applies every queued save in order. Returns the number applied.
    pub fn flush(&mut self) -> usize {
        let mut applied = 0;
        while let Some(write) = self.queue.pop() {
            self.store
                .save(&write.tasks, self.clock.now_ms(), &self.notifier);
            debug!(
                "event=persist_apply module=sync status=ok reason={} seq={}",
                write.reason, write.seq
            );
            applied += 1;
        }
        applied
    }

    fn persist_now(&mut self) -> bool {
        self.flush();
        self.store
            .save(self.board.tasks(), self.clock.now_ms(), &self.notifier)
    }

    /// Deletes a task after confirmation and opens the undo window.
    ///
    /// Returns `false` (no change) for unknown ids or a declined prompt.
    pub fn delete(&mut self, id: &str, confirm: &dyn Confirm) -> bool {
        if !self.board.contains(id) {
            return false;
        }
        if !confirm.confirm(DELETE_PROMPT) {
            debug!("event=task_delete module=sync status=declined id={id}");
            return false;
        }
        let Some((task, original_index)) = self.board.remove(id) else {
            return false;
        };
        self.persist_now();

        if let PendingDeletion::PendingUndo { task: previous, .. } = &self.pending {
            debug!(
                "event=undo_replaced module=sync status=ok previous_id={}",
                previous.id
            );
        }
        let deleted_id = task.id.clone();
        self.pending = PendingDeletion::PendingUndo {
            task,
            original_index,
            expires_at_ms: self.clock.now_ms().saturating_add(self.undo_window_ms),
        };
        info!("event=task_delete module=sync status=ok id={deleted_id} index={original_index}");
        self.notifier.notify(Notice::Deleted { id: deleted_id });
        true
    }

    /// Restores the pending deletion if the undo window is still open.
    ///
    /// Returns `true` when the task was reinserted.
    pub fn undo(&mut self) -> bool {
        self.tick();
        let PendingDeletion::PendingUndo {
            task,
            original_index,
            ..
        } = std::mem::take(&mut self.pending)
        else {
            return false;
        };
        if self.board.contains(&task.id) {
            debug!("event=task_undo module=sync status=skipped id={} reason=already_present", task.id);
            return false;
        }

        let id = task.id.clone();
        let index = self.board.insert_at(task, original_index);
        self.persist_now();
        info!("event=task_undo module=sync status=ok id={id} index={index}");
        self.notifier.notify(Notice::UndoApplied { id });
        true
    }

    /// Expires the pending deletion once its window has elapsed.
    ///
    /// Returns `true` when a pending deletion expired on this call.
    pub fn tick(&mut self) -> bool {
        let expired = matches!(
            &self.pending,
            PendingDeletion::PendingUndo { expires_at_ms, .. } if self.clock.now_ms() >= *expires_at_ms
        );
        if expired {
            self.pending = PendingDeletion::Idle;
            debug!("event=undo_expired module=sync status=ok");
        }
        expired
    }

    /// Normalizes `tasks`, replaces the whole board and saves immediately.
    ///
    /// A pending deletion stays undoable on the replaced board. Returns the
    /// number of tasks kept.
    pub fn replace_all(&mut self, tasks: &[Task]) -> usize {
        let tasks = normalize_tasks(tasks, self.clock.now_ms());
        let count = tasks.len();
        self.board.replace_all(tasks);
        self.persist_now();
        count
    }

    /// Applies queued saves and tears the coordinator down.
    ///
    /// A pending deletion expires silently.
    pub fn shutdown(mut self) -> Board {
        let applied = self.flush();
        info!("event=sync_shutdown module=sync status=ok applied_writes={applied}");
        self.board
    }
}
