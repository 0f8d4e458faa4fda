//! Task domain model for the single-board tracker.
//!
//! # Responsibility
//! - Define the canonical task record shared by board, storage and import.
//! - Keep the fixed three-stage status set and its move order in one place.
//!
//! # Invariants
//! - Every task carries a non-empty trimmed title.
//! - Status is always one of `todo | inprogress | done`.

pub mod task;
