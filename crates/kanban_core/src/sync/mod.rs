//! Synchronization between board state and the durable store.
//!
//! # Responsibility
//! - Queue persistence after every mutating action, in action order.
//! - Reconcile the board from storage at startup.
//! - Run the single-slot delete/undo protocol.
//!
//! # See also
//! - `crate::store`

pub mod coordinator;
pub mod queue;
