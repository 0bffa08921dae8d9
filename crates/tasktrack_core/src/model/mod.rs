//! Task domain model.
//!
//! # Responsibility
//! - Define the task record, its priority scale and deadline text form.
//! - Own every field validator used by the repository.
//!
//! # Invariants
//! - Every task is identified by a caller-assigned `TaskId`.
//! - A constructed `Task` has already passed all field validators.

pub mod task;
