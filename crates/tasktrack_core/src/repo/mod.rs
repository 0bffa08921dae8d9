//! Task repository and its query surface.
//!
//! # Responsibility
//! - Own the in-memory task set and its derived sorted indices.
//! - Translate validation and persistence failures into `RepoError`.
//!
//! # Invariants
//! - Repository writes go through `Task` validators before touching state.
//! - Persistence is only touched on explicit `save_to`/`load_from` calls.

pub mod task_repo;
