//! Task use-case service.
//!
//! # Responsibility
//! - Pair one repository with one store for presentation-layer callers.
//! - Apply the "no prior save means start empty" policy on open.
//!
//! # Invariants
//! - Service APIs never bypass repository validation or index maintenance.
//! - Store errors other than a missing target propagate unchanged.

use crate::repo::task_repo::{RepoError, RepoResult, TaskRepository};
use crate::store::{StoreError, TaskStore};
use log::info;

/// Facade over a task repository and the store it persists to.
pub struct TaskService<S: TaskStore> {
    repo: TaskRepository,
    store: S,
}

impl<S: TaskStore> TaskService<S> {
    /// Wraps an already populated repository without touching the store.
    pub fn new(repo: TaskRepository, store: S) -> Self {
        Self { repo, store }
    }

    /// Loads `store` into a fresh repository.
    pub fn open(store: S) -> RepoResult<Self> {
        Self::open_with(TaskRepository::new(), store)
    }

    /// Loads `store` into `repo`, replacing its contents.
    ///
    /// A store that was never saved yields an empty repository.
    pub fn open_with(mut repo: TaskRepository, store: S) -> RepoResult<Self> {
        match repo.load_from(&store) {
            Ok(()) => {
                info!(
                    "event=service_open module=service status=ok total={}",
                    repo.len()
                );
            }
            Err(RepoError::Store(StoreError::NotFound(path))) => {
                info!(
                    "event=service_open module=service status=empty reason=no_prior_save path={}",
                    path.display()
                );
                repo.replace_all(Vec::new())?;
            }
            Err(err) => return Err(err),
        }
        Ok(Self { repo, store })
    }

    pub fn repo(&self) -> &TaskRepository {
        &self.repo
    }

    pub fn repo_mut(&mut self) -> &mut TaskRepository {
        &mut self.repo
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persists the full task set.
    pub fn save(&self) -> RepoResult<()> {
        self.repo.save_to(&self.store)
    }

    /// Multi-line `Total/Completed/Pending` summary.
    pub fn summary_text(&self) -> String {
        self.repo.summary().to_string()
    }

    pub fn into_parts(self) -> (TaskRepository, S) {
        (self.repo, self.store)
    }
}
