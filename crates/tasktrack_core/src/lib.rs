//! Core domain logic for tasktrack.
//! This crate is the single source of truth for task invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod order;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status};
pub use model::task::{
    format_deadline, parse_deadline, Completion, DeadlineChange, Priority, Task, TaskChanges,
    TaskId, TaskRecord, TaskValidationError,
};
pub use order::SortDirection;
pub use repo::task_repo::{FilterMode, RepoError, RepoResult, TaskRepository, TaskSummary};
pub use service::task_service::TaskService;
pub use store::{
    open_store, JsonFileStore, LineFileStore, StoreError, StoreFormat, StoreResult, TaskStore,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
