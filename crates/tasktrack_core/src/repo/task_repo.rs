//! In-memory task repository with maintained sort indices.
//!
//! # Responsibility
//! - Own the canonical task set keyed by `TaskId`.
//! - Keep `by_deadline` and `by_priority` consistent with that set.
//! - Answer exact and range queries through boundary search on the indices.
//!
//! # Invariants
//! - Both indices hold exactly one entry per stored task after every public
//!   call returns.
//! - `by_deadline` is ascending with undated tasks last; `by_priority` is
//!   ascending by ordinal.
//! - A failing call leaves the repository exactly as it was.

use crate::model::task::{
    Completion, DeadlineChange, Priority, Task, TaskChanges, TaskId, TaskRecord,
    TaskValidationError,
};
use crate::order::{boundary_search, equal_run, partition_sort, SortDirection};
use crate::store::{StoreError, TaskStore};
use chrono::{Local, NaiveDate};
use log::debug;
use std::collections::BTreeMap;
#[cfg(test)]
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task mutations, queries and persistence calls.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    DuplicateId(TaskId),
    NotFound(TaskId),
    InvalidFilterMode(String),
    Store(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "task with id {id} already exists"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidFilterMode(mode) => {
                write!(f, "invalid filter mode `{mode}`; expected before|after")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::DuplicateId(_) | Self::NotFound(_) | Self::InvalidFilterMode(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Side of a target date selected by `filter_by_deadline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Before,
    After,
}

impl FromStr for FilterMode {
    type Err = RepoError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            _ => Err(RepoError::InvalidFilterMode(value.to_string())),
        }
    }
}

/// Completion counts over the whole repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskSummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl Display for TaskSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Total Tasks: {}\nCompleted Tasks: {}\nPending Tasks: {}",
            self.total, self.completed, self.pending
        )
    }
}

/// Sort keys copied out of a task so index maintenance never borrows the
/// primary store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IndexEntry {
    id: TaskId,
    priority: Priority,
    deadline: Option<NaiveDate>,
}

impl IndexEntry {
    fn of(task: &Task) -> Self {
        Self {
            id: task.id(),
            priority: task.priority(),
            deadline: task.deadline(),
        }
    }
}

/// Orders dated entries by date and every undated entry after them.
fn deadline_key(entry: &IndexEntry) -> (bool, Option<NaiveDate>) {
    (entry.deadline.is_none(), entry.deadline)
}

fn priority_key(entry: &IndexEntry) -> Priority {
    entry.priority
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Task store owning the canonical set and its two sorted views.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    tasks: BTreeMap<TaskId, Task>,
    by_deadline: Vec<IndexEntry>,
    by_priority: Vec<IndexEntry>,
    today: fn() -> NaiveDate,
}

impl Default for TaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRepository {
    /// Creates an empty repository that checks deadlines against the local date.
    pub fn new() -> Self {
        Self::with_clock(local_today)
    }

    /// Creates an empty repository with a caller-provided notion of "today".
    pub fn with_clock(today: fn() -> NaiveDate) -> Self {
        Self {
            tasks: BTreeMap::new(),
            by_deadline: Vec::new(),
            by_priority: Vec::new(),
            today,
        }
    }

    /// Validates and inserts a new task.
    ///
    /// # Errors
    /// - `DuplicateId` when `id` is already stored.
    /// - `Validation` when any field is rejected.
    pub fn add(
        &mut self,
        id: TaskId,
        description: &str,
        priority: &str,
        deadline: Option<&str>,
    ) -> RepoResult<TaskId> {
        if self.tasks.contains_key(&id) {
            debug!("event=task_add module=repo status=rejected id={id} reason=duplicate_id");
            return Err(RepoError::DuplicateId(id));
        }

        let task = Task::new(id, description, priority, deadline, (self.today)()).map_err(
            |err| {
                debug!("event=task_add module=repo status=rejected id={id} reason=validation");
                RepoError::from(err)
            },
        )?;
        self.tasks.insert(id, task);
        self.rebuild_indices();

        debug!(
            "event=task_add module=repo status=ok id={id} total={}",
            self.tasks.len()
        );
        Ok(id)
    }

    /// Removes a task and returns it.
    pub fn remove(&mut self, id: TaskId) -> RepoResult<Task> {
        let task = self.tasks.remove(&id).ok_or(RepoError::NotFound(id))?;
        self.rebuild_indices();

        debug!(
            "event=task_remove module=repo status=ok id={id} total={}",
            self.tasks.len()
        );
        Ok(task)
    }

    /// Applies a partial update to one task.
    ///
    /// All provided fields are validated before any is applied. Indices are
    /// rebuilt only when priority or deadline changed.
    pub fn update(&mut self, id: TaskId, changes: &TaskChanges) -> RepoResult<()> {
        let today = (self.today)();
        let task = self.tasks.get_mut(&id).ok_or(RepoError::NotFound(id))?;
        let reordered = task.update(changes, today)?;
        if reordered {
            self.rebuild_indices();
        }

        debug!("event=task_update module=repo status=ok id={id} reordered={reordered}");
        Ok(())
    }

    pub fn set_description(&mut self, id: TaskId, description: &str) -> RepoResult<()> {
        self.update(
            id,
            &TaskChanges {
                description: Some(description.to_string()),
                ..TaskChanges::default()
            },
        )
    }

    pub fn set_priority(&mut self, id: TaskId, priority: &str) -> RepoResult<()> {
        self.update(
            id,
            &TaskChanges {
                priority: Some(priority.to_string()),
                ..TaskChanges::default()
            },
        )
    }

    /// Replaces (`Some`) or clears (`None`) a task deadline.
    pub fn set_deadline(&mut self, id: TaskId, deadline: Option<&str>) -> RepoResult<()> {
        let change = match deadline {
            Some(text) => DeadlineChange::Set(text.to_string()),
            None => DeadlineChange::Clear,
        };
        self.update(
            id,
            &TaskChanges {
                deadline: Some(change),
                ..TaskChanges::default()
            },
        )
    }

    /// Marks a task completed; a second call reports `AlreadyCompleted`.
    pub fn mark_completed(&mut self, id: TaskId) -> RepoResult<Completion> {
        let task = self.tasks.get_mut(&id).ok_or(RepoError::NotFound(id))?;
        let completion = task.mark_completed();

        debug!("event=task_complete module=repo status=ok id={id} outcome={completion:?}");
        Ok(completion)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn count(&self) -> usize {
        self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterates tasks in ascending id order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Returns dated tasks strictly before or strictly after `target`.
    ///
    /// Tasks due exactly on `target` and undated tasks are in neither set.
    pub fn filter_by_deadline(&self, target: NaiveDate, mode: FilterMode) -> Vec<&Task> {
        let key = (false, Some(target));
        let hit = boundary_search(
            &self.by_deadline,
            deadline_key,
            &key,
            SortDirection::Ascending,
        );
        let cut = match hit {
            Ok(hit) => equal_run(&self.by_deadline, deadline_key, &key, hit),
            Err(insert_at) => insert_at..insert_at,
        };

        match mode {
            FilterMode::Before => self.resolve(self.by_deadline[..cut.start].iter()),
            FilterMode::After => self.resolve(
                self.by_deadline[cut.end..]
                    .iter()
                    .take_while(|entry| entry.deadline.is_some()),
            ),
        }
    }

    /// Returns every task due exactly on `target`.
    pub fn find_by_deadline_exact(&self, target: NaiveDate) -> Vec<&Task> {
        let key = (false, Some(target));
        match boundary_search(&self.by_deadline, deadline_key, &key, SortDirection::Ascending) {
            Ok(hit) => {
                let run = equal_run(&self.by_deadline, deadline_key, &key, hit);
                self.resolve(self.by_deadline[run].iter())
            }
            Err(_) => Vec::new(),
        }
    }

    /// Returns every task with exactly `priority`.
    pub fn find_by_priority(&self, priority: Priority) -> Vec<&Task> {
        match boundary_search(
            &self.by_priority,
            priority_key,
            &priority,
            SortDirection::Ascending,
        ) {
            Ok(hit) => {
                let run = equal_run(&self.by_priority, priority_key, &priority, hit);
                self.resolve(self.by_priority[run].iter())
            }
            Err(_) => Vec::new(),
        }
    }

    /// Returns tasks ordered by deadline; undated tasks come last in both
    /// directions.
    pub fn sorted_by_deadline(&self, direction: SortDirection) -> Vec<&Task> {
        let dated_len = self
            .by_deadline
            .iter()
            .take_while(|entry| entry.deadline.is_some())
            .count();
        let (dated, undated) = self.by_deadline.split_at(dated_len);

        let mut ordered: Vec<&IndexEntry> = if direction.is_ascending() {
            dated.iter().collect()
        } else {
            dated.iter().rev().collect()
        };
        ordered.extend(undated);
        self.resolve(ordered.into_iter())
    }

    pub fn sorted_by_priority(&self, direction: SortDirection) -> Vec<&Task> {
        if direction.is_ascending() {
            self.resolve(self.by_priority.iter())
        } else {
            self.resolve(self.by_priority.iter().rev())
        }
    }

    /// Case-insensitive substring search over descriptions, in id order.
    pub fn search_by_keyword(&self, keyword: &str) -> Vec<&Task> {
        let needle = keyword.trim().to_lowercase();
        self.tasks
            .values()
            .filter(|task| task.description().to_lowercase().contains(&needle))
            .collect()
    }

    /// Returns completed (`true`) or pending (`false`) tasks, in id order.
    pub fn filter_by_status(&self, completed: bool) -> Vec<&Task> {
        self.tasks
            .values()
            .filter(|task| task.is_completed() == completed)
            .collect()
    }

    pub fn summary(&self) -> TaskSummary {
        let total = self.tasks.len();
        let completed = self.tasks.values().filter(|task| task.is_completed()).count();
        TaskSummary {
            total,
            completed,
            pending: total - completed,
        }
    }

    /// Renders every task in id order for persistence.
    pub fn records(&self) -> Vec<TaskRecord> {
        self.tasks.values().map(Task::to_record_form).collect()
    }

    /// Replaces the whole task set; nothing changes when any record is rejected.
    ///
    /// Stored deadlines are accepted even when they are already past.
    pub fn replace_all(&mut self, records: Vec<TaskRecord>) -> RepoResult<()> {
        let mut tasks = BTreeMap::new();
        for record in records {
            let id = record.id;
            if tasks.contains_key(&id) {
                return Err(RepoError::DuplicateId(id));
            }
            tasks.insert(id, Task::from_record_form(record)?);
        }

        self.tasks = tasks;
        self.rebuild_indices();
        debug!(
            "event=task_replace_all module=repo status=ok total={}",
            self.tasks.len()
        );
        Ok(())
    }

    /// Writes the full task set to `store`.
    pub fn save_to<S: TaskStore + ?Sized>(&self, store: &S) -> RepoResult<()> {
        store.save(&self.records())?;
        Ok(())
    }

    /// Replaces the task set with the contents of `store`.
    ///
    /// Records that fail validation or repeat an id are reported as a corrupt
    /// store.
    pub fn load_from<S: TaskStore + ?Sized>(&mut self, store: &S) -> RepoResult<()> {
        let records = store.load()?;
        self.replace_all(records).map_err(|err| match err {
            RepoError::Validation(inner) => RepoError::Store(StoreError::format(
                store.path(),
                format!("invalid stored task: {inner}"),
            )),
            RepoError::DuplicateId(id) => RepoError::Store(StoreError::format(
                store.path(),
                format!("task id {id} is stored more than once"),
            )),
            other => other,
        })
    }

    fn rebuild_indices(&mut self) {
        let entries: Vec<IndexEntry> = self.tasks.values().map(IndexEntry::of).collect();
        self.by_deadline = partition_sort(&entries, deadline_key, SortDirection::Ascending);
        self.by_priority = partition_sort(&entries, priority_key, SortDirection::Ascending);
    }

    fn resolve<'a>(&'a self, entries: impl Iterator<Item = &'a IndexEntry>) -> Vec<&'a Task> {
        entries
            .filter_map(|entry| self.tasks.get(&entry.id))
            .collect()
    }

    #[cfg(test)]
    fn index_ids(&self) -> (BTreeSet<TaskId>, BTreeSet<TaskId>) {
        (
            self.by_deadline.iter().map(|entry| entry.id).collect(),
            self.by_priority.iter().map(|entry| entry.id).collect(),
        )
    }
}
