//! Task record model.
//!
//! # Responsibility
//! - Define the canonical task record and its field validators.
//! - Convert between live records and the flat record form used by stores.
//!
//! # Invariants
//! - `id` never changes after construction.
//! - `priority` is always one of `low|medium|high`.
//! - `completed` only moves from `false` to `true`.
//! - A deadline that is being set is never earlier than the caller's `today`.
//!   Stored deadlines are not re-checked when loaded.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// `chrono` pattern for the `DD-MM-YYYY` deadline text form.
pub const DEADLINE_FORMAT: &str = "%d-%m-%Y";
/// Marker used by flat text forms for an absent deadline.
pub const NO_DEADLINE: &str = "None";

// chrono accepts single-digit days and months; the text form does not.
static DEADLINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}-\d{2}-\d{4}$").expect("valid deadline regex"));

/// Caller-assigned task identifier, unique within one repository.
pub type TaskId = i64;

/// Task priority with ordinal order `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// All priorities in ascending order.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Exact lowercase wire token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses the exact wire token, without normalization.
    pub fn from_token(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses user input; surrounding whitespace and case are ignored.
impl FromStr for Priority {
    type Err = TaskValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_token(value.trim().to_ascii_lowercase().as_str())
            .ok_or_else(|| TaskValidationError::InvalidPriority(value.to_string()))
    }
}

/// Field-level validation failure for task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyDescription,
    InvalidPriority(String),
    InvalidDeadlineFormat(String),
    PastDeadline { deadline: NaiveDate, today: NaiveDate },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "description cannot be empty"),
            Self::InvalidPriority(value) => {
                write!(f, "invalid priority `{value}`; expected low|medium|high")
            }
            Self::InvalidDeadlineFormat(value) => {
                write!(f, "invalid deadline `{value}`; expected DD-MM-YYYY")
            }
            Self::PastDeadline { deadline, today } => write!(
                f,
                "deadline {} is earlier than today ({})",
                format_deadline(*deadline),
                format_deadline(*today)
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// Result of a completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The task moved from pending to completed.
    Completed,
    /// The task was already completed; nothing changed.
    AlreadyCompleted,
}

/// Requested change to a task deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeadlineChange {
    /// Replace with a new `DD-MM-YYYY` deadline.
    Set(String),
    /// Remove the deadline.
    Clear,
}

/// Partial update request; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub description: Option<String>,
    pub priority: Option<String>,
    pub deadline: Option<DeadlineChange>,
    /// Marks the task completed. There is no way to reopen a task.
    pub complete: bool,
}

impl TaskChanges {
    /// Returns whether the request carries no change at all.
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.priority.is_none()
            && self.deadline.is_none()
            && !self.complete
    }
}

/// Flat, field-named form exchanged with persistence adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub description: String,
    pub priority: Priority,
    /// `DD-MM-YYYY`, or `None` for no deadline.
    pub deadline: Option<String>,
    pub completed: bool,
}

/// Canonical task entity.
///
/// Fields are private so every mutation goes through a validated path; the
/// repository is the only owner that hands out mutable access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    description: String,
    priority: Priority,
    deadline: Option<NaiveDate>,
    completed: bool,
}

impl Task {
    /// Validates every field and builds a pending task.
    ///
    /// # Errors
    /// - `EmptyDescription` for blank descriptions.
    /// - `InvalidPriority` for anything outside `low|medium|high`.
    /// - `InvalidDeadlineFormat` / `PastDeadline` for bad deadline text.
    pub fn new(
        id: TaskId,
        description: &str,
        priority: &str,
        deadline: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, TaskValidationError> {
        let description = validate_description(description)?;
        let priority = priority.parse::<Priority>()?;
        let deadline = deadline
            .map(|text| validate_deadline(text, today))
            .transpose()?;

        Ok(Self {
            id,
            description,
            priority,
            deadline,
            completed: false,
        })
    }

    /// Rebuilds a task from its stored record form.
    ///
    /// Stored deadlines may legitimately lie in the past, so only the text
    /// form is checked.
    pub fn from_record_form(record: TaskRecord) -> Result<Self, TaskValidationError> {
        let description = validate_description(&record.description)?;
        let deadline = record.deadline.as_deref().map(parse_deadline).transpose()?;

        Ok(Self {
            id: record.id,
            description,
            priority: record.priority,
            deadline,
            completed: record.completed,
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn deadline(&self) -> Option<NaiveDate> {
        self.deadline
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Applies a partial update.
    ///
    /// All provided fields are validated before any of them is written, so a
    /// failed update leaves the task untouched. Returns `true` when priority
    /// or deadline changed value.
    pub fn update(
        &mut self,
        changes: &TaskChanges,
        today: NaiveDate,
    ) -> Result<bool, TaskValidationError> {
        let description = changes
            .description
            .as_deref()
            .map(validate_description)
            .transpose()?;
        let priority = changes
            .priority
            .as_deref()
            .map(str::parse::<Priority>)
            .transpose()?;
        let deadline = match &changes.deadline {
            Some(DeadlineChange::Set(text)) => Some(Some(validate_deadline(text, today)?)),
            Some(DeadlineChange::Clear) => Some(None),
            None => None,
        };

        let mut reordered = false;
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(priority) = priority {
            reordered |= priority != self.priority;
            self.priority = priority;
        }
        if let Some(deadline) = deadline {
            reordered |= deadline != self.deadline;
            self.deadline = deadline;
        }
        if changes.complete {
            self.mark_completed();
        }

        Ok(reordered)
    }

    /// Marks the task completed; repeated calls report `AlreadyCompleted`.
    pub fn mark_completed(&mut self) -> Completion {
        if self.completed {
            return Completion::AlreadyCompleted;
        }
        self.completed = true;
        Completion::Completed
    }

    /// Renders the flat record form used by persistence adapters.
    pub fn to_record_form(&self) -> TaskRecord {
        TaskRecord {
            id: self.id,
            description: self.description.clone(),
            priority: self.priority,
            deadline: self.deadline.map(format_deadline),
            completed: self.completed,
        }
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let deadline = self
            .deadline
            .map(format_deadline)
            .unwrap_or_else(|| NO_DEADLINE.to_string());
        write!(
            f,
            "#{} [{}] {} (priority: {}, deadline: {})",
            self.id,
            if self.completed { "x" } else { " " },
            self.description,
            self.priority,
            deadline
        )
    }
}

/// Trims a description and rejects it when nothing is left.
pub fn validate_description(description: &str) -> Result<String, TaskValidationError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}

/// Parses `DD-MM-YYYY` text into a calendar date.
pub fn parse_deadline(text: &str) -> Result<NaiveDate, TaskValidationError> {
    let trimmed = text.trim();
    if !DEADLINE_RE.is_match(trimmed) {
        return Err(TaskValidationError::InvalidDeadlineFormat(text.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DEADLINE_FORMAT)
        .map_err(|_| TaskValidationError::InvalidDeadlineFormat(text.to_string()))
}

/// Parses a deadline that is being set and rejects dates before `today`.
pub fn validate_deadline(text: &str, today: NaiveDate) -> Result<NaiveDate, TaskValidationError> {
    let deadline = parse_deadline(text)?;
    if deadline < today {
        return Err(TaskValidationError::PastDeadline { deadline, today });
    }
    Ok(deadline)
}

/// Renders a date in the `DD-MM-YYYY` text form.
pub fn format_deadline(date: NaiveDate) -> String {
    date.format(DEADLINE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::{parse_deadline, validate_deadline, Priority, TaskValidationError};
    use chrono::NaiveDate;

    #[test]
    fn parse_deadline_requires_zero_padded_fields() {
        assert!(parse_deadline("5-12-2030").is_err());
        assert!(parse_deadline("2030-12-05").is_err());
        assert_eq!(
            parse_deadline(" 05-12-2030 ").unwrap(),
            NaiveDate::from_ymd_opt(2030, 12, 5).unwrap()
        );
    }

    #[test]
    fn parse_deadline_rejects_impossible_calendar_dates() {
        let err = parse_deadline("31-02-2030").unwrap_err();
        assert_eq!(
            err,
            TaskValidationError::InvalidDeadlineFormat("31-02-2030".to_string())
        );
    }

    #[test]
    fn validate_deadline_accepts_today_but_not_yesterday() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert!(validate_deadline("18-10-2026", today).is_ok());
        assert!(matches!(
            validate_deadline("17-10-2026", today),
            Err(TaskValidationError::PastDeadline { .. })
        ));
    }

    #[test]
    fn priority_parse_normalizes_user_input_but_token_is_exact() {
        assert_eq!(" HIGH ".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(Priority::from_token("High"), None);
        assert!(matches!(
            "urgent".parse::<Priority>(),
            Err(TaskValidationError::InvalidPriority(value)) if value == "urgent"
        ));
        assert!(Priority::Low < Priority::Medium && Priority::Medium < Priority::High);
    }
}
