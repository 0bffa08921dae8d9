use chrono::NaiveDate;
use tasktrack_core::{
    Completion, DeadlineChange, Priority, Task, TaskChanges, TaskRecord, TaskValidationError,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

#[test]
fn task_new_sets_defaults() {
    let task = Task::new(1, "  Write report ", "high", Some("10-12-2030"), today()).unwrap();

    assert_eq!(task.id(), 1);
    assert_eq!(task.description(), "Write report");
    assert_eq!(task.priority(), Priority::High);
    assert_eq!(task.deadline(), NaiveDate::from_ymd_opt(2030, 12, 10));
    assert!(!task.is_completed());
}

#[test]
fn task_new_reports_each_field_failure_distinctly() {
    assert_eq!(
        Task::new(1, "   ", "low", None, today()).unwrap_err(),
        TaskValidationError::EmptyDescription
    );
    assert_eq!(
        Task::new(1, "x", "urgent", None, today()).unwrap_err(),
        TaskValidationError::InvalidPriority("urgent".to_string())
    );
    assert_eq!(
        Task::new(1, "x", "low", Some("2030/12/10"), today()).unwrap_err(),
        TaskValidationError::InvalidDeadlineFormat("2030/12/10".to_string())
    );
    assert_eq!(
        Task::new(1, "x", "low", Some("01-01-2000"), today()).unwrap_err(),
        TaskValidationError::PastDeadline {
            deadline: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            today: today(),
        }
    );
}

#[test]
fn mark_completed_is_idempotent() {
    let mut task = Task::new(1, "x", "low", None, today()).unwrap();

    assert_eq!(task.mark_completed(), Completion::Completed);
    assert!(task.is_completed());
    assert_eq!(task.mark_completed(), Completion::AlreadyCompleted);
    assert!(task.is_completed());
}

#[test]
fn update_replaces_only_provided_fields() {
    let mut task = Task::new(1, "draft", "low", Some("10-12-2030"), today()).unwrap();

    let reordered = task
        .update(
            &TaskChanges {
                description: Some("final".to_string()),
                ..TaskChanges::default()
            },
            today(),
        )
        .unwrap();

    assert!(!reordered);
    assert_eq!(task.description(), "final");
    assert_eq!(task.priority(), Priority::Low);
    assert_eq!(task.deadline(), NaiveDate::from_ymd_opt(2030, 12, 10));
}

#[test]
fn update_is_all_or_nothing() {
    let mut task = Task::new(1, "draft", "low", Some("10-12-2030"), today()).unwrap();
    let before = task.clone();

    let err = task
        .update(
            &TaskChanges {
                description: Some("valid".to_string()),
                priority: Some("medium".to_string()),
                deadline: Some(DeadlineChange::Set("99-99-2030".to_string())),
                complete: true,
            },
            today(),
        )
        .unwrap_err();

    assert!(matches!(err, TaskValidationError::InvalidDeadlineFormat(_)));
    assert_eq!(task, before);
}

#[test]
fn update_reports_reordering_changes() {
    let mut task = Task::new(1, "x", "low", Some("10-12-2030"), today()).unwrap();

    let same_priority = TaskChanges {
        priority: Some("LOW".to_string()),
        ..TaskChanges::default()
    };
    assert!(!task.update(&same_priority, today()).unwrap());

    let cleared = TaskChanges {
        deadline: Some(DeadlineChange::Clear),
        ..TaskChanges::default()
    };
    assert!(task.update(&cleared, today()).unwrap());
    assert_eq!(task.deadline(), None);
}

#[test]
fn record_form_uses_expected_wire_fields() {
    let task = Task::new(3, "Plan trip", "medium", Some("05-12-2030"), today()).unwrap();

    let json = serde_json::to_value(task.to_record_form()).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["description"], "Plan trip");
    assert_eq!(json["priority"], "medium");
    assert_eq!(json["deadline"], "05-12-2030");
    assert_eq!(json["completed"], false);

    let undated = Task::new(4, "Someday", "low", None, today()).unwrap();
    let json = serde_json::to_value(undated.to_record_form()).unwrap();
    assert!(json["deadline"].is_null());
}

#[test]
fn record_form_rejects_non_lowercase_priority_tokens() {
    let value = serde_json::json!({
        "id": 1,
        "description": "x",
        "priority": "High",
        "deadline": null,
        "completed": false
    });
    assert!(serde_json::from_value::<TaskRecord>(value).is_err());
}

#[test]
fn from_record_form_accepts_past_deadlines() {
    let record = TaskRecord {
        id: 9,
        description: "Old task".to_string(),
        priority: Priority::Low,
        deadline: Some("01-01-2000".to_string()),
        completed: true,
    };

    let task = Task::from_record_form(record.clone()).unwrap();
    assert_eq!(task.deadline(), NaiveDate::from_ymd_opt(2000, 1, 1));
    assert!(task.is_completed());
    assert_eq!(task.to_record_form(), record);
}
