use chrono::NaiveDate;
use std::fs;
use tasktrack_core::{
    open_store, JsonFileStore, LineFileStore, Priority, RepoError, StoreError, StoreFormat,
    TaskRecord, TaskRepository, TaskService, TaskStore,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn sample_repo() -> TaskRepository {
    let mut repo = TaskRepository::with_clock(today);
    repo.add(1, "Write report", "high", Some("10-12-2030")).unwrap();
    repo.add(2, "Buy milk, eggs", "low", Some("05-12-2030")).unwrap();
    repo.add(3, "Plan trip", "medium", None).unwrap();
    repo.mark_completed(2).unwrap();
    repo
}

#[test]
fn json_store_round_trip_preserves_records() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("tasks.json"));
    let repo = sample_repo();

    repo.save_to(&store).unwrap();
    let mut loaded = TaskRepository::with_clock(today);
    loaded.load_from(&store).unwrap();

    assert_eq!(loaded.records(), repo.records());
    assert!(!dir.path().join("tasks.json.tmp").exists());
}

#[test]
fn json_store_writes_null_for_absent_deadline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    sample_repo().save_to(&JsonFileStore::new(&path)).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[1]["completed"], true);
    assert!(items[2]["deadline"].is_null());
}

#[test]
fn line_store_round_trip_keeps_commas_in_descriptions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.txt");
    let store = LineFileStore::new(&path);
    let repo = sample_repo();

    repo.save_to(&store).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("2,Buy milk, eggs,low,05-12-2030,True"));
    assert!(text.contains("3,Plan trip,medium,None,False"));

    let mut loaded = TaskRepository::with_clock(today);
    loaded.load_from(&store).unwrap();
    assert_eq!(loaded.records(), repo.records());
}

#[test]
fn save_overwrites_previous_contents() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("tasks.json"));

    sample_repo().save_to(&store).unwrap();
    let mut smaller = TaskRepository::with_clock(today);
    smaller.add(9, "Only task", "low", None).unwrap();
    smaller.save_to(&store).unwrap();

    let records = store.load().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, 9);
}

#[test]
fn missing_file_loads_as_not_found() {
    let dir = tempfile::tempdir().unwrap();

    for format in [StoreFormat::Json, StoreFormat::Lines] {
        let store = open_store(format, dir.path().join("never-saved"));
        assert!(matches!(store.load(), Err(StoreError::NotFound(_))));
    }
}

#[test]
fn corrupt_content_is_a_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("tasks.json");
    fs::write(&json_path, "{ not json").unwrap();
    assert!(matches!(
        JsonFileStore::new(&json_path).load(),
        Err(StoreError::Format { .. })
    ));

    let line_path = dir.path().join("tasks.txt");
    fs::write(&line_path, "1,ok,low,None,False\nbroken line\n").unwrap();
    let err = LineFileStore::new(&line_path).load().unwrap_err();
    assert!(err.to_string().contains("line 2"), "unexpected error: {err}");
    assert!(matches!(err, StoreError::Format { ref path, .. } if path == &line_path));
}

#[test]
fn invalid_stored_records_are_reported_as_corrupt_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("tasks.json"));
    let duplicate = TaskRecord {
        id: 1,
        description: "twice".to_string(),
        priority: Priority::Low,
        deadline: None,
        completed: false,
    };
    store.save(&[duplicate.clone(), duplicate]).unwrap();

    let mut repo = sample_repo();
    let before = repo.records();
    let err = repo.load_from(&store).unwrap_err();

    match err {
        RepoError::Store(StoreError::Format { path, message }) => {
            assert_eq!(path.as_path(), store.path());
            assert!(message.contains("more than once"), "unexpected message: {message}");
        }
        other => panic!("expected corrupt store error, got {other:?}"),
    }
    assert_eq!(repo.records(), before);
}

#[test]
fn past_deadlines_survive_a_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = LineFileStore::new(dir.path().join("tasks.txt"));
    fs::write(store.path(), "5,Old errand,low,01-01-2000,False\n").unwrap();

    let mut repo = TaskRepository::with_clock(today);
    repo.load_from(&store).unwrap();
    assert_eq!(
        repo.get(5).unwrap().deadline(),
        NaiveDate::from_ymd_opt(2000, 1, 1)
    );
}

#[test]
fn unwritable_target_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("missing-dir").join("tasks.json"));

    let err = sample_repo().save_to(&store).unwrap_err();
    assert!(matches!(err, RepoError::Store(StoreError::Io { .. })));
}

#[test]
fn service_open_starts_empty_without_prior_save() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("tasks.json"));

    let mut service =
        TaskService::open_with(TaskRepository::with_clock(today), store.clone()).unwrap();
    assert!(service.repo().is_empty());

    service
        .repo_mut()
        .add(1, "From service", "medium", Some("01-01-2031"))
        .unwrap();
    service.save().unwrap();

    let reopened = TaskService::open_with(TaskRepository::with_clock(today), store).unwrap();
    assert_eq!(reopened.repo().len(), 1);
    assert_eq!(
        reopened.summary_text(),
        "Total Tasks: 1\nCompleted Tasks: 0\nPending Tasks: 1"
    );
}

#[test]
fn service_open_propagates_corrupt_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    fs::write(&path, "[{\"id\": 1}]").unwrap();

    let result = TaskService::open(JsonFileStore::new(&path));
    assert!(matches!(
        result,
        Err(RepoError::Store(StoreError::Format { .. }))
    ));
}
