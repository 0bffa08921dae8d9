//! One-record-per-line text file store.
//!
//! Line layout: `id,description,priority,deadline,completed`, where
//! `deadline` is `DD-MM-YYYY` or `None` and `completed` is `True`/`False`.
//! The id is split off the front and the three trailing fields off the back,
//! so descriptions may contain commas but not line breaks.

use super::{log_store_outcome, read_store_file, write_store_file, StoreError, StoreFormat};
use super::{StoreResult, TaskStore};
use crate::model::task::{Priority, TaskRecord, NO_DEADLINE};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Instant;

const COMPLETED_TRUE: &str = "True";
const COMPLETED_FALSE: &str = "False";

/// Stores the record set as comma-separated lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFileStore {
    path: PathBuf,
}

impl LineFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TaskStore for LineFileStore {
    fn save(&self, records: &[TaskRecord]) -> StoreResult<()> {
        let started_at = Instant::now();
        info!("event=store_save module=store status=start format=lines");

        let result = encode_lines(&self.path, records).and_then(|text| write_store_file(&self.path, &text));

        log_store_outcome(
            "store_save",
            StoreFormat::Lines,
            &self.path,
            started_at,
            &result,
            records.len(),
        );
        result
    }

    fn load(&self) -> StoreResult<Vec<TaskRecord>> {
        let started_at = Instant::now();
        info!("event=store_load module=store status=start format=lines");

        let result = read_store_file(&self.path).and_then(|text| decode_lines(&self.path, &text));

        let count = result.as_ref().map_or(0, Vec::len);
        log_store_outcome(
            "store_load",
            StoreFormat::Lines,
            &self.path,
            started_at,
            &result,
            count,
        );
        result
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

fn encode_lines(path: &Path, records: &[TaskRecord]) -> StoreResult<String> {
    let mut text = String::new();
    for record in records {
        if record.description.contains(['\n', '\r']) {
            return Err(StoreError::format(
                path,
                format!("task {} description contains a line break", record.id),
            ));
        }
        text.push_str(&format!(
            "{},{},{},{},{}\n",
            record.id,
            record.description,
            record.priority,
            record.deadline.as_deref().unwrap_or(NO_DEADLINE),
            if record.completed {
                COMPLETED_TRUE
            } else {
                COMPLETED_FALSE
            }
        ));
    }
    Ok(text)
}

fn decode_lines(path: &Path, text: &str) -> StoreResult<Vec<TaskRecord>> {
    let mut records = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = decode_line(line).map_err(|message| {
            StoreError::format(path, format!("line {}: {message}", index + 1))
        })?;
        records.push(record);
    }
    Ok(records)
}

fn decode_line(line: &str) -> Result<TaskRecord, String> {
    let (id_text, rest) = line
        .split_once(',')
        .ok_or_else(|| "expected 5 comma-separated fields".to_string())?;
    let mut tail = rest.rsplitn(4, ',');
    let (Some(completed), Some(deadline), Some(priority), Some(description)) =
        (tail.next(), tail.next(), tail.next(), tail.next())
    else {
        return Err("expected 5 comma-separated fields".to_string());
    };

    let id = id_text
        .trim()
        .parse()
        .map_err(|_| format!("invalid task id `{id_text}`"))?;
    let priority = Priority::from_token(priority.trim())
        .ok_or_else(|| format!("invalid priority `{priority}`"))?;
    let deadline = match deadline.trim() {
        NO_DEADLINE => None,
        value => Some(value.to_string()),
    };
    let completed = match completed.trim() {
        COMPLETED_TRUE => true,
        COMPLETED_FALSE => false,
        other => return Err(format!("invalid completed flag `{other}`")),
    };

    Ok(TaskRecord {
        id,
        description: description.to_string(),
        priority,
        deadline,
        completed,
    })
}
