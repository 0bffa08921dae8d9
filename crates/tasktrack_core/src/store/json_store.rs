//! JSON array file store.

use super::{log_store_outcome, read_store_file, write_store_file, StoreError, StoreFormat};
use super::{StoreResult, TaskStore};
use crate::model::task::TaskRecord;
use log::info;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Stores the record set as one pretty-printed JSON array.
///
/// Absent deadlines are written as `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TaskStore for JsonFileStore {
    fn save(&self, records: &[TaskRecord]) -> StoreResult<()> {
        let started_at = Instant::now();
        info!("event=store_save module=store status=start format=json");

        let result = serde_json::to_string_pretty(records)
            .map_err(|err| {
                StoreError::format(&self.path, format!("failed to encode tasks: {err}"))
            })
            .and_then(|json| write_store_file(&self.path, &json));

        log_store_outcome(
            "store_save",
            StoreFormat::Json,
            &self.path,
            started_at,
            &result,
            records.len(),
        );
        result
    }

    fn load(&self) -> StoreResult<Vec<TaskRecord>> {
        let started_at = Instant::now();
        info!("event=store_load module=store status=start format=json");

        let result = read_store_file(&self.path).and_then(|text| {
            serde_json::from_str::<Vec<TaskRecord>>(&text)
                .map_err(|err| StoreError::format(&self.path, err.to_string()))
        });

        let count = result.as_ref().map_or(0, Vec::len);
        log_store_outcome(
            "store_load",
            StoreFormat::Json,
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
