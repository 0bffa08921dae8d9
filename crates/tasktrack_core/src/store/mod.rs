//! Persistence adapters for the full task record set.
//!
//! # Responsibility
//! - Define the `TaskStore` contract consumed by the repository.
//! - Provide flat-file implementations (JSON array, one-record-per-line).
//!
//! # Invariants
//! - `save` always rewrites the whole record set; there are no partial writes.
//! - A target that was never saved loads as `StoreError::NotFound`, never as
//!   an empty set.
//! - File handles are scoped to one call and closed on every exit path.

use crate::model::task::TaskRecord;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub mod json_store;
pub mod line_store;

pub use json_store::JsonFileStore;
pub use line_store::LineFileStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failure surfaced unchanged to repository callers.
#[derive(Debug)]
pub enum StoreError {
    /// Target could not be read or written.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// No prior save exists at the target.
    NotFound(PathBuf),
    /// Stored content is corrupt or unparseable.
    Format { path: PathBuf, message: String },
}

impl StoreError {
    pub fn format(path: &Path, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::NotFound(path) => write!(f, "no saved tasks at `{}`", path.display()),
            Self::Format { path, message } => {
                write!(f, "corrupt task store `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::NotFound(_) | Self::Format { .. } => None,
        }
    }
}

/// Storage contract for the complete task record set.
pub trait TaskStore {
    /// Overwrites the stored set with `records`.
    fn save(&self, records: &[TaskRecord]) -> StoreResult<()>;
    /// Reads the full stored set back.
    fn load(&self) -> StoreResult<Vec<TaskRecord>>;
    /// Location named in errors about this store.
    fn path(&self) -> &Path;
}

impl<T: TaskStore + ?Sized> TaskStore for Box<T> {
    fn save(&self, records: &[TaskRecord]) -> StoreResult<()> {
        (**self).save(records)
    }

    fn load(&self) -> StoreResult<Vec<TaskRecord>> {
        (**self).load()
    }

    fn path(&self) -> &Path {
        (**self).path()
    }
}

/// On-disk layout selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreFormat {
    #[default]
    Json,
    Lines,
}

impl StoreFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Lines => "lines",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "lines" | "line" | "txt" => Some(Self::Lines),
            _ => None,
        }
    }
}

/// Opens the file store for `format` at `path`.
pub fn open_store(format: StoreFormat, path: impl Into<PathBuf>) -> Box<dyn TaskStore> {
    match format {
        StoreFormat::Json => Box::new(JsonFileStore::new(path)),
        StoreFormat::Lines => Box::new(LineFileStore::new(path)),
    }
}

/// Reads a whole store file, mapping a missing file to `NotFound`.
pub(crate) fn read_store_file(path: &Path) -> StoreResult<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            Err(StoreError::NotFound(path.to_path_buf()))
        }
        Err(err) if err.kind() == ErrorKind::InvalidData => {
            Err(StoreError::format(path, "content is not valid UTF-8"))
        }
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Replaces `path` with `contents` through a sibling temp file and rename.
pub(crate) fn write_store_file(path: &Path, contents: &str) -> StoreResult<()> {
    let staging = staging_path(path);
    fs::write(&staging, contents).map_err(|source| StoreError::Io {
        path: staging.clone(),
        source,
    })?;

    fs::rename(&staging, path).map_err(|source| {
        let _ = fs::remove_file(&staging);
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "tasks".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Emits the closing `store_*` event for one load/save call.
pub(crate) fn log_store_outcome<T>(
    event: &str,
    format: StoreFormat,
    path: &Path,
    started_at: Instant,
    result: &StoreResult<T>,
    records: usize,
) {
    match result {
        Ok(_) => info!(
            "event={} module=store status=ok format={} records={} duration_ms={}",
            event,
            format.as_str(),
            records,
            started_at.elapsed().as_millis()
        ),
        Err(StoreError::NotFound(_)) => info!(
            "event={} module=store status=missing format={} path={} duration_ms={}",
            event,
            format.as_str(),
            path.display(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event={} module=store status=error format={} path={} duration_ms={} error={}",
            event,
            format.as_str(),
            path.display(),
            started_at.elapsed().as_millis(),
            err
        ),
    }
}
