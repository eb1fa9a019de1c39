use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::fs::csv::{join_record, parse_records, CsvError};
use crate::models::{format_timestamp, Task, TaskId};

/// Header row written once at the top of a fresh log.
pub const HEADER: &str =
    "ID,Description,Estimated Duration (sec),Start Time,Finish Time,Actual Duration (sec)";

/// Default destination, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "finished_tasks.csv";

const FIELD_COUNT: usize = 6;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("could not open {path} for append: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("could not write to {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("malformed log {path}: {source}")]
    Parse { path: PathBuf, source: CsvError },
    #[error("malformed record {index} in {path}: {reason}")]
    Record {
        path: PathBuf,
        index: usize,
        reason: String,
    },
}

/// One finished task as read back from the durable log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub id: TaskId,
    pub description: String,
    pub estimate: i64,
    pub start: String,
    pub finish: String,
    pub actual_seconds: i64,
}

/// Append-only CSV record of finished tasks.
///
/// No handle is held between calls: each append checks the destination,
/// opens it, writes and closes.
#[derive(Debug, Clone)]
pub struct FinishedLog {
    path: PathBuf,
}

impl FinishedLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record for a finished task, writing the header first when
    /// the file is absent or empty.
    pub fn append(&self, task: &Task) -> Result<(), LogError> {
        let needs_header = fs::metadata(&self.path)
            .map(|meta| meta.len() == 0)
            .unwrap_or(true);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| LogError::Open {
                path: self.path.clone(),
                source,
            })?;

        let mut chunk = String::new();
        if needs_header {
            chunk.push_str(HEADER);
            chunk.push('\n');
        }
        chunk.push_str(&render_record(task));
        chunk.push('\n');

        file.write_all(chunk.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|source| LogError::Write {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(task_id = task.id(), path = %self.path.display(), "task logged");
        Ok(())
    }

    /// Read every record back. A missing file is an empty history.
    pub fn read_history(&self) -> Result<Vec<LogRecord>, LogError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(LogError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let records = parse_records(&content).map_err(|source| LogError::Parse {
            path: self.path.clone(),
            source,
        })?;

        records
            .into_iter()
            .enumerate()
            .filter(|(index, fields)| !(*index == 0 && is_header(fields)))
            .map(|(index, fields)| self.to_record(index, fields))
            .collect()
    }

    fn to_record(&self, index: usize, fields: Vec<String>) -> Result<LogRecord, LogError> {
        let bad = |reason: String| LogError::Record {
            path: self.path.clone(),
            index,
            reason,
        };

        let [id, description, estimate, start, finish, actual]: [String; FIELD_COUNT] = fields
            .try_into()
            .map_err(|fields: Vec<String>| {
                bad(format!("expected {} fields, found {}", FIELD_COUNT, fields.len()))
            })?;

        Ok(LogRecord {
            id: id.parse().map_err(|_| bad(format!("invalid id '{}'", id)))?,
            description,
            estimate: estimate
                .parse()
                .map_err(|_| bad(format!("invalid estimate '{}'", estimate)))?,
            start,
            finish,
            actual_seconds: actual
                .parse()
                .map_err(|_| bad(format!("invalid duration '{}'", actual)))?,
        })
    }
}

fn is_header(fields: &[String]) -> bool {
    fields.first().map(String::as_str) == Some("ID")
}

fn render_record(task: &Task) -> String {
    join_record([
        task.id().to_string(),
        task.description().to_string(),
        task.estimated_duration_seconds().to_string(),
        format_timestamp(task.start_time()),
        format_timestamp(task.finish_time()),
        task.actual_duration_seconds().to_string(),
    ])
}
