//! Plain-text task file.
//!
//! The file holds one record per task, fields separated by `" | "`:
//!
//! ```text
//! T | 0 | read book
//! D | 1 | return book | 2021-08-06T18:00
//! E | 0 | concert | 2021-08-21T19:30
//! ```
//!
//! [`PersistenceLog`] keeps the records in memory in the same order as the
//! [`TaskList`](crate::store::TaskList) and rewrites the whole file after
//! every mutation.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{debug, warn};

use crate::datetime::{format_canonical, parse_canonical};
use crate::error::{CommandError, RecordError, StorageError};
use crate::fields::TaskKind;
use crate::store::slot;
use crate::task::{Schedule, Task};

/// Separator between fields of a record.
pub const FIELD_SEPARATOR: &str = " | ";

/// Structured form of one line of the task file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub kind: TaskKind,
    pub done: bool,
    pub description: String,
    pub when: Option<NaiveDateTime>,
}

impl Record {
    pub fn from_task(task: &Task) -> Self {
        Record {
            kind: task.kind(),
            done: task.done,
            description: task.description.clone(),
            when: task.when(),
        }
    }

    pub fn to_task(&self) -> Task {
        let schedule = match (self.kind, self.when) {
            (TaskKind::Deadline, Some(due)) => Schedule::Deadline { due },
            (TaskKind::Event, Some(at)) => Schedule::Event { at },
            _ => Schedule::Todo,
        };
        Task {
            description: self.description.clone(),
            schedule,
            done: self.done,
        }
    }

    pub fn encode(&self) -> String {
        let flag = if self.done { "1" } else { "0" };
        let when = self.when.as_ref().map(format_canonical);
        let mut fields = vec![self.kind.tag(), flag, self.description.as_str()];
        if let Some(when) = when.as_deref() {
            fields.push(when);
        }
        fields.join(FIELD_SEPARATOR)
    }

    pub fn decode(line: &str) -> Result<Self, RecordError> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        let tag = fields.first().copied().unwrap_or_default();
        let kind = TaskKind::from_tag(tag).ok_or_else(|| RecordError::UnknownKind(tag.into()))?;

        let expected = match kind {
            TaskKind::Todo => 3,
            TaskKind::Deadline | TaskKind::Event => 4,
        };
        if fields.len() != expected {
            return Err(RecordError::FieldCount {
                expected,
                found: fields.len(),
            });
        }

        let done = match fields[1] {
            "0" => false,
            "1" => true,
            other => return Err(RecordError::BadFlag(other.into())),
        };
        let description = fields[2];
        if description.trim().is_empty() {
            return Err(RecordError::EmptyDescription);
        }
        let when = match fields.get(3) {
            Some(raw) => {
                Some(parse_canonical(raw).ok_or_else(|| RecordError::BadDate((*raw).into()))?)
            }
            None => None,
        };

        Ok(Record {
            kind,
            done,
            description: description.to_string(),
            when,
        })
    }
}

/// What happened while loading the task file.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Lines that could not be decoded and were dropped.
    pub skipped: usize,
    /// Set when the file existed but could not be read at all.
    pub unreadable: Option<StorageError>,
    /// Copy of the file taken before anything in it can be lost.
    pub backup: Option<PathBuf>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped == 0 && self.unreadable.is_none()
    }
}

/// Record mirror of the task list, backed by a text file.
#[derive(Debug)]
pub struct PersistenceLog {
    path: PathBuf,
    records: Vec<Record>,
}

impl PersistenceLog {
    /// Create the file (and its directory) if needed and load its records.
    ///
    /// Failing to create the file is an error. A file that cannot be read,
    /// or that holds lines which cannot be decoded, is copied to `backup/`
    /// first, since the next rewrite would lose that content. If the copy
    /// fails the log is not opened.
    pub fn open(path: &Path) -> Result<(Self, LoadReport), StorageError> {
        ensure_file(path)?;
        let mut report = LoadReport::default();
        let records = match fs::read(path) {
            Ok(bytes) => {
                let (records, skipped) = decode_lines(&bytes);
                report.skipped = skipped;
                records
            }
            Err(source) => {
                warn!(path = %path.display(), error = %source, "task file unreadable, starting empty");
                report.unreadable = Some(StorageError::Read {
                    path: path.to_path_buf(),
                    source,
                });
                Vec::new()
            }
        };
        if !report.is_clean() {
            let backup = create_backup(path).map_err(|source| StorageError::Backup {
                path: path.to_path_buf(),
                source,
            })?;
            warn!(backup = %backup.display(), "task file copied before rewrite");
            report.backup = Some(backup);
        }
        debug!(path = %path.display(), records = records.len(), "task file loaded");
        Ok((
            PersistenceLog {
                path: path.to_path_buf(),
                records,
            },
            report,
        ))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rebuild the tasks the records describe, in order.
    pub fn tasks(&self) -> Vec<Task> {
        self.records.iter().map(Record::to_task).collect()
    }

    pub fn append(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Replace the record at a 1-based position.
    pub fn rewrite_at(&mut self, index: i64, record: Record) -> Result<(), CommandError> {
        let slot = slot(index, self.len())?;
        self.records[slot] = record;
        Ok(())
    }

    /// Remove the record at a 1-based position.
    pub fn remove_at(&mut self, index: i64) -> Result<Record, CommandError> {
        let slot = slot(index, self.len())?;
        Ok(self.records.remove(slot))
    }

    /// Rewrite the whole file from the in-memory records.
    ///
    /// Writes to a sibling temp file and renames it over the original, so
    /// the file on disk is either the previous state or the new one.
    pub fn flush(&self) -> Result<(), StorageError> {
        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };
        let mut data = String::new();
        for record in &self.records {
            data.push_str(&record.encode());
            data.push('\n');
        }
        let tmp = self.path.with_extension("txt.tmp");
        let written = File::create(&tmp).and_then(|mut f| {
            f.write_all(data.as_bytes())?;
            f.flush()?;
            drop(f);
            fs::rename(&tmp, &self.path)
        });
        if let Err(source) = written {
            let _ = fs::remove_file(&tmp);
            return Err(write_err(source));
        }
        debug!(path = %self.path.display(), records = self.records.len(), "task file written");
        Ok(())
    }
}

fn ensure_file(path: &Path) -> Result<(), StorageError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| StorageError::Create {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}

/// Decode every non-blank line; undecodable lines are dropped and counted.
///
/// Lines are checked for UTF-8 one at a time, so a stray byte only costs
/// the line it is on.
fn decode_lines(bytes: &[u8]) -> (Vec<Record>, usize) {
    let mut records = Vec::new();
    let mut skipped = 0;
    for (number, raw) in bytes.split(|byte| *byte == b'\n').enumerate() {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        if raw.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let decoded = std::str::from_utf8(raw)
            .map_err(|_| RecordError::Encoding)
            .and_then(Record::decode);
        match decoded {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(line = number + 1, error = %err, "dropping malformed task record");
                skipped += 1;
            }
        }
    }
    (records, skipped)
}

/// Copy a task file to `backup/<timestamp>_<name>` next to it.
pub fn create_backup(path: &Path) -> Result<PathBuf, std::io::Error> {
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let backup_dir = parent_dir.join("backup");
    fs::create_dir_all(&backup_dir)?;

    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("duke.txt");
    let backup_path = backup_dir.join(format!("{timestamp}_{file_name}"));
    fs::copy(path, &backup_path)?;
    Ok(backup_path)
}
