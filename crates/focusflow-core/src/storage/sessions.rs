//! Append-only session history.
//!
//! Completed intervals are stored as a flat JSON array at
//! `~/.config/focusflow/sessions.json`. Records are immutable once
//! appended; the only destructive operation is a bulk clear. A write
//! failure rolls the in-memory sequence back so the caller can retry the
//! same append later.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, StorageError, ValidationError};
use crate::timer::Phase;

/// One completed phase interval.
///
/// Created only by the completion evaluator; `id` and `timestamp` are
/// assigned on append when left empty/zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub phase: Phase,
    /// Credited duration in minutes. Always positive once persisted.
    #[serde(rename = "duration")]
    pub duration_min: u64,
    #[serde(default)]
    pub task_name: Option<String>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,
}

/// JSON-file-backed store of completed sessions, in insertion order.
#[derive(Debug)]
pub struct SessionStore {
    records: Vec<SessionRecord>,
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Open the store at the default data directory.
    ///
    /// A missing or unreadable file degrades to an empty history; read
    /// problems are never fatal here.
    pub fn open() -> Result<Self> {
        Ok(Self::load_or_empty(super::data_dir()?.join("sessions.json")))
    }

    /// Load from an explicit path.
    ///
    /// # Errors
    /// Returns a storage error if the file exists but cannot be parsed.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = match std::fs::read_to_string(&path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| StorageError::ReadFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })?
            }
            Err(_) => Vec::new(),
        };
        Ok(Self {
            records,
            path: Some(path),
        })
    }

    /// Load from an explicit path, falling back to an empty history on any
    /// read or parse problem.
    pub fn load_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::load(path.clone()).unwrap_or(Self {
            records: Vec::new(),
            path: Some(path),
        })
    }

    /// A store with no backing file. Appends succeed without touching disk.
    pub fn in_memory() -> Self {
        Self {
            records: Vec::new(),
            path: None,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Full sequence in insertion order.
    pub fn get_all(&self) -> &[SessionRecord] {
        &self.records
    }

    /// Up to `n` records, newest timestamp first; ties resolve to the most
    /// recently inserted.
    pub fn get_recent(&self, n: usize) -> Vec<SessionRecord> {
        let mut indexed: Vec<(usize, &SessionRecord)> = self.records.iter().enumerate().collect();
        indexed.sort_by(|(ia, a), (ib, b)| {
            b.timestamp.cmp(&a.timestamp).then(ib.cmp(ia))
        });
        indexed.into_iter().take(n).map(|(_, r)| r.clone()).collect()
    }

    /// All records with `timestamp` in `[start, end]`.
    pub fn get_range(&self, start: i64, end: i64) -> Vec<SessionRecord> {
        self.records
            .iter()
            .filter(|r| r.timestamp >= start && r.timestamp <= end)
            .cloned()
            .collect()
    }

    /// Validate, assign id/timestamp when absent, append, persist.
    ///
    /// # Errors
    /// Rejects non-positive durations before they reach the sequence. On a
    /// write failure the in-memory append is rolled back and the error
    /// surfaced so the caller can retry.
    pub fn append(&mut self, mut record: SessionRecord) -> Result<SessionRecord> {
        if record.duration_min == 0 {
            return Err(ValidationError::NonPositiveDuration {
                minutes: record.duration_min,
            }
            .into());
        }
        if record.id.is_empty() {
            record.id = uuid::Uuid::new_v4().to_string();
        }
        if record.timestamp == 0 {
            record.timestamp = chrono::Utc::now().timestamp_millis();
        }
        self.records.push(record.clone());
        if let Err(e) = self.persist() {
            self.records.pop();
            return Err(e);
        }
        Ok(record)
    }

    /// Irreversibly empty the sequence.
    pub fn clear_all(&mut self) -> Result<()> {
        let drained = std::mem::take(&mut self.records);
        if let Err(e) = self.persist() {
            self.records = drained;
            return Err(e);
        }
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(&self.records).map_err(CoreError::Json)?;
        std::fs::write(path, content).map_err(|e| StorageError::WriteFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}
