//! Task list collaborator.
//!
//! The session lifecycle only consumes task names as a settings-resolution
//! context; the list itself lives here as a plain JSON-file store at
//! `~/.config/focusflow/tasks.json`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, StorageError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    /// Epoch milliseconds.
    pub created_at: i64,
}

#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    path: Option<PathBuf>,
}

impl TaskStore {
    pub fn open() -> Result<Self> {
        Ok(Self::load_or_empty(super::data_dir()?.join("tasks.json")))
    }

    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tasks = match std::fs::read_to_string(&path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| StorageError::ReadFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })?
            }
            Err(_) => Vec::new(),
        };
        Ok(Self {
            tasks,
            path: Some(path),
        })
    }

    pub fn load_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::load(path.clone()).unwrap_or(Self {
            tasks: Vec::new(),
            path: Some(path),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            tasks: Vec::new(),
            path: None,
        }
    }

    pub fn get_tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Add a task to the front of the list.
    pub fn add(&mut self, text: &str) -> Result<Task> {
        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.trim().to_string(),
            completed: false,
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        self.tasks.insert(0, task.clone());
        if let Err(e) = self.persist() {
            self.tasks.remove(0);
            return Err(e);
        }
        Ok(task)
    }

    /// Flip a task's completed flag. Returns false if the id is unknown.
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        task.completed = !task.completed;
        if let Err(e) = self.persist() {
            if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
                task.completed = !task.completed;
            }
            return Err(e);
        }
        Ok(true)
    }

    /// Remove a task by id. Returns false if the id is unknown.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let Some(pos) = self.tasks.iter().position(|t| t.id == id) else {
            return Ok(false);
        };
        let removed = self.tasks.remove(pos);
        if let Err(e) = self.persist() {
            self.tasks.insert(pos, removed);
            return Err(e);
        }
        Ok(true)
    }

    pub fn clear_all(&mut self) -> Result<()> {
        let drained = std::mem::take(&mut self.tasks);
        if let Err(e) = self.persist() {
            self.tasks = drained;
            return Err(e);
        }
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(&self.tasks).map_err(CoreError::Json)?;
        std::fs::write(path, content).map_err(|e| StorageError::WriteFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}
