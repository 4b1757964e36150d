//! Phase duration settings, global and per-task.
//!
//! Persisted as a single JSON document at
//! `~/.config/focusflow/settings.json`:
//!
//! ```json
//! {
//!   "focus": 25, "shortBreak": 5, "longBreak": 15,
//!   "sessionsBeforeLongBreak": 4, "darkMode": true,
//!   "taskSettings": { "Essay": { "focus": 50, ... } },
//!   "revision": 3
//! }
//! ```
//!
//! `revision` increments on every successful save so callers can detect
//! "did settings change" with one integer compare instead of a deep
//! equality check. Old files without the field read as revision 0.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, StorageError};
use crate::timer::Phase;

/// Durations of one focus cycle, in minutes, plus the long-break cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleSettings {
    #[serde(default = "default_focus")]
    pub focus: u64,
    #[serde(default = "default_short_break")]
    pub short_break: u64,
    #[serde(default = "default_long_break")]
    pub long_break: u64,
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
}

/// Full persisted settings document: the global cycle plus independent
/// per-task overrides and UI preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(flatten)]
    pub cycle: CycleSettings,
    #[serde(default = "default_dark_mode")]
    pub dark_mode: bool,
    #[serde(default)]
    pub task_settings: HashMap<String, CycleSettings>,
    #[serde(default)]
    pub revision: u64,
}

fn default_focus() -> u64 {
    25
}
fn default_short_break() -> u64 {
    5
}
fn default_long_break() -> u64 {
    15
}
fn default_sessions_before_long_break() -> u32 {
    4
}
fn default_dark_mode() -> bool {
    true
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            focus: default_focus(),
            short_break: default_short_break(),
            long_break: default_long_break(),
            sessions_before_long_break: default_sessions_before_long_break(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cycle: CycleSettings::default(),
            dark_mode: default_dark_mode(),
            task_settings: HashMap::new(),
            revision: 0,
        }
    }
}

impl CycleSettings {
    /// Planned duration in minutes for a phase under these settings.
    pub fn duration_min(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Focus => self.focus,
            Phase::ShortBreak => self.short_break,
            Phase::LongBreak => self.long_break,
        }
    }
}

/// Resolver over the settings document: effective durations per task and
/// persistence of changes.
#[derive(Debug)]
pub struct SettingsStore {
    settings: Settings,
    path: Option<PathBuf>,
}

impl SettingsStore {
    /// Open at the default data directory, falling back to defaults on a
    /// missing or unreadable file.
    pub fn open() -> Result<Self> {
        Ok(Self::load_or_default(
            super::data_dir()?.join("settings.json"),
        ))
    }

    /// Load from an explicit path. A missing file yields defaults.
    ///
    /// # Errors
    /// Returns a storage error if the file exists but cannot be parsed.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = match std::fs::read_to_string(&path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| StorageError::ReadFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })?
            }
            Err(_) => Settings::default(),
        };
        Ok(Self {
            settings,
            path: Some(path),
        })
    }

    pub fn load_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::load(path.clone()).unwrap_or(Self {
            settings: Settings::default(),
            path: Some(path),
        })
    }

    /// A store with no backing file (hosts and tests).
    pub fn in_memory() -> Self {
        Self {
            settings: Settings::default(),
            path: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn revision(&self) -> u64 {
        self.settings.revision
    }

    pub fn dark_mode(&self) -> bool {
        self.settings.dark_mode
    }

    /// The effective cycle for a task context: its override when the name
    /// is non-empty and one exists, the global cycle otherwise.
    pub fn effective_cycle(&self, task_name: Option<&str>) -> &CycleSettings {
        if let Some(name) = task_name {
            if !name.is_empty() {
                if let Some(cycle) = self.settings.task_settings.get(name) {
                    return cycle;
                }
            }
        }
        &self.settings.cycle
    }

    /// Effective planned duration in minutes for a phase.
    pub fn resolve(&self, phase: Phase, task_name: Option<&str>) -> u64 {
        self.effective_cycle(task_name).duration_min(phase)
    }

    /// Effective sessions-before-long-break threshold.
    pub fn threshold(&self, task_name: Option<&str>) -> u32 {
        self.effective_cycle(task_name).sessions_before_long_break
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Overwrite the global cycle, preserving all task overrides.
    pub fn save_global(&mut self, cycle: CycleSettings) -> Result<()> {
        self.mutate(|s| s.cycle = cycle)
    }

    /// Write one task's override, creating the map entry as needed and
    /// leaving the global cycle untouched.
    pub fn save_for_task(&mut self, task_name: &str, cycle: CycleSettings) -> Result<()> {
        let name = task_name.to_string();
        self.mutate(move |s| {
            s.task_settings.insert(name, cycle);
        })
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) -> Result<()> {
        self.mutate(|s| s.dark_mode = dark_mode)
    }

    /// Apply a change, bump the revision, persist. A failed write restores
    /// the prior in-memory state so the caller sees a clean failure.
    fn mutate(&mut self, f: impl FnOnce(&mut Settings)) -> Result<()> {
        let previous = self.settings.clone();
        f(&mut self.settings);
        self.settings.revision += 1;
        if let Err(e) = self.persist() {
            self.settings = previous;
            return Err(e);
        }
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(&self.settings).map_err(CoreError::Json)?;
        std::fs::write(path, content).map_err(|e| StorageError::WriteFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let store = SettingsStore::in_memory();
        assert_eq!(store.resolve(Phase::Focus, None), 25);
        assert_eq!(store.resolve(Phase::ShortBreak, None), 5);
        assert_eq!(store.resolve(Phase::LongBreak, None), 15);
        assert_eq!(store.threshold(None), 4);
        assert!(store.dark_mode());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn task_override_wins_when_present() {
        let mut store = SettingsStore::in_memory();
        store
            .save_for_task(
                "Essay",
                CycleSettings {
                    focus: 50,
                    short_break: 10,
                    long_break: 20,
                    sessions_before_long_break: 2,
                },
            )
            .unwrap();
        assert_eq!(store.resolve(Phase::Focus, Some("Essay")), 50);
        assert_eq!(store.threshold(Some("Essay")), 2);
        // Other tasks and the no-task context still see the global cycle.
        assert_eq!(store.resolve(Phase::Focus, Some("Reading")), 25);
        assert_eq!(store.resolve(Phase::Focus, None), 25);
        assert_eq!(store.resolve(Phase::Focus, Some("")), 25);
    }

    #[test]
    fn save_global_preserves_overrides() {
        let mut store = SettingsStore::in_memory();
        store
            .save_for_task("Essay", CycleSettings { focus: 50, ..Default::default() })
            .unwrap();
        store
            .save_global(CycleSettings { focus: 30, ..Default::default() })
            .unwrap();
        assert_eq!(store.resolve(Phase::Focus, None), 30);
        assert_eq!(store.resolve(Phase::Focus, Some("Essay")), 50);
    }

    #[test]
    fn every_save_bumps_revision() {
        let mut store = SettingsStore::in_memory();
        store.save_global(CycleSettings::default()).unwrap();
        store.set_dark_mode(false).unwrap();
        store
            .save_for_task("Essay", CycleSettings::default())
            .unwrap();
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn save_then_resolve_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        {
            let mut store = SettingsStore::load_or_default(&path);
            store
                .save_for_task("Essay", CycleSettings { focus: 45, ..Default::default() })
                .unwrap();
        }
        let store = SettingsStore::load(&path).unwrap();
        assert_eq!(store.resolve(Phase::Focus, Some("Essay")), 45);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn failed_write_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SettingsStore {
            settings: Settings::default(),
            path: Some(dir.path().to_path_buf()),
        };
        let err = store
            .save_global(CycleSettings { focus: 99, ..Default::default() })
            .unwrap_err();
        assert!(matches!(err, CoreError::Storage(_)));
        assert_eq!(store.resolve(Phase::Focus, None), 25);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn settings_json_shape() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["focus"], 25);
        assert_eq!(json["shortBreak"], 5);
        assert_eq!(json["longBreak"], 15);
        assert_eq!(json["sessionsBeforeLongBreak"], 4);
        assert_eq!(json["darkMode"], true);
        assert!(json["taskSettings"].is_object());
    }
}
