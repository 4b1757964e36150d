//! The focus session value object.
//!
//! `FocusSession` bundles the countdown clock, the phase cycle and the
//! selected task context into one serializable unit. Hosts persist it
//! between invocations (CLI) or across remounts (GUI shell) and drive it
//! with the UI-facing operations here; the free-floating tracking refs of
//! a typical timer screen all live as explicit fields inside.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::storage::SettingsStore;

use super::clock::{now_ms, ClockState, SessionClock};
use super::phase::{Phase, PhaseController};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusSession {
    clock: SessionClock,
    phases: PhaseController,
    #[serde(default)]
    task_name: Option<String>,
}

impl FocusSession {
    /// A fresh session: Focus phase, countdown armed from the settings.
    pub fn new(settings: &SettingsStore) -> Self {
        let phases = PhaseController::new();
        let mut session = Self {
            clock: SessionClock::new(settings.resolve(phases.phase(), None)),
            phases,
            task_name: None,
        };
        session.phases.set_settings_revision(settings.revision());
        session
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub(crate) fn clock_mut(&mut self) -> &mut SessionClock {
        &mut self.clock
    }

    pub fn phases(&self) -> &PhaseController {
        &self.phases
    }

    pub fn phase(&self) -> Phase {
        self.phases.phase()
    }

    pub fn task_name(&self) -> Option<&str> {
        self.task_name.as_deref()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.clock.state(),
            phase: self.phases.phase(),
            focus_session_count: self.phases.focus_session_count(),
            remaining_secs: self.clock.remaining_secs(),
            total_secs: self.clock.total_secs(),
            task_name: self.task_name.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        self.start_at(now_ms())
    }

    pub fn start_at(&mut self, now_ms: i64) -> Option<Event> {
        if !self.clock.start_at(now_ms) {
            return None;
        }
        Some(Event::TimerStarted {
            phase: self.phases.phase(),
            remaining_secs: self.clock.remaining_secs(),
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.clock.pause() {
            return None;
        }
        Some(Event::TimerPaused {
            phase: self.phases.phase(),
            remaining_secs: self.clock.remaining_secs(),
            at: Utc::now(),
        })
    }

    /// Back to Idle with the full planned duration; discards all tracking
    /// so the abandoned interval can never be recorded.
    pub fn reset(&mut self) -> Event {
        self.clock.reset();
        Event::TimerReset {
            phase: self.phases.phase(),
            remaining_secs: self.clock.remaining_secs(),
            at: Utc::now(),
        }
    }

    /// One-second tick while running.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.clock.tick() {
            return None;
        }
        Some(Event::TimerExpired {
            phase: self.phases.phase(),
            at: Utc::now(),
        })
    }

    /// Apply wall-clock time elapsed since the last tick (backgrounding,
    /// host restart).
    pub fn catch_up(&mut self, now_ms: i64) -> Option<Event> {
        if !self.clock.catch_up(now_ms) {
            return None;
        }
        Some(Event::TimerExpired {
            phase: self.phases.phase(),
            at: Utc::now(),
        })
    }

    /// Jump straight to expiry. With no recorded start the evaluator will
    /// credit the full planned duration.
    pub fn force_complete(&mut self) -> Option<Event> {
        if self.clock.state() == ClockState::Expired {
            return None;
        }
        self.clock.force_expire();
        Some(Event::TimerExpired {
            phase: self.phases.phase(),
            at: Utc::now(),
        })
    }

    /// Manual phase switch: same transition table as automatic
    /// advancement, no record written, clock left not-Running on the new
    /// phase's full duration.
    pub fn switch(&mut self, settings: &SettingsStore) -> Event {
        let from = self.phases.phase();
        self.clock.pause();
        let to = self.advance_phase(settings);
        Event::PhaseSwitched {
            from,
            to,
            duration_secs: self.clock.total_secs(),
            at: Utc::now(),
        }
    }

    /// Apply the transition table and re-arm the clock for the entered
    /// phase's resolved duration.
    pub(crate) fn advance_phase(&mut self, settings: &SettingsStore) -> Phase {
        let threshold = settings.threshold(self.task_name());
        let next = self.phases.advance(threshold);
        self.phases.set_settings_revision(settings.revision());
        self.clock.arm(settings.resolve(next, self.task_name()));
        next
    }

    /// Select (or clear) the task context. Re-arms a non-running countdown
    /// so a task-specific duration takes effect immediately.
    pub fn select_task(&mut self, task_name: Option<String>, settings: &SettingsStore) {
        self.task_name = task_name.filter(|n| !n.trim().is_empty());
        self.phases.set_settings_revision(settings.revision());
        if matches!(self.clock.state(), ClockState::Idle | ClockState::Paused) {
            self.clock
                .arm(settings.resolve(self.phases.phase(), self.task_name()));
        }
    }

    /// Reconcile with the settings store after a remount or host restart.
    ///
    /// Unchanged revision: the existing countdown is preserved exactly
    /// (the still-unstarted-phase case). Changed revision: a non-running
    /// countdown is re-armed with the new duration; a running or expired
    /// one is left alone until its own transition.
    pub fn sync_settings(&mut self, settings: &SettingsStore) -> bool {
        if self.phases.settings_revision() == settings.revision() {
            return false;
        }
        self.phases.set_settings_revision(settings.revision());
        if matches!(self.clock.state(), ClockState::Idle | ClockState::Paused) {
            self.clock
                .arm(settings.resolve(self.phases.phase(), self.task_name()));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::CycleSettings;

    #[test]
    fn new_session_arms_focus_duration() {
        let settings = SettingsStore::in_memory();
        let session = FocusSession::new(&settings);
        assert_eq!(session.phase(), Phase::Focus);
        assert_eq!(session.clock().remaining_secs(), 25 * 60);
        assert_eq!(session.clock().state(), ClockState::Idle);
    }

    #[test]
    fn switch_while_running_stops_clock_and_changes_phase() {
        let settings = SettingsStore::in_memory();
        let mut session = FocusSession::new(&settings);
        session.start_at(0);
        let event = session.switch(&settings);
        assert!(!session.clock().is_running());
        assert_eq!(session.phase(), Phase::ShortBreak);
        assert_eq!(session.clock().remaining_secs(), 5 * 60);
        match event {
            Event::PhaseSwitched { from, to, .. } => {
                assert_eq!(from, Phase::Focus);
                assert_eq!(to, Phase::ShortBreak);
            }
            other => panic!("expected PhaseSwitched, got {other:?}"),
        }
    }

    #[test]
    fn switch_uses_the_completion_transition_table() {
        let mut settings = SettingsStore::in_memory();
        settings
            .save_global(CycleSettings {
                sessions_before_long_break: 2,
                ..Default::default()
            })
            .unwrap();
        let mut session = FocusSession::new(&settings);
        session.switch(&settings); // Focus -> ShortBreak (count 1)
        session.switch(&settings); // ShortBreak -> Focus
        session.switch(&settings); // Focus -> LongBreak (count hits 2)
        assert_eq!(session.phase(), Phase::LongBreak);
        assert_eq!(session.phases().focus_session_count(), 0);
    }

    #[test]
    fn sync_settings_preserves_countdown_when_revision_unchanged() {
        let settings = SettingsStore::in_memory();
        let mut session = FocusSession::new(&settings);
        session.start_at(0);
        for _ in 0..10 {
            session.tick();
        }
        session.pause();
        // Remount with nothing changed: remaining value survives.
        assert!(!session.sync_settings(&settings));
        assert_eq!(session.clock().remaining_secs(), 25 * 60 - 10);
    }

    #[test]
    fn sync_settings_rearms_idle_clock_on_new_revision() {
        let mut settings = SettingsStore::in_memory();
        let mut session = FocusSession::new(&settings);
        settings
            .save_global(CycleSettings { focus: 30, ..Default::default() })
            .unwrap();
        assert!(session.sync_settings(&settings));
        assert_eq!(session.clock().remaining_secs(), 30 * 60);
    }

    #[test]
    fn sync_settings_leaves_running_clock_alone() {
        let mut settings = SettingsStore::in_memory();
        let mut session = FocusSession::new(&settings);
        session.start_at(0);
        session.tick();
        settings
            .save_global(CycleSettings { focus: 30, ..Default::default() })
            .unwrap();
        assert!(session.sync_settings(&settings));
        assert_eq!(session.clock().remaining_secs(), 25 * 60 - 1);
        assert!(session.clock().is_running());
    }

    #[test]
    fn select_task_applies_override_duration() {
        let mut settings = SettingsStore::in_memory();
        settings
            .save_for_task("Essay", CycleSettings { focus: 50, ..Default::default() })
            .unwrap();
        let mut session = FocusSession::new(&settings);
        session.select_task(Some("Essay".into()), &settings);
        assert_eq!(session.task_name(), Some("Essay"));
        assert_eq!(session.clock().remaining_secs(), 50 * 60);
        // Blank names clear the context.
        session.select_task(Some("  ".into()), &settings);
        assert_eq!(session.task_name(), None);
        assert_eq!(session.clock().remaining_secs(), 25 * 60);
    }

    #[test]
    fn start_is_idempotent_through_the_session() {
        let settings = SettingsStore::in_memory();
        let mut session = FocusSession::new(&settings);
        assert!(session.start_at(0).is_some());
        assert!(session.start_at(1_000).is_none());
    }
}
