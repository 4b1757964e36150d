//! Countdown clock for a single phase interval.
//!
//! The clock is driven externally: a host calls `tick()` once per second
//! while it is running, or `catch_up()` with the current wall-clock time
//! after a gap (backgrounding, process restart). It holds no thread and no
//! timer of its own.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!           |
//!           v (remaining == 0)
//!        Expired
//! ```
//!
//! The first transition into `Running` for a given countdown instance
//! records `started_at` and `initial_remaining`; the completion evaluator
//! later reconciles the nominal countdown against wall-clock elapsed time
//! from exactly these two fields. `reset` and `arm` discard them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockState {
    Idle,
    Running,
    Paused,
    Expired,
}

/// Countdown over one phase's planned duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClock {
    state: ClockState,
    /// Planned duration of the current phase in minutes.
    planned_min: u64,
    /// Remaining time in seconds.
    remaining_secs: u64,
    /// Wall-clock ms when this countdown first entered `Running`.
    #[serde(default)]
    started_at_ms: Option<i64>,
    /// Remaining seconds at that first `Running` transition.
    #[serde(default)]
    initial_remaining_secs: Option<u64>,
    /// Wall-clock ms of the last applied tick, for catch-up after a gap.
    #[serde(default)]
    last_tick_ms: Option<i64>,
}

impl SessionClock {
    /// A fresh countdown in `Idle` with the full planned duration.
    pub fn new(planned_min: u64) -> Self {
        Self {
            state: ClockState::Idle,
            planned_min,
            remaining_secs: planned_min * 60,
            started_at_ms: None,
            initial_remaining_secs: None,
            last_tick_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn planned_min(&self) -> u64 {
        self.planned_min
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.planned_min * 60
    }

    pub fn started_at_ms(&self) -> Option<i64> {
        self.started_at_ms
    }

    pub fn initial_remaining_secs(&self) -> Option<u64> {
        self.initial_remaining_secs
    }

    /// 0.0 .. 1.0 progress within the current countdown.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Idle/Paused -> Running. Repeated calls while already running are
    /// no-ops. Returns whether a transition happened.
    pub fn start_at(&mut self, now_ms: i64) -> bool {
        match self.state {
            ClockState::Idle | ClockState::Paused => {
                if self.started_at_ms.is_none() {
                    self.started_at_ms = Some(now_ms);
                    self.initial_remaining_secs = Some(self.remaining_secs);
                }
                self.state = ClockState::Running;
                self.last_tick_ms = Some(now_ms);
                true
            }
            ClockState::Running | ClockState::Expired => false,
        }
    }

    pub fn start(&mut self) -> bool {
        self.start_at(now_ms())
    }

    /// Running -> Paused. Retains the remaining value and `started_at`.
    pub fn pause(&mut self) -> bool {
        if self.state != ClockState::Running {
            return false;
        }
        self.state = ClockState::Paused;
        self.last_tick_ms = None;
        true
    }

    /// Any state -> Idle with the full planned duration restored and all
    /// tracking discarded. A reset-before-expiry interval never produces
    /// a record because the tracking the evaluator needs is gone along
    /// with the `Expired` state it requires.
    pub fn reset(&mut self) {
        self.state = ClockState::Idle;
        self.remaining_secs = self.planned_min * 60;
        self.clear_tracking();
    }

    /// Re-initialize for a new phase duration. Same effect as constructing
    /// a fresh clock.
    pub fn arm(&mut self, planned_min: u64) {
        self.planned_min = planned_min;
        self.reset();
    }

    /// One-second tick. Running only. Returns true when the countdown
    /// expired on this tick.
    pub fn tick(&mut self) -> bool {
        if self.state != ClockState::Running {
            return false;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if let Some(last) = self.last_tick_ms {
            self.last_tick_ms = Some(last + 1000);
        }
        if self.remaining_secs == 0 {
            self.expire();
            return true;
        }
        false
    }

    /// Apply all whole seconds elapsed since the last tick in one step.
    /// Used after backgrounding or between host invocations. Returns true
    /// when the countdown expired.
    pub fn catch_up(&mut self, now_ms: i64) -> bool {
        if self.state != ClockState::Running {
            return false;
        }
        let Some(last) = self.last_tick_ms else {
            self.last_tick_ms = Some(now_ms);
            return false;
        };
        let elapsed_secs = (now_ms.saturating_sub(last) / 1000).max(0) as u64;
        if elapsed_secs == 0 {
            return false;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(elapsed_secs);
        self.last_tick_ms = Some(last + (elapsed_secs as i64) * 1000);
        if self.remaining_secs == 0 {
            self.expire();
            return true;
        }
        false
    }

    /// Jump straight to `Expired`, tracking left as-is. Without tracking
    /// fields the evaluator credits the full planned duration.
    pub fn force_expire(&mut self) {
        self.remaining_secs = 0;
        self.expire();
    }

    /// Discard start-time tracking without touching state or remaining.
    pub fn clear_tracking(&mut self) {
        self.started_at_ms = None;
        self.initial_remaining_secs = None;
        self.last_tick_ms = None;
    }

    fn expire(&mut self) {
        self.state = ClockState::Expired;
        self.last_tick_ms = None;
    }
}

pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
