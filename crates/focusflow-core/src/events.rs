use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{ClockState, Phase};

/// Every state change in the lifecycle produces an Event.
/// Hosts (CLI, GUI shell) render or log these; nothing in the core
/// subscribes to its own events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// The countdown reached zero.
    TimerExpired {
        phase: Phase,
        at: DateTime<Utc>,
    },
    /// A completed interval was credited and persisted; the cycle has
    /// already advanced to `next_phase`.
    SessionRecorded {
        phase: Phase,
        credited_min: u64,
        next_phase: Phase,
        next_duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// An expired interval fell below the completion threshold and was
    /// discarded without persisting.
    SessionDiscarded {
        phase: Phase,
        credited_min: u64,
        at: DateTime<Utc>,
    },
    /// Manual phase switch; never writes a record.
    PhaseSwitched {
        from: Phase,
        to: Phase,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: ClockState,
        phase: Phase,
        focus_session_count: u32,
        remaining_secs: u64,
        total_secs: u64,
        task_name: Option<String>,
        at: DateTime<Utc>,
    },
}
