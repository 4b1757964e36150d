//! Credit policy: how much of an expired countdown actually counts.
//!
//! The countdown value and the wall clock can disagree -- ticks are lost
//! while an app is backgrounded, and wall time keeps moving while the
//! clock is paused. The policy reconciles the two and decides whether the
//! interval clears the completion threshold. It is deliberately separate
//! from the state machine so the heuristic constants can be tuned without
//! touching any transition logic.

use serde::{Deserialize, Serialize};

/// Inputs to a single credit computation, all captured at expiry time.
#[derive(Debug, Clone, Copy)]
pub struct CreditInput {
    /// Planned duration of the expired phase, in minutes.
    pub planned_min: u64,
    /// Remaining seconds when the countdown first entered Running.
    pub initial_remaining_secs: Option<u64>,
    /// Remaining seconds at expiry (zero for a natural expiry).
    pub final_remaining_secs: u64,
    /// Wall-clock ms when the countdown first entered Running.
    pub started_at_ms: Option<i64>,
    /// Wall-clock ms now.
    pub now_ms: i64,
}

/// Tunable constants of the credit policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CreditPolicy {
    /// If the nominal countdown usage lands within this many seconds of
    /// the full planned duration, credit is clamped up to the planned
    /// duration to absorb per-minute rounding loss.
    pub full_credit_window_secs: u64,
    /// Minimum fraction of the planned duration that must be credited for
    /// the session to be persisted.
    pub min_completion_ratio: f64,
}

impl Default for CreditPolicy {
    fn default() -> Self {
        Self {
            full_credit_window_secs: 60,
            min_completion_ratio: 0.8,
        }
    }
}

impl CreditPolicy {
    /// Credited whole minutes for an expired countdown.
    ///
    /// Takes the larger of the nominal countdown usage and the wall-clock
    /// elapsed time; an interval that ran to within the rounding window of
    /// its planned duration is credited in full. Absent tracking fields
    /// (a force-complete with no recorded start) credit the full planned
    /// duration.
    pub fn credited_minutes(&self, input: CreditInput) -> u64 {
        let (Some(initial), Some(started_at)) =
            (input.initial_remaining_secs, input.started_at_ms)
        else {
            return input.planned_min;
        };
        if initial == 0 {
            return input.planned_min;
        }

        let used_secs = initial.saturating_sub(input.final_remaining_secs);
        let nominal_min = used_secs / 60;
        let wall_secs = (input.now_ms.saturating_sub(started_at) / 1000).max(0) as u64;
        let wall_min = wall_secs / 60;
        let mut credited = nominal_min.max(wall_min);

        let planned_secs = input.planned_min * 60;
        if used_secs.abs_diff(planned_secs) < self.full_credit_window_secs {
            credited = credited.max(input.planned_min);
        }
        credited
    }

    /// Whether `credited` minutes clear the completion threshold for a
    /// phase planned at `planned_min`.
    pub fn meets_threshold(&self, credited: u64, planned_min: u64) -> bool {
        credited as f64 >= planned_min as f64 * self.min_completion_ratio
    }
}
