//! Completion evaluation: turning an expired countdown into a persisted
//! session record, or discarding it.
//!
//! Invoked once per expiry. A check-and-set guard blocks re-entrant
//! evaluation of the same expiry, and every settled evaluation re-arms the
//! clock before the guard is released (next phase on a record, same phase
//! on a discard), so duplicate invocations can never append a record. A
//! store failure releases the guard with tracking intact so the same
//! completion can be retried.

use super::clock::{now_ms, ClockState};
use super::credit::{CreditInput, CreditPolicy};
use super::phase::Phase;
use super::session::FocusSession;
use crate::error::Result;
use crate::storage::{SessionRecord, SessionStore, SettingsStore};

/// What a single evaluation decided.
#[derive(Debug, Clone)]
pub enum CompletionOutcome {
    /// Record persisted; the cycle already advanced and the clock is armed
    /// for the next phase.
    Recorded {
        record: SessionRecord,
        next_phase: Phase,
        next_duration_secs: u64,
    },
    /// Credited time fell below the completion threshold; nothing was
    /// persisted and the clock was re-armed for the same phase. Not an
    /// error.
    TooShort { credited_min: u64 },
    /// The clock is not expired; there is nothing to evaluate.
    NotExpired,
    /// Another evaluation of this expiry is already in flight.
    InFlight,
}

#[derive(Debug)]
pub struct CompletionEvaluator {
    policy: CreditPolicy,
    evaluating: bool,
}

impl CompletionEvaluator {
    pub fn new() -> Self {
        Self::with_policy(CreditPolicy::default())
    }

    pub fn with_policy(policy: CreditPolicy) -> Self {
        Self {
            policy,
            evaluating: false,
        }
    }

    pub fn policy(&self) -> &CreditPolicy {
        &self.policy
    }

    /// Evaluate the session's expired countdown against the current wall
    /// clock.
    pub fn handle_expiry(
        &mut self,
        session: &mut FocusSession,
        store: &mut SessionStore,
        settings: &SettingsStore,
    ) -> Result<CompletionOutcome> {
        self.handle_expiry_at(session, store, settings, now_ms())
    }

    /// Evaluate at an explicit `now` (epoch ms).
    ///
    /// # Errors
    /// Propagates a store append failure; the phase does not advance and
    /// tracking stays in place so the caller can invoke again.
    pub fn handle_expiry_at(
        &mut self,
        session: &mut FocusSession,
        store: &mut SessionStore,
        settings: &SettingsStore,
        now_ms: i64,
    ) -> Result<CompletionOutcome> {
        if session.clock().state() != ClockState::Expired {
            return Ok(CompletionOutcome::NotExpired);
        }
        if self.evaluating {
            return Ok(CompletionOutcome::InFlight);
        }
        self.evaluating = true;

        let phase = session.phase();
        let planned_min = session.clock().planned_min();
        let credited_min = self.policy.credited_minutes(CreditInput {
            planned_min,
            initial_remaining_secs: session.clock().initial_remaining_secs(),
            final_remaining_secs: session.clock().remaining_secs(),
            started_at_ms: session.clock().started_at_ms(),
            now_ms,
        });

        if !self.policy.meets_threshold(credited_min, planned_min) {
            // Too short to count. Re-arm the clock for the same phase so
            // this consumed expiry can never be evaluated again.
            session.clock_mut().reset();
            self.evaluating = false;
            return Ok(CompletionOutcome::TooShort { credited_min });
        }

        let record = SessionRecord {
            id: String::new(),
            phase,
            duration_min: credited_min,
            task_name: session.task_name().map(str::to_string),
            timestamp: now_ms,
        };
        match store.append(record) {
            Ok(record) => {
                let next_phase = session.advance_phase(settings);
                let next_duration_secs = session.clock().total_secs();
                self.evaluating = false;
                Ok(CompletionOutcome::Recorded {
                    record,
                    next_phase,
                    next_duration_secs,
                })
            }
            Err(e) => {
                // Tracking untouched, phase unchanged: the same completion
                // can be retried once storage recovers.
                self.evaluating = false;
                Err(e)
            }
        }
    }
}

impl Default for CompletionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
