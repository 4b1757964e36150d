//! Phase cycle state machine.
//!
//! ```text
//! Focus --(count < threshold)--> ShortBreak --> Focus
//! Focus --(count == threshold)--> LongBreak --> Focus
//! ```
//!
//! The same transition table serves both automatic advancement after a
//! completed session and a manual phase switch; the manual path just never
//! writes a record.

use serde::{Deserialize, Serialize};

/// One interval type of the focus cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn is_focus(self) -> bool {
        matches!(self, Phase::Focus)
    }

    pub fn is_break(self) -> bool {
        !self.is_focus()
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Focus => "Focus Session",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

/// State machine over the phase cycle.
///
/// Tracks how many focus sessions have completed since the last long break.
/// The count resets to zero whenever a long break is entered and is left
/// untouched by break-to-focus transitions.
///
/// `settings_revision` remembers which settings revision the current
/// countdown was armed from, so a host can detect settings changes with a
/// single integer compare instead of a deep equality check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseController {
    phase: Phase,
    focus_session_count: u32,
    #[serde(default)]
    settings_revision: u64,
}

impl PhaseController {
    /// Start a fresh cycle in `Focus` with a zero count.
    pub fn new() -> Self {
        Self {
            phase: Phase::Focus,
            focus_session_count: 0,
            settings_revision: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn focus_session_count(&self) -> u32 {
        self.focus_session_count
    }

    pub fn settings_revision(&self) -> u64 {
        self.settings_revision
    }

    pub fn set_settings_revision(&mut self, revision: u64) {
        self.settings_revision = revision;
    }

    /// Peek at the phase the transition table would select next.
    ///
    /// `threshold` is the configured sessions-before-long-break value. A
    /// threshold changed mid-cycle is compared against the preserved count
    /// as-is.
    pub fn peek_next(&self, threshold: u32) -> Phase {
        match self.phase {
            Phase::Focus => {
                if self.focus_session_count + 1 >= threshold {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Focus,
        }
    }

    /// Apply the transition table and return the phase entered.
    pub fn advance(&mut self, threshold: u32) -> Phase {
        let next = match self.phase {
            Phase::Focus => {
                self.focus_session_count += 1;
                if self.focus_session_count >= threshold {
                    self.focus_session_count = 0;
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Focus,
        };
        self.phase = next;
        next
    }
}

impl Default for PhaseController {
    fn default() -> Self {
        Self::new()
    }
}
