//! # Focusflow Core Library
//!
//! Core business logic for the Focusflow focus timer: the session
//! lifecycle state machine and the statistics engine over recorded
//! history. The CLI binary (and any GUI shell) is a thin layer over this
//! library.
//!
//! ## Architecture
//!
//! - **Timer**: an externally driven countdown ([`SessionClock`]), the
//!   focus/break phase cycle ([`PhaseController`]), and the completion
//!   policy ([`CompletionEvaluator`]) that decides when an expired
//!   countdown becomes a persisted session
//! - **Storage**: JSON-file persistence for sessions, settings and tasks
//!   under `~/.config/focusflow/`
//! - **Stats**: pure aggregation of the session history into totals,
//!   weekly breakdowns and streaks
//!
//! ## Key Components
//!
//! - [`FocusSession`]: serializable value object hosts drive and persist
//! - [`SessionStore`]: append-only completed-session history
//! - [`SettingsStore`]: global and per-task phase durations
//! - [`stats::compute`]: history in, derived metrics out

pub mod error;
pub mod events;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{CoreError, Result, StorageError, ValidationError};
pub use events::Event;
pub use stats::{Statistics, WeeklyBreakdown};
pub use storage::{
    CycleSettings, SessionRecord, SessionStore, Settings, SettingsStore, Task, TaskStore,
};
pub use timer::{
    ClockState, CompletionEvaluator, CompletionOutcome, CreditPolicy, FocusSession, Phase,
    PhaseController, SessionClock,
};
