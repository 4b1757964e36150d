use chrono::Utc;
use clap::Subcommand;
use focusflow_core::storage::data_dir;
use focusflow_core::{
    CompletionEvaluator, CompletionOutcome, Event, FocusSession, SessionStore, SettingsStore,
    TaskStore,
};

const STATE_FILE: &str = "timer.json";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Reset the current phase to its full duration
    Reset,
    /// Manually switch to the next phase (no record written)
    Switch,
    /// Force-complete the current phase
    Complete,
    /// Select the task context by name
    SelectTask {
        /// Task name; task-specific settings apply while selected
        name: String,
    },
    /// Clear the task context
    ClearTask,
    /// Print current timer state as JSON
    Status,
}

fn load_session(settings: &SettingsStore) -> FocusSession {
    if let Ok(dir) = data_dir() {
        if let Ok(json) = std::fs::read_to_string(dir.join(STATE_FILE)) {
            if let Ok(session) = serde_json::from_str::<FocusSession>(&json) {
                return session;
            }
        }
    }
    FocusSession::new(settings)
}

fn save_session(session: &FocusSession) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(session)?;
    std::fs::write(data_dir()?.join(STATE_FILE), json)?;
    Ok(())
}

/// Run the completion evaluator over an expired countdown and print what
/// it decided. A no-op when nothing is expired.
fn settle_expiry(
    session: &mut FocusSession,
    store: &mut SessionStore,
    settings: &SettingsStore,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut evaluator = CompletionEvaluator::new();
    match evaluator.handle_expiry(session, store, settings)? {
        CompletionOutcome::Recorded {
            record,
            next_phase,
            next_duration_secs,
        } => {
            let event = Event::SessionRecorded {
                phase: record.phase,
                credited_min: record.duration_min,
                next_phase,
                next_duration_secs,
                at: Utc::now(),
            };
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        CompletionOutcome::TooShort { credited_min } => {
            let event = Event::SessionDiscarded {
                phase: session.phase(),
                credited_min,
                at: Utc::now(),
            };
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        CompletionOutcome::NotExpired | CompletionOutcome::InFlight => {}
    }
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let settings = SettingsStore::open()?;
    let mut store = SessionStore::open()?;
    let mut session = load_session(&settings);

    // Apply wall time elapsed since the last invocation and settle any
    // expiry it produced, then pick up settings edits, before acting.
    if let Some(event) = session.catch_up(Utc::now().timestamp_millis()) {
        println!("{}", serde_json::to_string_pretty(&event)?);
    }
    settle_expiry(&mut session, &mut store, &settings)?;
    session.sync_settings(&settings);

    match action {
        TimerAction::Start => {
            if let Some(event) = session.start() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        TimerAction::Pause => {
            if let Some(event) = session.pause() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        TimerAction::Reset => {
            let event = session.reset();
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Switch => {
            let event = session.switch(&settings);
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Complete => {
            if let Some(event) = session.force_complete() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            settle_expiry(&mut session, &mut store, &settings)?;
        }
        TimerAction::SelectTask { name } => {
            let tasks = TaskStore::open()?;
            if !tasks.get_tasks().iter().any(|t| t.text == name) {
                eprintln!("warning: no task named '{name}'");
            }
            session.select_task(Some(name), &settings);
        }
        TimerAction::ClearTask => {
            session.select_task(None, &settings);
        }
        TimerAction::Status => {}
    }

    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    save_session(&session)?;
    Ok(())
}
