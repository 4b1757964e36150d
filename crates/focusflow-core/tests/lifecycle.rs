//! End-to-end lifecycle tests against file-backed stores.

use focusflow_core::{
    stats, ClockState, CompletionEvaluator, CompletionOutcome, CycleSettings, FocusSession, Phase,
    SessionStore, SettingsStore,
};

fn run_to_expiry(session: &mut FocusSession) {
    session.start();
    while session.tick().is_none() {}
}

#[test]
fn full_cycle_persists_and_aggregates() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = SettingsStore::load_or_default(dir.path().join("settings.json"));
    settings
        .save_global(CycleSettings {
            focus: 1,
            short_break: 1,
            long_break: 1,
            sessions_before_long_break: 2,
        })
        .unwrap();
    let mut store = SessionStore::load_or_empty(dir.path().join("sessions.json"));
    let mut session = FocusSession::new(&settings);
    session.sync_settings(&settings);
    let mut evaluator = CompletionEvaluator::new();

    // Focus -> ShortBreak -> Focus -> LongBreak.
    let mut phases_entered = Vec::new();
    for _ in 0..3 {
        run_to_expiry(&mut session);
        match evaluator
            .handle_expiry(&mut session, &mut store, &settings)
            .unwrap()
        {
            CompletionOutcome::Recorded { next_phase, .. } => phases_entered.push(next_phase),
            other => panic!("expected Recorded, got {other:?}"),
        }
    }
    assert_eq!(
        phases_entered,
        vec![Phase::ShortBreak, Phase::Focus, Phase::LongBreak]
    );

    // The history survives a reload and feeds the stats engine.
    let reloaded = SessionStore::load(dir.path().join("sessions.json")).unwrap();
    assert_eq!(reloaded.len(), 3);
    let stats = stats::compute(reloaded.get_all());
    assert_eq!(stats.total_pomodoros, 2);
    assert_eq!(stats.total_focus_minutes, 2);
    assert_eq!(stats.total_break_minutes, 1);
    assert_eq!(stats.longest_streak, 1);

    // Every persisted record clears the 80% floor of its planned minute.
    for record in reloaded.get_all() {
        assert!(record.duration_min >= 1);
    }
}

#[test]
fn reset_before_expiry_never_records() {
    let dir = tempfile::tempdir().unwrap();
    let settings = SettingsStore::load_or_default(dir.path().join("settings.json"));
    let mut store = SessionStore::load_or_empty(dir.path().join("sessions.json"));
    let mut session = FocusSession::new(&settings);
    let mut evaluator = CompletionEvaluator::new();

    session.start();
    for _ in 0..120 {
        session.tick();
    }
    session.reset();
    assert_eq!(session.clock().state(), ClockState::Idle);
    // Nothing expired, so the evaluator has nothing to do.
    let outcome = evaluator
        .handle_expiry(&mut session, &mut store, &settings)
        .unwrap();
    assert!(matches!(outcome, CompletionOutcome::NotExpired));
    assert!(store.is_empty());
}

#[test]
fn manual_switch_writes_no_record() {
    let dir = tempfile::tempdir().unwrap();
    let settings = SettingsStore::load_or_default(dir.path().join("settings.json"));
    let store = SessionStore::load_or_empty(dir.path().join("sessions.json"));
    let mut session = FocusSession::new(&settings);

    session.start();
    session.tick();
    session.switch(&settings);
    assert!(!session.clock().is_running());
    assert_eq!(session.phase(), Phase::ShortBreak);
    assert!(store.is_empty());
    assert!(SessionStore::load(dir.path().join("sessions.json"))
        .unwrap()
        .is_empty());
}

#[test]
fn remount_roundtrip_preserves_unstarted_phase() {
    let dir = tempfile::tempdir().unwrap();
    let settings = SettingsStore::load_or_default(dir.path().join("settings.json"));
    let mut session = FocusSession::new(&settings);
    session.start();
    for _ in 0..30 {
        session.tick();
    }
    session.pause();

    // Host serializes on unmount, restores later.
    let json = serde_json::to_string(&session).unwrap();
    let mut restored: FocusSession = serde_json::from_str(&json).unwrap();
    restored.sync_settings(&settings);
    assert_eq!(restored.clock().remaining_secs(), 25 * 60 - 30);
    assert_eq!(restored.clock().state(), ClockState::Paused);
    assert_eq!(restored.phase(), Phase::Focus);
}
