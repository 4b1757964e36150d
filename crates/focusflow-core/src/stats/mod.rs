//! Statistics over the session history.
//!
//! Everything here is a pure function of the full record slice and a
//! supplied "now" -- no internal state, no storage access. Callers hand in
//! a snapshot of the store (screen focus, CLI invocation) and render the
//! result.
//!
//! Day bucketing uses the local calendar: a streak is consecutive local
//! calendar days with at least one focus session, and the weekly breakdown
//! buckets the trailing 7x24h window by each record's local weekday.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Days, Local, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::storage::{SessionRecord, SessionStore};
use crate::timer::Phase;

const WEEK_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Focus minutes per weekday over the trailing week, Monday first.
/// Days without a qualifying record report zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyBreakdown {
    #[serde(rename = "Mon")]
    pub mon: u64,
    #[serde(rename = "Tue")]
    pub tue: u64,
    #[serde(rename = "Wed")]
    pub wed: u64,
    #[serde(rename = "Thu")]
    pub thu: u64,
    #[serde(rename = "Fri")]
    pub fri: u64,
    #[serde(rename = "Sat")]
    pub sat: u64,
    #[serde(rename = "Sun")]
    pub sun: u64,
}

impl WeeklyBreakdown {
    pub fn get(&self, day: Weekday) -> u64 {
        match day {
            Weekday::Mon => self.mon,
            Weekday::Tue => self.tue,
            Weekday::Wed => self.wed,
            Weekday::Thu => self.thu,
            Weekday::Fri => self.fri,
            Weekday::Sat => self.sat,
            Weekday::Sun => self.sun,
        }
    }

    fn add(&mut self, day: Weekday, minutes: u64) {
        let slot = match day {
            Weekday::Mon => &mut self.mon,
            Weekday::Tue => &mut self.tue,
            Weekday::Wed => &mut self.wed,
            Weekday::Thu => &mut self.thu,
            Weekday::Fri => &mut self.fri,
            Weekday::Sat => &mut self.sat,
            Weekday::Sun => &mut self.sun,
        };
        *slot += minutes;
    }
}

/// Derived metrics over the whole history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub total_pomodoros: u64,
    pub total_focus_minutes: u64,
    pub total_focus_hours: u64,
    pub total_break_minutes: u64,
    /// Share of focus time in all recorded time, 0..100. Zero on an empty
    /// history.
    pub focus_percentage: f64,
    /// Focus minutes in the trailing 7x24h window.
    pub weekly_focus_minutes: u64,
    pub weekly_breakdown: WeeklyBreakdown,
    /// Consecutive local calendar days ending today with at least one
    /// focus session each.
    pub longest_streak: u32,
}

/// Compute statistics as of now.
pub fn compute(records: &[SessionRecord]) -> Statistics {
    compute_at(records, Local::now())
}

/// Compute statistics as of an explicit reference time.
pub fn compute_at(records: &[SessionRecord], now: DateTime<Local>) -> Statistics {
    let mut stats = Statistics::default();
    let week_cutoff_ms = now.timestamp_millis() - WEEK_MS;

    for record in records {
        match record.phase {
            Phase::Focus => {
                stats.total_pomodoros += 1;
                stats.total_focus_minutes += record.duration_min;
                if record.timestamp >= week_cutoff_ms {
                    stats.weekly_focus_minutes += record.duration_min;
                    if let Some(day) = local_date(record.timestamp) {
                        stats.weekly_breakdown.add(day.weekday(), record.duration_min);
                    }
                }
            }
            Phase::ShortBreak | Phase::LongBreak => {
                stats.total_break_minutes += record.duration_min;
            }
        }
    }

    stats.total_focus_hours = stats.total_focus_minutes / 60;
    let total = stats.total_focus_minutes + stats.total_break_minutes;
    if total > 0 {
        stats.focus_percentage = stats.total_focus_minutes as f64 / total as f64 * 100.0;
    }
    stats.longest_streak = streak(records, now);
    stats
}

/// Consecutive calendar days with a focus session, walking backward from
/// today; the walk stops at the first day without one.
fn streak(records: &[SessionRecord], now: DateTime<Local>) -> u32 {
    let focus_days: HashSet<chrono::NaiveDate> = records
        .iter()
        .filter(|r| r.phase == Phase::Focus)
        .filter_map(|r| local_date(r.timestamp))
        .collect();

    let today = now.date_naive();
    let mut streak = 0u32;
    loop {
        let Some(day) = today.checked_sub_days(Days::new(streak as u64)) else {
            return streak;
        };
        if !focus_days.contains(&day) {
            return streak;
        }
        streak += 1;
    }
}

/// Up to `n` most recent sessions, newest first.
pub fn recent_sessions(store: &SessionStore, n: usize) -> Vec<SessionRecord> {
    store.get_recent(n)
}

fn local_date(timestamp_ms: i64) -> Option<chrono::NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.with_timezone(&Local).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn focus(minutes: u64, timestamp: i64) -> SessionRecord {
        SessionRecord {
            id: String::new(),
            phase: Phase::Focus,
            duration_min: minutes,
            task_name: None,
            timestamp,
        }
    }

    fn brk(phase: Phase, minutes: u64, timestamp: i64) -> SessionRecord {
        SessionRecord {
            id: String::new(),
            phase,
            duration_min: minutes,
            task_name: None,
            timestamp,
        }
    }

    fn days_ago(now: DateTime<Local>, days: i64) -> i64 {
        (now - Duration::days(days)).timestamp_millis()
    }

    #[test]
    fn empty_history_is_all_zero() {
        let stats = compute_at(&[], Local::now());
        assert_eq!(stats.total_pomodoros, 0);
        assert_eq!(stats.focus_percentage, 0.0);
        assert_eq!(stats.longest_streak, 0);
        assert_eq!(stats.weekly_breakdown, WeeklyBreakdown::default());
    }

    #[test]
    fn totals_split_focus_and_breaks() {
        let now = Local::now();
        let records = vec![
            focus(25, days_ago(now, 0)),
            focus(50, days_ago(now, 0)),
            brk(Phase::ShortBreak, 5, days_ago(now, 0)),
            brk(Phase::LongBreak, 20, days_ago(now, 0)),
        ];
        let stats = compute_at(&records, now);
        assert_eq!(stats.total_pomodoros, 2);
        assert_eq!(stats.total_focus_minutes, 75);
        assert_eq!(stats.total_focus_hours, 1);
        assert_eq!(stats.total_break_minutes, 25);
        assert!((stats.focus_percentage - 75.0).abs() < 1e-9);
    }

    #[test]
    fn streak_counts_consecutive_days_and_stops_at_gap() {
        let now = Local::now();
        // Focus sessions today, yesterday and the day before, then a gap,
        // then one five days ago.
        let records = vec![
            focus(25, days_ago(now, 0)),
            focus(25, days_ago(now, 1)),
            focus(25, days_ago(now, 2)),
            focus(25, days_ago(now, 5)),
        ];
        assert_eq!(compute_at(&records, now).longest_streak, 3);
    }

    #[test]
    fn streak_is_zero_without_a_session_today() {
        let now = Local::now();
        let records = vec![focus(25, days_ago(now, 1)), focus(25, days_ago(now, 2))];
        assert_eq!(compute_at(&records, now).longest_streak, 0);
    }

    #[test]
    fn breaks_do_not_extend_a_streak() {
        let now = Local::now();
        let records = vec![
            brk(Phase::ShortBreak, 5, days_ago(now, 0)),
            focus(25, days_ago(now, 1)),
        ];
        assert_eq!(compute_at(&records, now).longest_streak, 0);
    }

    #[test]
    fn same_weekday_records_sum_in_breakdown() {
        let now = Local::now();
        let ts = days_ago(now, 1);
        let weekday = local_date(ts).unwrap().weekday();
        let records = vec![focus(25, ts), focus(15, ts)];
        let stats = compute_at(&records, now);
        assert_eq!(stats.weekly_breakdown.get(weekday), 40);
        assert_eq!(stats.weekly_focus_minutes, 40);
    }

    #[test]
    fn old_records_stay_out_of_the_weekly_window() {
        let now = Local::now();
        let records = vec![focus(25, days_ago(now, 10)), brk(Phase::ShortBreak, 5, days_ago(now, 1))];
        let stats = compute_at(&records, now);
        assert_eq!(stats.weekly_focus_minutes, 0);
        assert_eq!(stats.weekly_breakdown, WeeklyBreakdown::default());
        // All-time totals still include it.
        assert_eq!(stats.total_focus_minutes, 25);
    }

    #[test]
    fn breakdown_serializes_with_weekday_keys() {
        let json = serde_json::to_value(WeeklyBreakdown {
            mon: 40,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(json["Mon"], 40);
        assert_eq!(json["Sun"], 0);
    }
}
