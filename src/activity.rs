//! Real-time activity check
//!
//! Evaluates whether a parsed schedule covers a given wall-clock instant.
//! The comparison runs in minutes-since-midnight, inclusive at both ends, so
//! an interval whose end precedes its start (an overnight shift) can never
//! test active.

use crate::config::InferenceConfig;
use crate::types::ScheduleInterval;
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

/// Checker for the configured active-weekday set
pub struct ActivityChecker {
    active_weekdays: Vec<Weekday>,
}

impl ActivityChecker {
    pub fn new(config: &InferenceConfig) -> Self {
        Self {
            active_weekdays: config.active_weekdays.clone(),
        }
    }

    /// Should the service be active at `now`?
    ///
    /// False without a parsed schedule, false outside the configured active
    /// weekdays, otherwise true iff start <= now <= end.
    pub fn is_active_at(&self, schedule: Option<&ScheduleInterval>, now: NaiveDateTime) -> bool {
        let Some(schedule) = schedule else {
            return false;
        };

        if !self.active_weekdays.contains(&now.weekday()) {
            return false;
        }

        let now_minutes = now.hour() * 60 + now.minute();
        let start_minutes = schedule.start.minutes_since_midnight();
        let end_minutes = schedule.end.minutes_since_midnight();

        now_minutes >= start_minutes && now_minutes <= end_minutes
    }
}
