// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily workout streak tracking.
//!
//! Two separate rules apply:
//! - Logging a workout (`apply_streak`) starts, extends, or restarts the
//!   streak. It never yields 0 since the day being logged counts.
//! - Reading user state (`correct_stale_streak`) zeroes a streak whose last
//!   workout is more than a day old.

use chrono::NaiveDate;
use serde::Serialize;

/// Streak counter and the calendar day it was last advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StreakState {
    pub count: u32,
    pub last_activity_date: Option<NaiveDate>,
}

impl StreakState {
    pub fn new(count: u32, last_activity_date: Option<NaiveDate>) -> Self {
        Self {
            count,
            last_activity_date,
        }
    }
}

/// Streak after a qualifying workout on `day`.
pub fn apply_streak(state: StreakState, day: NaiveDate) -> StreakState {
    let Some(last) = state.last_activity_date else {
        return StreakState::new(1, Some(day));
    };

    // A lapsed streak restarts with whatever is logged.
    if state.count == 0 {
        return StreakState::new(1, Some(day.max(last)));
    }

    match (day - last).num_days() {
        // Same day, or a workout backdated before the last one
        d if d <= 0 => state,
        1 => StreakState::new(state.count.saturating_add(1), Some(day)),
        _ => StreakState::new(1, Some(day)),
    }
}

/// Zero a streak that lapsed before `today`. Returns `None` when nothing
/// changes.
pub fn correct_stale_streak(state: StreakState, today: NaiveDate) -> Option<StreakState> {
    let last = state.last_activity_date?;
    if state.count > 0 && (today - last).num_days() > 1 {
        Some(StreakState::new(0, Some(last)))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_first_activity_starts_streak() {
        let state = apply_streak(StreakState::default(), day(1));
        assert_eq!(state, StreakState::new(1, Some(day(1))));
    }

    #[test]
    fn test_consecutive_days_increment() {
        let mut state = StreakState::default();
        for d in 1..=10 {
            let next = apply_streak(state, day(d));
            assert_eq!(next.count, state.count + 1);
            state = next;
        }
        assert_eq!(state, StreakState::new(10, Some(day(10))));
    }

    #[test]
    fn test_same_day_is_unchanged() {
        let state = StreakState::new(4, Some(day(7)));
        assert_eq!(apply_streak(state, day(7)), state);
    }

    #[test]
    fn test_gap_resets_to_one() {
        let state = StreakState::new(12, Some(day(7)));
        assert_eq!(apply_streak(state, day(9)), StreakState::new(1, Some(day(9))));
        assert_eq!(apply_streak(state, day(30)), StreakState::new(1, Some(day(30))));
    }

    #[test]
    fn test_backdated_activity_is_ignored() {
        let state = StreakState::new(3, Some(day(7)));
        assert_eq!(apply_streak(state, day(2)), state);
    }

    #[test]
    fn test_write_path_never_zero() {
        let mut state = StreakState::new(0, Some(day(1)));
        for d in [1, 2, 5, 5, 6, 20] {
            state = apply_streak(state, day(d));
            assert!(state.count >= 1);
        }
    }

    #[test]
    fn test_stale_streak_read_correction() {
        let state = StreakState::new(5, Some(day(10)));

        // Yesterday still counts
        assert_eq!(correct_stale_streak(state, day(10)), None);
        assert_eq!(correct_stale_streak(state, day(11)), None);

        // Two days later the streak has lapsed
        assert_eq!(
            correct_stale_streak(state, day(12)),
            Some(StreakState::new(0, Some(day(10))))
        );

        // Already zero, nothing to write
        let zeroed = StreakState::new(0, Some(day(10)));
        assert_eq!(correct_stale_streak(zeroed, day(20)), None);

        // Never logged
        assert_eq!(correct_stale_streak(StreakState::default(), day(20)), None);
    }

    #[test]
    fn test_activity_after_lapse_restarts_at_one() {
        let lapsed = correct_stale_streak(StreakState::new(5, Some(day(10))), day(15)).unwrap();
        assert_eq!(apply_streak(lapsed, day(15)), StreakState::new(1, Some(day(15))));
    }
}
