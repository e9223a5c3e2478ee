// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly aggregation of workouts and meals into Mon..Sun buckets.
//!
//! Buckets are recomputed from stored records on every request and never
//! persisted. Empty days are reported as zeros so charts can sum safely.

use crate::models::{Meal, Workout};
use crate::time_utils::local_date;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const DAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// A workout reduced to what the aggregator needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutEntry {
    pub date: NaiveDate,
    pub calories: u32,
    pub duration_minutes: u32,
}

impl WorkoutEntry {
    pub fn from_workout(workout: &Workout, utc_offset_minutes: i32) -> Self {
        Self {
            date: local_date(workout.performed_at, utc_offset_minutes),
            calories: workout.calories,
            duration_minutes: workout.duration_minutes.unwrap_or(0),
        }
    }
}

/// A meal reduced to what the aggregator needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MealEntry {
    pub date: NaiveDate,
    pub calories: u32,
}

impl MealEntry {
    pub fn from_meal(meal: &Meal, utc_offset_minutes: i32) -> Self {
        Self {
            date: local_date(meal.eaten_at, utc_offset_minutes),
            calories: meal.calories,
        }
    }
}

/// Totals for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DayBucket {
    /// "Mon".."Sun"
    pub day: String,
    pub date: NaiveDate,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub intake: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub burned: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub net: i64,
    pub workout_count: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_duration_minutes: u64,
}

impl DayBucket {
    fn empty(index: usize, date: NaiveDate) -> Self {
        Self {
            day: DAY_LABELS[index].to_string(),
            date,
            intake: 0,
            burned: 0,
            net: 0,
            workout_count: 0,
            total_duration_minutes: 0,
        }
    }
}

/// Sums across the whole week.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeekTotals {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub intake: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub burned: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub net: i64,
    pub workout_count: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_duration_minutes: u64,
}

/// Seven day buckets plus weekly totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    pub days: Vec<DayBucket>,
    pub totals: WeekTotals,
}

impl WeeklySummary {
    /// Bucket for a given date, if it falls in this week.
    pub fn day(&self, date: NaiveDate) -> Option<&DayBucket> {
        self.days.iter().find(|b| b.date == date)
    }
}

/// Monday of the week containing `anchor`.
pub fn week_start(anchor: NaiveDate) -> NaiveDate {
    anchor - Duration::days(anchor.weekday().num_days_from_monday() as i64)
}

/// Bucket workouts and meals into the Monday-to-Sunday week containing
/// `anchor`. Records dated outside that week are ignored.
pub fn aggregate_week(
    workouts: &[WorkoutEntry],
    meals: &[MealEntry],
    anchor: NaiveDate,
) -> WeeklySummary {
    let start = week_start(anchor);
    let mut days: Vec<DayBucket> = (0..7)
        .map(|i| DayBucket::empty(i, start + Duration::days(i as i64)))
        .collect();

    let slot = |date: NaiveDate| -> Option<usize> {
        let offset = (date - start).num_days();
        (0..7).contains(&offset).then_some(offset as usize)
    };

    for workout in workouts {
        if let Some(i) = slot(workout.date) {
            let bucket = &mut days[i];
            bucket.burned += workout.calories as u64;
            bucket.workout_count += 1;
            bucket.total_duration_minutes += workout.duration_minutes as u64;
        }
    }

    for meal in meals {
        if let Some(i) = slot(meal.date) {
            days[i].intake += meal.calories as u64;
        }
    }

    let mut totals = WeekTotals::default();
    for bucket in &mut days {
        bucket.net = bucket.intake as i64 - bucket.burned as i64;

        totals.intake += bucket.intake;
        totals.burned += bucket.burned;
        totals.net += bucket.net;
        totals.workout_count += bucket.workout_count;
        totals.total_duration_minutes += bucket.total_duration_minutes;
    }

    WeeklySummary {
        week_start: start,
        days,
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn workout(d: NaiveDate, calories: u32, minutes: u32) -> WorkoutEntry {
        WorkoutEntry {
            date: d,
            calories,
            duration_minutes: minutes,
        }
    }

    fn meal(d: NaiveDate, calories: u32) -> MealEntry {
        MealEntry { date: d, calories }
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2024-05-15 is a Wednesday
        assert_eq!(week_start(date(2024, 5, 15)), date(2024, 5, 13));
        assert_eq!(week_start(date(2024, 5, 13)), date(2024, 5, 13));
        assert_eq!(week_start(date(2024, 5, 19)), date(2024, 5, 13));
    }

    #[test]
    fn test_empty_week_is_all_zero() {
        let summary = aggregate_week(&[], &[], date(2024, 5, 15));

        assert_eq!(summary.days.len(), 7);
        let labels: Vec<&str> = summary.days.iter().map(|b| b.day.as_str()).collect();
        assert_eq!(labels, DAY_LABELS);
        for bucket in &summary.days {
            assert_eq!(bucket.intake, 0);
            assert_eq!(bucket.burned, 0);
            assert_eq!(bucket.net, 0);
            assert_eq!(bucket.workout_count, 0);
            assert_eq!(bucket.total_duration_minutes, 0);
        }
        assert_eq!(summary.totals, WeekTotals::default());
    }

    #[test]
    fn test_buckets_by_day() {
        let workouts = [
            workout(date(2024, 5, 13), 300, 30),
            workout(date(2024, 5, 13), 200, 20),
            workout(date(2024, 5, 16), 540, 45),
        ];
        let meals = [
            meal(date(2024, 5, 13), 600),
            meal(date(2024, 5, 13), 900),
            meal(date(2024, 5, 19), 2100),
        ];

        let summary = aggregate_week(&workouts, &meals, date(2024, 5, 15));

        let mon = summary.day(date(2024, 5, 13)).unwrap();
        assert_eq!(mon.day, "Mon");
        assert_eq!(mon.intake, 1500);
        assert_eq!(mon.burned, 500);
        assert_eq!(mon.net, 1000);
        assert_eq!(mon.workout_count, 2);
        assert_eq!(mon.total_duration_minutes, 50);

        let thu = summary.day(date(2024, 5, 16)).unwrap();
        assert_eq!(thu.burned, 540);
        assert_eq!(thu.net, -540);

        let sun = summary.day(date(2024, 5, 19)).unwrap();
        assert_eq!(sun.day, "Sun");
        assert_eq!(sun.intake, 2100);

        assert_eq!(summary.totals.intake, 3600);
        assert_eq!(summary.totals.burned, 1040);
        assert_eq!(summary.totals.net, 2560);
        assert_eq!(summary.totals.workout_count, 3);
        assert_eq!(summary.totals.total_duration_minutes, 95);
    }

    #[test]
    fn test_records_outside_week_are_ignored() {
        let workouts = [
            workout(date(2024, 5, 12), 999, 99),
            workout(date(2024, 5, 20), 999, 99),
        ];
        let meals = [meal(date(2024, 5, 12), 999), meal(date(2024, 5, 20), 999)];

        let summary = aggregate_week(&workouts, &meals, date(2024, 5, 15));
        assert_eq!(summary.totals, WeekTotals::default());
    }

    #[test]
    fn test_intake_is_a_partition_of_meals() {
        let start = date(2024, 5, 13);
        let meals: Vec<MealEntry> = (0..50)
            .map(|i| meal(start + Duration::days(i % 7), 100 + (i as u32 * 37) % 400))
            .collect();

        let summary = aggregate_week(&[], &meals, date(2024, 5, 17));

        let expected: u64 = meals.iter().map(|m| m.calories as u64).sum();
        let bucketed: u64 = summary.days.iter().map(|b| b.intake).sum();
        assert_eq!(bucketed, expected);
        assert_eq!(summary.totals.intake, expected);
    }

    #[test]
    fn test_entry_uses_local_day() {
        use chrono::{TimeZone, Utc};

        let performed_at = Utc.with_ymd_and_hms(2024, 5, 12, 23, 30, 0).unwrap();
        let workout = Workout {
            id: "w1".to_string(),
            user_id: "u1".to_string(),
            activity_type: "running".to_string(),
            mode: crate::models::InputMode::Duration,
            duration_minutes: Some(30),
            reps: None,
            sets: None,
            intensity: crate::models::Intensity::Moderate,
            notes: None,
            calories: 300,
            xp_earned: 150,
            performed_at,
            created_at: performed_at,
        };

        // 23:30 UTC Sunday is already Monday at UTC+1
        assert_eq!(WorkoutEntry::from_workout(&workout, 0).date, date(2024, 5, 12));
        assert_eq!(WorkoutEntry::from_workout(&workout, 60).date, date(2024, 5, 13));
    }
}
