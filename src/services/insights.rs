// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rule-based insights over daily and weekly totals.
//!
//! Categories are evaluated independently in a fixed order; within a
//! category the first matching rule wins and a category with no match stays
//! silent.

use crate::models::Goals;
use crate::services::weekly::{DayBucket, WeekTotals};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Intake above burn (kcal) that triggers a surplus warning.
const SURPLUS_WARNING_KCAL: i64 = 500;
/// Burn above intake (kcal) that counts as a healthy deficit.
const DEFICIT_SUCCESS_KCAL: i64 = 300;
const WEEKLY_WORKOUTS_GREAT: u32 = 5;
const WEEKLY_WORKOUTS_GOOD: u32 = 3;
const STREAK_MILESTONE_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Insight {
    pub severity: Severity,
    pub message: String,
}

impl Insight {
    fn new(severity: Severity, message: String) -> Self {
        Self { severity, message }
    }
}

/// Build the ordered insight list for today.
pub fn generate_insights(
    today: &DayBucket,
    week: &WeekTotals,
    goals: &Goals,
    streak: u32,
) -> Vec<Insight> {
    [
        goal_progress(today, goals),
        calorie_balance(today),
        weekly_consistency(week),
        streak_milestone(streak),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn goal_progress(today: &DayBucket, goals: &Goals) -> Option<Insight> {
    let goal = goals.daily_burn_goal as u64;
    if today.burned >= goal {
        Some(Insight::new(
            Severity::Success,
            format!(
                "Daily burn goal reached: {} of {} kcal.",
                today.burned, goal
            ),
        ))
    } else if today.burned > 0 {
        Some(Insight::new(
            Severity::Info,
            format!(
                "{} kcal to go to reach today's burn goal of {} kcal.",
                goal - today.burned,
                goal
            ),
        ))
    } else {
        Some(Insight::new(
            Severity::Warning,
            "No workout logged today yet.".to_string(),
        ))
    }
}

fn calorie_balance(today: &DayBucket) -> Option<Insight> {
    if today.intake == 0 || today.burned == 0 {
        return None;
    }

    let balance = today.intake as i64 - today.burned as i64;
    if balance > SURPLUS_WARNING_KCAL {
        Some(Insight::new(
            Severity::Warning,
            format!("Calorie surplus of {} kcal today.", balance),
        ))
    } else if balance < -DEFICIT_SUCCESS_KCAL {
        Some(Insight::new(
            Severity::Success,
            format!("Calorie deficit of {} kcal today.", -balance),
        ))
    } else {
        None
    }
}

fn weekly_consistency(week: &WeekTotals) -> Option<Insight> {
    let workouts = week.workout_count;
    if workouts >= WEEKLY_WORKOUTS_GREAT {
        Some(Insight::new(
            Severity::Success,
            format!("{} workouts this week. Great consistency!", workouts),
        ))
    } else if workouts >= WEEKLY_WORKOUTS_GOOD {
        Some(Insight::new(
            Severity::Info,
            format!(
                "{} workouts this week. {} more to hit {}.",
                workouts,
                WEEKLY_WORKOUTS_GREAT - workouts,
                WEEKLY_WORKOUTS_GREAT
            ),
        ))
    } else {
        None
    }
}

fn streak_milestone(streak: u32) -> Option<Insight> {
    (streak >= STREAK_MILESTONE_DAYS).then(|| {
        Insight::new(
            Severity::Success,
            format!("{}-day workout streak. Keep it going!", streak),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn today(intake: u64, burned: u64) -> DayBucket {
        DayBucket {
            day: "Wed".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
            intake,
            burned,
            net: intake as i64 - burned as i64,
            workout_count: u32::from(burned > 0),
            total_duration_minutes: 0,
        }
    }

    fn week(workout_count: u32) -> WeekTotals {
        WeekTotals {
            workout_count,
            ..Default::default()
        }
    }

    fn severities(insights: &[Insight]) -> Vec<Severity> {
        insights.iter().map(|i| i.severity).collect()
    }

    #[test]
    fn test_idle_day_only_warns() {
        let insights = generate_insights(&today(0, 0), &week(2), &Goals::default(), 3);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].severity, Severity::Warning);
        assert_eq!(insights[0].message, "No workout logged today yet.");
    }

    #[test]
    fn test_goal_progress_rules() {
        let goals = Goals::default(); // 500 kcal burn goal

        let reached = generate_insights(&today(0, 500), &week(0), &goals, 0);
        assert_eq!(severities(&reached), vec![Severity::Success]);

        let partial = generate_insights(&today(0, 200), &week(0), &goals, 0);
        assert_eq!(severities(&partial), vec![Severity::Info]);
        assert!(partial[0].message.starts_with("300 kcal to go"));
    }

    #[test]
    fn test_calorie_balance_requires_both_sides() {
        let goals = Goals::default();

        // Large intake but no workout: balance category is silent
        let insights = generate_insights(&today(3000, 0), &week(0), &goals, 0);
        assert_eq!(insights.len(), 1);

        let surplus = generate_insights(&today(1200, 600), &week(0), &goals, 0);
        assert_eq!(
            severities(&surplus),
            vec![Severity::Success, Severity::Warning]
        );
        assert_eq!(surplus[1].message, "Calorie surplus of 600 kcal today.");

        let deficit = generate_insights(&today(400, 800), &week(0), &goals, 0);
        assert_eq!(
            severities(&deficit),
            vec![Severity::Success, Severity::Success]
        );
        assert_eq!(deficit[1].message, "Calorie deficit of 400 kcal today.");

        // Within the neutral band
        let neutral = generate_insights(&today(900, 600), &week(0), &goals, 0);
        assert_eq!(neutral.len(), 1);
    }

    #[test]
    fn test_weekly_consistency_and_streak() {
        let goals = Goals::default();

        let good = generate_insights(&today(0, 0), &week(3), &goals, 0);
        assert_eq!(severities(&good), vec![Severity::Warning, Severity::Info]);

        let great = generate_insights(&today(0, 0), &week(5), &goals, 7);
        assert_eq!(
            severities(&great),
            vec![Severity::Warning, Severity::Success, Severity::Success]
        );
        assert_eq!(great[2].message, "7-day workout streak. Keep it going!");
    }
}
